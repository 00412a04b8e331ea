//! Pipeline configuration
//!
//! Every knob of the batch pass lives here. The configuration is plain
//! serde data so a driver can read it from a JSON file; all fields have
//! defaults matching a TMDB movies/credits dump.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Which source wins a column collision during the merge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// Configuration for a single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Join key in the left (primary) source; the merged id is stored here
    pub left_key: String,
    /// Join key in the right source
    pub right_key: String,
    /// Collision winner per field name
    pub prefer: BTreeMap<String, Side>,
    /// Collision winner for fields not listed in `prefer`
    pub default_side: Side,
    /// Keep the losing side of a collision as `<field>_x` / `<field>_y` on
    /// the in-memory items, for inspecting what a merge discarded. These
    /// copies never reach the exported catalog table.
    pub keep_suffixed: bool,
    pub status_field: String,
    pub status_value: Value,
    pub required_fields: Vec<String>,
    /// Fields concatenated, in this order, into each item's document
    pub text_fields: Vec<String>,
    /// Vocabulary cap
    pub max_features: usize,
    pub english_stop_words: bool,
    /// Extra stop words on top of (or instead of) the English list
    pub stop_words: Vec<String>,
    pub min_token_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut prefer = BTreeMap::new();
        prefer.insert("title".to_string(), Side::Left);
        Self {
            left_key: "id".to_string(),
            right_key: "movie_id".to_string(),
            prefer,
            default_side: Side::Left,
            keep_suffixed: false,
            status_field: "status".to_string(),
            status_value: Value::String("Released".to_string()),
            required_fields: vec!["overview".to_string()],
            text_fields: vec!["overview".to_string(), "tagline".to_string()],
            max_features: 5000,
            english_stop_words: true,
            stop_words: Vec::new(),
            min_token_len: 2,
        }
    }
}

impl PipelineConfig {
    /// Reject contract violations before any data is touched
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        if self.min_token_len == 0 {
            return Err(Error::InvalidConfig("min_token_len must be at least 1".into()));
        }
        for (name, value) in [
            ("left_key", &self.left_key),
            ("right_key", &self.right_key),
            ("status_field", &self.status_field),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        if self.text_fields.is_empty() {
            return Err(Error::InvalidConfig("text_fields must name at least one field".into()));
        }
        check_field_list("required_fields", &self.required_fields)?;
        check_field_list("text_fields", &self.text_fields)?;
        Ok(())
    }

    /// Fields every left record is expected to carry somewhere in the source
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.status_field.as_str()];
        fields.extend(self.required_fields.iter().map(String::as_str));
        fields.extend(self.text_fields.iter().map(String::as_str));
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_field_list(name: &str, fields: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.trim().is_empty() {
            return Err(Error::InvalidConfig(format!("{} contains an empty field name", name)));
        }
        if !seen.insert(field.as_str()) {
            return Err(Error::InvalidConfig(format!("{} lists '{}' twice", name, field)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_vocabulary_rejected() {
        let config = PipelineConfig {
            max_features: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_field_lists_rejected() {
        let empty_text = PipelineConfig {
            text_fields: Vec::new(),
            ..PipelineConfig::default()
        };
        assert!(empty_text.validate().is_err());

        let blank_required = PipelineConfig {
            required_fields: vec!["overview".into(), " ".into()],
            ..PipelineConfig::default()
        };
        assert!(blank_required.validate().is_err());

        let repeated = PipelineConfig {
            text_fields: vec!["overview".into(), "overview".into()],
            ..PipelineConfig::default()
        };
        assert!(repeated.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PipelineConfig::from_json(
            r#"{"max_features": 10, "prefer": {"title": "right"}, "text_fields": ["overview"]}"#,
        )
        .unwrap();
        assert_eq!(config.max_features, 10);
        assert_eq!(config.prefer.get("title"), Some(&Side::Right));
        assert_eq!(config.left_key, "id");

        assert!(PipelineConfig::from_json(r#"{"max_features": 0}"#).is_err());
    }

    #[test]
    fn test_referenced_fields_dedup() {
        let config = PipelineConfig::default();
        assert_eq!(config.referenced_fields(), vec!["overview", "status", "tagline"]);
    }
}
