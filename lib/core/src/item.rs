use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A raw source row: named columns holding arbitrary JSON values
pub type Record = Map<String, Value>;

/// Identifier of a catalog item; keys both axes of the similarity matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Integer(u64),
    String(String),
}

impl ItemId {
    /// Normalize a join-key value.
    ///
    /// Non-negative whole numbers become `Integer`, whether written as `7`,
    /// `7.0`, `"7"` or `"7.0"`, so all of them join. Other non-empty strings
    /// stay `String`. Null, empty, negative, fractional, non-finite and
    /// nested values have no identity and yield `None`, as numbers and as
    /// text alike.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().and_then(whole_number))
                .map(ItemId::Integer),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Parse an identifier from text (CSV cells, CLI arguments)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(i) = s.parse::<u64>() {
            return Some(ItemId::Integer(i));
        }
        match s.parse::<f64>() {
            Ok(f) => whole_number(f).map(ItemId::Integer),
            Err(_) => Some(ItemId::String(s.to_string())),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ItemId::Integer(i) => Value::from(*i),
            ItemId::String(s) => Value::String(s.clone()),
        }
    }
}

// 2^64, the first float past u64::MAX
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn whole_number(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < U64_LIMIT).then(|| f as u64)
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Integer(i) => write!(f, "{}", i),
            ItemId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(i: u64) -> Self {
        ItemId::Integer(i)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::String(s.to_string())
    }
}

/// A merged catalog entry. Immutable once it has passed the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub fields: Record,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(id: ItemId, fields: Record) -> Self {
        Self { id, fields }
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// A field counts as present only when it exists and is not JSON null
    #[inline]
    pub fn has_value(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(v) if !v.is_null())
    }

    /// Field as a plain string, if it is one
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

/// Display names carried by a structured value.
///
/// A list yields the names of its elements; an object yields its `name`
/// entry; a string yields itself. Anything else carries no names.
pub fn entry_names(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(map) => map.get("name").and_then(Value::as_str).into_iter().collect(),
        Value::Array(entries) => entries.iter().flat_map(entry_names).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_normalization() {
        assert_eq!(ItemId::from_value(&json!(7)), Some(ItemId::Integer(7)));
        assert_eq!(ItemId::from_value(&json!("7")), Some(ItemId::Integer(7)));
        assert_eq!(ItemId::from_value(&json!(" 7 ")), Some(ItemId::Integer(7)));
        assert_eq!(
            ItemId::from_value(&json!("tt0499549")),
            Some(ItemId::String("tt0499549".to_string()))
        );
        assert_eq!(ItemId::from_value(&json!(null)), None);
        assert_eq!(ItemId::from_value(&json!("")), None);
        assert_eq!(ItemId::from_value(&json!(-3)), None);
        assert_eq!(ItemId::from_value(&json!("-3")), None);
        assert_eq!(ItemId::from_value(&json!(1.5)), None);
        assert_eq!(ItemId::from_value(&json!("1.5")), None);
        assert_eq!(ItemId::from_value(&json!([1])), None);
    }

    #[test]
    fn test_whole_float_ids_are_integers() {
        assert_eq!(ItemId::from_value(&json!(1.0)), Some(ItemId::Integer(1)));
        assert_eq!(ItemId::from_value(&json!(19995.0)), Some(ItemId::Integer(19995)));
        assert_eq!(ItemId::from_value(&json!("19995.0")), Some(ItemId::Integer(19995)));
        assert_eq!(ItemId::from_value(&json!(-0.0)), Some(ItemId::Integer(0)));
        assert_eq!(ItemId::from_value(&json!(-2.0)), None);
        assert_eq!(ItemId::from_value(&json!(1e30)), None);
        assert_eq!(ItemId::parse("NaN"), None);
        assert_eq!(ItemId::parse("tt-3"), Some(ItemId::String("tt-3".to_string())));
    }

    #[test]
    fn test_has_value_treats_null_as_missing() {
        let mut fields = Record::new();
        fields.insert("overview".to_string(), json!(null));
        fields.insert("tagline".to_string(), json!(""));
        let item = Item::new(ItemId::Integer(1), fields);

        assert!(!item.has_value("overview"));
        assert!(item.has_value("tagline"));
        assert!(!item.has_value("title"));
    }

    #[test]
    fn test_entry_names() {
        let genres = json!([{"id": 18, "name": "Drama"}, {"id": 80, "name": "Crime"}]);
        assert_eq!(entry_names(&genres), vec!["Drama", "Crime"]);
        assert_eq!(entry_names(&json!(["en", "fr"])), vec!["en", "fr"]);
        assert_eq!(entry_names(&json!({"name": "Pixar"})), vec!["Pixar"]);
        assert_eq!(entry_names(&json!("Drama")), vec!["Drama"]);
        assert!(entry_names(&json!(42)).is_empty());
        assert!(entry_names(&json!([{"id": 1}])).is_empty());
    }
}
