// Item predicates and the validity filter applied after merging
use crate::item::entry_names;
use crate::{Catalog, Item};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub trait Filter {
    fn matches(&self, item: &Item) -> bool;
}

pub struct PayloadFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone)]
pub enum FilterCondition {
    Equals { field: String, value: Value },
    /// Field exists and is not null
    NotNull { field: String },
    /// Field shares at least one entry name with `values`
    AnyOf { field: String, values: Vec<String> },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl PayloadFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, item: &Item) -> bool {
        match condition {
            FilterCondition::Equals { field, value } => {
                item.get(field).map(|v| v == value).unwrap_or(false)
            }
            FilterCondition::NotNull { field } => item.has_value(field),
            FilterCondition::AnyOf { field, values } => item
                .get(field)
                .map(|v| entry_names(v).iter().any(|name| values.iter().any(|x| x == name)))
                .unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, item))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, item))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, item),
        }
    }
}

impl Filter for PayloadFilter {
    fn matches(&self, item: &Item) -> bool {
        Self::matches_condition(&self.condition, item)
    }
}

/// Counts gathered while filtering; every predicate is evaluated for every
/// item, so one item can show up under several reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub input: usize,
    pub kept: usize,
    pub rejected_status: usize,
    pub missing: BTreeMap<String, usize>,
}

/// Keeps items with the wanted lifecycle status whose required fields are
/// all present and non-null.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    status_field: String,
    status_value: Value,
    required_fields: Vec<String>,
}

impl RecordFilter {
    pub fn new(
        status_field: impl Into<String>,
        status_value: impl Into<Value>,
        required_fields: Vec<String>,
    ) -> Self {
        Self {
            status_field: status_field.into(),
            status_value: status_value.into(),
            required_fields,
        }
    }

    /// The filter as a composable condition
    pub fn condition(&self) -> FilterCondition {
        let mut conditions = Vec::with_capacity(self.required_fields.len() + 1);
        conditions.push(FilterCondition::Equals {
            field: self.status_field.clone(),
            value: self.status_value.clone(),
        });
        conditions.extend(
            self.required_fields
                .iter()
                .map(|field| FilterCondition::NotNull { field: field.clone() }),
        );
        FilterCondition::And(conditions)
    }

    /// Filter a catalog into a new one, preserving order
    pub fn apply(&self, catalog: &Catalog) -> (Catalog, FilterReport) {
        let mut report = FilterReport {
            input: catalog.len(),
            ..FilterReport::default()
        };

        for item in catalog {
            if item.get(&self.status_field) != Some(&self.status_value) {
                report.rejected_status += 1;
                debug!(id = %item.id, "dropped: status mismatch");
            }
            for field in &self.required_fields {
                if !item.has_value(field) {
                    *report.missing.entry(field.clone()).or_insert(0) += 1;
                    debug!(id = %item.id, field = %field, "dropped: missing required field");
                }
            }
        }

        let kept = catalog.select(self);
        report.kept = kept.len();
        info!(
            input = report.input,
            kept = report.kept,
            rejected_status = report.rejected_status,
            "filtered catalog"
        );
        (kept, report)
    }
}

impl Filter for RecordFilter {
    fn matches(&self, item: &Item) -> bool {
        item.get(&self.status_field) == Some(&self.status_value)
            && self.required_fields.iter().all(|field| item.has_value(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemId, Record};
    use serde_json::json;

    fn movie(id: u64, value: Value) -> Item {
        let fields: Record = serde_json::from_value(value).unwrap();
        Item::new(ItemId::Integer(id), fields)
    }

    fn released_with_overview() -> RecordFilter {
        RecordFilter::new("status", "Released", vec!["overview".to_string()])
    }

    #[test]
    fn test_status_and_required_fields() {
        let catalog = Catalog::from_items(vec![
            movie(1, json!({"status": "Released", "overview": "A heist."})),
            movie(2, json!({"status": "Rumored", "overview": "A sequel."})),
            movie(3, json!({"status": "Released", "overview": null})),
            movie(4, json!({"status": "Released"})),
            movie(5, json!({"status": "Released", "overview": ""})),
        ])
        .unwrap();

        let (kept, report) = released_with_overview().apply(&catalog);

        assert_eq!(kept.ids(), vec![ItemId::Integer(1), ItemId::Integer(5)]);
        assert_eq!(report.input, 5);
        assert_eq!(report.kept, 2);
        assert_eq!(report.rejected_status, 1);
        assert_eq!(report.missing.get("overview"), Some(&2));
    }

    #[test]
    fn test_all_required_null_excluded_even_when_released() {
        let filter = RecordFilter::new(
            "status",
            "Released",
            vec!["overview".to_string(), "tagline".to_string()],
        );
        let item = movie(9, json!({"status": "Released", "overview": null, "tagline": null}));
        assert!(!filter.matches(&item));
    }

    #[test]
    fn test_condition_agrees_with_direct_match() {
        let filter = released_with_overview();
        let payload = PayloadFilter::new(filter.condition());
        for item in [
            movie(1, json!({"status": "Released", "overview": "x"})),
            movie(2, json!({"status": "Released"})),
            movie(3, json!({"status": "Post Production", "overview": "x"})),
        ] {
            assert_eq!(filter.matches(&item), payload.matches(&item));
        }
    }

    #[test]
    fn test_any_of_on_named_entries() {
        let item = movie(
            1,
            json!({"genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]}),
        );
        let action = PayloadFilter::new(FilterCondition::AnyOf {
            field: "genres".to_string(),
            values: vec!["Comedy".to_string(), "Action".to_string()],
        });
        let comedy = PayloadFilter::new(FilterCondition::AnyOf {
            field: "genres".to_string(),
            values: vec!["Comedy".to_string()],
        });
        assert!(action.matches(&item));
        assert!(!comedy.matches(&item));
        assert!(PayloadFilter::new(FilterCondition::Not(Box::new(comedy.condition().clone())))
            .matches(&item));
    }

    #[test]
    fn test_empty_catalog() {
        let (kept, report) = released_with_overview().apply(&Catalog::new());
        assert!(kept.is_empty());
        assert_eq!(report, FilterReport::default());
    }
}
