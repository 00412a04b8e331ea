//! Corpus builder
//!
//! Turns every catalog item into one text document by joining the
//! configured text fields with a single space.

use crate::item::entry_names;
use crate::{Catalog, ItemId};
use serde_json::Value;

const SEPARATOR: &str = " ";

/// One document per item, aligned with the catalog order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    ids: Vec<ItemId>,
    documents: Vec<String>,
}

impl Corpus {
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &str)> {
        self.ids.iter().zip(self.documents.iter().map(String::as_str))
    }

    /// Build a corpus from explicit parts; both sides must line up
    pub fn from_parts(ids: Vec<ItemId>, documents: Vec<String>) -> crate::Result<Self> {
        if ids.len() != documents.len() {
            return Err(crate::Error::InvalidDimension {
                expected: ids.len(),
                actual: documents.len(),
            });
        }
        Ok(Self { ids, documents })
    }
}

#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    fields: Vec<String>,
}

impl CorpusBuilder {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn build(&self, catalog: &Catalog) -> Corpus {
        let mut corpus = Corpus {
            ids: Vec::with_capacity(catalog.len()),
            documents: Vec::with_capacity(catalog.len()),
        };
        for item in catalog {
            let parts: Vec<String> = self
                .fields
                .iter()
                .map(|field| item.get(field).map(field_text).unwrap_or_default())
                .collect();
            corpus.ids.push(item.id.clone());
            corpus.documents.push(parts.join(SEPARATOR));
        }
        corpus
    }
}

/// Render one field value as text. Missing and null values render empty.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => entry_names(value).join(SEPARATOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, Record};
    use serde_json::json;

    fn catalog(rows: Value) -> Catalog {
        let rows: Vec<Record> = serde_json::from_value(rows).unwrap();
        let items = rows
            .into_iter()
            .map(|r| Item::new(ItemId::from_value(&r["id"]).unwrap(), r))
            .collect();
        Catalog::from_items(items).unwrap()
    }

    #[test]
    fn test_concatenation_in_field_order() {
        let catalog = catalog(json!([
            {"id": 1, "overview": "A thief.", "tagline": "Steal it."},
            {"id": 2, "overview": "A cop.", "tagline": null},
            {"id": 3, "tagline": "Alone."},
        ]));
        let corpus = CorpusBuilder::new(vec!["tagline".into(), "overview".into()]).build(&catalog);

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.ids(), &catalog.ids()[..]);
        assert_eq!(corpus.documents()[0], "Steal it. A thief.");
        // missing values contribute empty strings, never "null"
        assert_eq!(corpus.documents()[1], " A cop.");
        assert_eq!(corpus.documents()[2], "Alone. ");
    }

    #[test]
    fn test_structured_fields_render_names() {
        let catalog = catalog(json!([{
            "id": 7,
            "genres": [{"id": 18, "name": "Drama"}, {"id": 10749, "name": "Romance"}],
            "keywords": ["ship", "iceberg"],
            "runtime": 194,
        }]));
        let corpus = CorpusBuilder::new(vec!["genres".into(), "keywords".into(), "runtime".into()])
            .build(&catalog);
        assert_eq!(corpus.documents()[0], "Drama Romance ship iceberg 194");
    }

    #[test]
    fn test_empty_catalog() {
        let corpus = CorpusBuilder::new(vec!["overview".into()]).build(&Catalog::new());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_from_parts_checks_alignment() {
        assert!(Corpus::from_parts(vec![ItemId::Integer(1)], vec![]).is_err());
        let corpus = Corpus::from_parts(vec![ItemId::Integer(1)], vec!["x".into()]).unwrap();
        assert_eq!(corpus.iter().next(), Some((&ItemId::Integer(1), "x")));
    }
}
