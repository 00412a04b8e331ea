//! Offline neighbour lookup
//!
//! Answers "items similar to X" from a computed or reloaded matrix, with an
//! optional item filter (genres, countries, cast) applied to candidates.

use crate::matrix::SimilarityMatrix;
use cinesim_core::item::entry_names;
use cinesim_core::{Catalog, Error, Filter, FilterCondition, Item, ItemId, PayloadFilter, Result};
use serde::Serialize;
use std::collections::BTreeSet;

/// One ranked neighbour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbour {
    pub id: ItemId,
    pub score: f32,
}

/// Catalog and matrix held in lockstep
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    matrix: SimilarityMatrix,
}

impl Recommender {
    /// Fails unless the matrix labels are exactly the catalog ids, in order
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != matrix.dim() {
            return Err(Error::InvalidDimension {
                expected: catalog.len(),
                actual: matrix.dim(),
            });
        }
        if let Some((item, _)) = catalog
            .iter()
            .zip(matrix.ids())
            .find(|(item, id)| &item.id != *id)
        {
            return Err(Error::UnknownItem(item.id.to_string()));
        }
        Ok(Self { catalog, matrix })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Up to `top_k` most similar items, best first, never including `id`.
    /// Equal scores keep catalog order.
    pub fn similar(
        &self,
        id: &ItemId,
        top_k: usize,
        filter: Option<&dyn Filter>,
    ) -> Result<Vec<Neighbour>> {
        let row = self
            .matrix
            .row(id)
            .ok_or_else(|| Error::UnknownItem(id.to_string()))?;

        let mut ranked: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| {
                let candidate = &self.catalog.items()[j];
                &candidate.id != id && filter.map_or(true, |f| f.matches(candidate))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .map(|(j, score)| Neighbour {
                id: self.matrix.ids()[j].clone(),
                score,
            })
            .collect())
    }

    /// First item whose `field` is the string `value`
    pub fn find_by_field(&self, field: &str, value: &str) -> Option<&Item> {
        self.catalog.iter().find(|item| item.get_str(field) == Some(value))
    }

    /// Every entry name found in `field` across the catalog, sorted
    pub fn distinct_values(&self, field: &str) -> BTreeSet<String> {
        self.catalog
            .iter()
            .filter_map(|item| item.get(field))
            .flat_map(entry_names)
            .map(str::to_string)
            .collect()
    }
}

/// Candidate filter over list-valued fields: an item passes when, for every
/// field with a non-empty wanted list, it carries at least one of the names.
/// `None` when nothing is wanted.
pub fn facet_filter(facets: &[(&str, &[String])]) -> Option<PayloadFilter> {
    let mut conditions: Vec<FilterCondition> = facets
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| FilterCondition::AnyOf {
            field: field.to_string(),
            values: values.to_vec(),
        })
        .collect();
    match conditions.len() {
        0 => None,
        1 => conditions.pop().map(PayloadFilter::new),
        _ => Some(PayloadFilter::new(FilterCondition::And(conditions))),
    }
}
