//! Catalog merger
//!
//! Inner-joins two record sets on their identifier columns. Only ids present
//! on both sides produce an item; everything else is dropped silently.
//! Columns present on both sides are resolved to one canonical name.

use crate::config::{PipelineConfig, Side};
use crate::{Catalog, Item, ItemId, Record};
use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Suffix of a left-side value kept next to its collapsed column
pub const LEFT_SUFFIX: &str = "_x";
/// Suffix of a right-side value kept next to its collapsed column
pub const RIGHT_SUFFIX: &str = "_y";

/// True for a `<field>_x` / `<field>_y` column whose `<field>` is also in
/// `columns`, i.e. the losing side of a merge collision
pub fn is_collision_copy<'a, I>(name: &str, columns: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(stem) = name
        .strip_suffix(LEFT_SUFFIX)
        .or_else(|| name.strip_suffix(RIGHT_SUFFIX))
    else {
        return false;
    };
    columns.into_iter().any(|c| c == stem)
}

#[derive(Debug, Clone)]
pub struct CatalogMerger {
    left_key: String,
    right_key: String,
    prefer: BTreeMap<String, Side>,
    default_side: Side,
    keep_suffixed: bool,
}

impl CatalogMerger {
    pub fn new(left_key: impl Into<String>, right_key: impl Into<String>) -> Self {
        Self {
            left_key: left_key.into(),
            right_key: right_key.into(),
            prefer: BTreeMap::new(),
            default_side: Side::Left,
            keep_suffixed: false,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            left_key: config.left_key.clone(),
            right_key: config.right_key.clone(),
            prefer: config.prefer.clone(),
            default_side: config.default_side,
            keep_suffixed: config.keep_suffixed,
        }
    }

    #[must_use]
    pub fn prefer(mut self, field: impl Into<String>, side: Side) -> Self {
        self.prefer.insert(field.into(), side);
        self
    }

    #[must_use]
    pub fn keep_suffixed(mut self, keep: bool) -> Self {
        self.keep_suffixed = keep;
        self
    }

    pub fn left_key(&self) -> &str {
        &self.left_key
    }

    /// Join `left` and `right` into a catalog ordered like `left`
    pub fn merge(&self, left: &[Record], right: &[Record]) -> Catalog {
        let right_index = self.index_right(right);

        let mut catalog = Catalog::new();
        let mut collisions = BTreeSet::new();
        let mut unmatched = 0usize;
        let mut unkeyed = 0usize;
        let mut seen = AHashSet::with_capacity(left.len());

        for record in left {
            let Some(id) = record.get(&self.left_key).and_then(ItemId::from_value) else {
                debug!(key = %self.left_key, "left record without usable id skipped");
                unkeyed += 1;
                continue;
            };
            if !seen.insert(id.clone()) {
                warn!(id = %id, "duplicate id in left source, keeping first");
                continue;
            }
            let Some(other) = right_index.get(&id) else {
                unmatched += 1;
                continue;
            };

            let fields = self.merge_fields(&id, record, other, &mut collisions);
            catalog.insert_new(Item::new(id, fields));
        }

        if unkeyed > 0 {
            warn!(
                key = %self.left_key,
                skipped = unkeyed,
                "left records without a usable id were skipped"
            );
        }
        info!(
            left = left.len(),
            right = right.len(),
            matched = catalog.len(),
            unmatched_left = unmatched,
            collisions = ?collisions,
            "merged catalog"
        );
        catalog
    }

    fn index_right<'a>(&self, right: &'a [Record]) -> AHashMap<ItemId, &'a Record> {
        let mut index = AHashMap::with_capacity(right.len());
        for record in right {
            match record.get(&self.right_key).and_then(ItemId::from_value) {
                Some(id) => {
                    if index.contains_key(&id) {
                        warn!(id = %id, "duplicate id in right source, keeping first");
                    } else {
                        index.insert(id, record);
                    }
                }
                None => debug!(key = %self.right_key, "right record without usable id skipped"),
            }
        }
        index
    }

    fn merge_fields(
        &self,
        id: &ItemId,
        left: &Record,
        right: &Record,
        collisions: &mut BTreeSet<String>,
    ) -> Record {
        let mut fields = left.clone();
        fields.insert(self.left_key.clone(), id.to_value());

        for (name, value) in right {
            if name == &self.right_key || name == &self.left_key {
                continue;
            }
            let Some(existing) = fields.get(name).cloned() else {
                fields.insert(name.clone(), value.clone());
                continue;
            };

            collisions.insert(name.clone());
            match self.prefer.get(name).copied().unwrap_or(self.default_side) {
                Side::Left => {
                    if self.keep_suffixed {
                        fields.insert(format!("{}{}", name, RIGHT_SUFFIX), value.clone());
                    }
                }
                Side::Right => {
                    fields.insert(name.clone(), value.clone());
                    if self.keep_suffixed {
                        fields.insert(format!("{}{}", name, LEFT_SUFFIX), existing);
                    }
                }
            }
        }
        fields
    }
}
