use crate::{Error, Filter, Item, ItemId, Result};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Ordered collection of items with an identifier lookup.
///
/// Order is insertion order and fixes the row/column order of every
/// matrix built from this catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: AHashMap<ItemId, usize>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting repeated identifiers
    pub fn from_items(items: Vec<Item>) -> Result<Self> {
        let mut catalog = Self {
            items: Vec::with_capacity(items.len()),
            index: AHashMap::with_capacity(items.len()),
        };
        for item in items {
            catalog.push(item)?;
        }
        Ok(catalog)
    }

    pub fn push(&mut self, item: Item) -> Result<()> {
        let id = item.id.to_string();
        if self.insert_new(item) {
            Ok(())
        } else {
            Err(Error::DuplicateItem(id))
        }
    }

    /// Append unless the id is taken; returns whether the item went in
    pub(crate) fn insert_new(&mut self, item: Item) -> bool {
        if self.index.contains_key(&item.id) {
            return false;
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Row/column index of an item
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Union of field names across all items, sorted
    pub fn columns(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .flat_map(|item| item.fields.keys().cloned())
            .collect()
    }

    /// New catalog holding the items accepted by `filter`, in order
    pub fn select(&self, filter: &dyn Filter) -> Catalog {
        let mut selected = Catalog::new();
        for item in self.items.iter().filter(|item| filter.matches(item)) {
            selected.insert_new(item.clone());
        }
        selected
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
