//! Identifier-indexed similarity matrix
//!
//! Dense row-major `n x n` scores plus an id -> index lookup. Callers address
//! cells by item id, never by assumed position.

use ahash::AHashMap;
use cinesim_core::{Error, ItemId, Result};

#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    ids: Vec<ItemId>,
    index: AHashMap<ItemId, usize>,
    data: Vec<f32>,
}

impl PartialEq for SimilarityMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.data == other.data
    }
}

/// Cells needed for `n` items, or `MatrixTooLarge` if that cannot be
/// allocated
pub fn cell_count(n: usize) -> Result<usize> {
    n.checked_mul(n)
        .filter(|cells| {
            cells
                .checked_mul(std::mem::size_of::<f32>())
                .map_or(false, |bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(Error::MatrixTooLarge { items: n })
}

/// Zeroed storage for `n x n` scores. Both an oversized shape and a failed
/// allocation come back as `MatrixTooLarge` rather than aborting.
pub fn zeroed_cells(n: usize) -> Result<Vec<f32>> {
    let cells = cell_count(n)?;
    let mut data = Vec::new();
    data.try_reserve_exact(cells)
        .map_err(|_| Error::MatrixTooLarge { items: n })?;
    data.resize(cells, 0.0);
    Ok(data)
}

impl SimilarityMatrix {
    /// Wrap row-major scores for `ids`
    pub fn from_parts(ids: Vec<ItemId>, data: Vec<f32>) -> Result<Self> {
        let expected = cell_count(ids.len())?;
        if data.len() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: data.len(),
            });
        }
        let mut index = AHashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(Error::DuplicateItem(id.to_string()));
            }
        }
        Ok(Self { ids, index, data })
    }

    /// Number of rows (= columns)
    #[inline]
    pub fn dim(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Row and column labels, in index order
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    #[inline]
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Score between two items
    pub fn get(&self, a: &ItemId, b: &ItemId) -> Option<f32> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.data[i * self.dim() + j])
    }

    /// All scores of one item, in column order
    pub fn row(&self, id: &ItemId) -> Option<&[f32]> {
        self.position(id).map(|i| self.row_at(i))
    }

    /// Row by index; panics when `i >= dim()`
    #[inline]
    pub fn row_at(&self, i: usize) -> &[f32] {
        let n = self.dim();
        &self.data[i * n..(i + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, &[f32])> {
        self.ids.iter().enumerate().map(move |(i, id)| (id, self.row_at(i)))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// `sim(i, j) == sim(j, i)` for every pair, within `tolerance`
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        let n = self.dim();
        (0..n).all(|i| {
            (i + 1..n).all(|j| (self.data[i * n + j] - self.data[j * n + i]).abs() <= tolerance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId::Integer).collect()
    }

    #[test]
    fn test_lookup_by_id() {
        let m = SimilarityMatrix::from_parts(ids(&[10, 20]), vec![1.0, 0.3, 0.3, 1.0]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(&ItemId::Integer(10), &ItemId::Integer(20)), Some(0.3));
        assert_eq!(m.get(&ItemId::Integer(10), &ItemId::Integer(99)), None);
        assert_eq!(m.row(&ItemId::Integer(20)), Some(&[0.3, 1.0][..]));
        assert!(m.is_symmetric(0.0));
    }

    #[test]
    fn test_shape_checked() {
        assert!(matches!(
            SimilarityMatrix::from_parts(ids(&[1, 2]), vec![1.0; 3]),
            Err(Error::InvalidDimension { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            SimilarityMatrix::from_parts(ids(&[1, 1]), vec![1.0; 4]),
            Err(Error::DuplicateItem(_))
        ));
    }

    #[test]
    fn test_asymmetry_detected() {
        let m = SimilarityMatrix::from_parts(ids(&[1, 2]), vec![1.0, 0.5, 0.4, 1.0]).unwrap();
        assert!(!m.is_symmetric(0.01));
        assert!(m.is_symmetric(0.2));
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(cell_count(usize::MAX), Err(Error::MatrixTooLarge { .. })));
        assert_eq!(cell_count(0).unwrap(), 0);
        assert_eq!(cell_count(3).unwrap(), 9);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_unallocatable_matrix_is_an_error() {
        // 2^60 cells pass the shape check but no allocator can serve 4 EiB
        let n = 1usize << 30;
        assert!(cell_count(n).is_ok());
        assert!(matches!(zeroed_cells(n), Err(Error::MatrixTooLarge { items }) if items == n));
        assert_eq!(zeroed_cells(2).unwrap(), vec![0.0; 4]);
    }
}
