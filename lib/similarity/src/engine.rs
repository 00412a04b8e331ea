//! Dense all-pairs cosine similarity
//!
//! `sim(i, j) = dot(v_i, v_j) / (|v_i| * |v_j|)`, and 0 when either vector
//! has zero length. Cost is O(N^2 * V) time for N items over a V-term
//! vocabulary and O(N^2) memory for the result; the matrix is sized before
//! anything is allocated.
//!
//! Rows are disjoint slices of the output buffer, so the parallel path hands
//! one row per task to rayon and needs no locking.

use crate::matrix::{zeroed_cells, SimilarityMatrix};
use cinesim_core::{Result, Vector};
use cinesim_text::TermWeights;
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine {
    parallel: bool,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl SimilarityEngine {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Build the full `N x N` matrix for `weights`, labelled by item id
    pub fn compute(&self, weights: &TermWeights) -> Result<SimilarityMatrix> {
        let n = weights.len();
        let mut data = zeroed_cells(n)?;

        if n > 0 {
            let vectors = weights.vectors();
            let norms: Vec<f32> = vectors.iter().map(Vector::norm).collect();
            if self.parallel {
                data.par_chunks_mut(n)
                    .enumerate()
                    .for_each(|(i, row)| fill_row(i, row, vectors, &norms));
            } else {
                data.chunks_mut(n)
                    .enumerate()
                    .for_each(|(i, row)| fill_row(i, row, vectors, &norms));
            }
        }

        info!(items = n, vocabulary = weights.dim(), "computed similarity matrix");
        SimilarityMatrix::from_parts(weights.ids().to_vec(), data)
    }
}

fn fill_row(i: usize, row: &mut [f32], vectors: &[Vector], norms: &[f32]) {
    let norm_i = norms[i];
    for (j, cell) in row.iter_mut().enumerate() {
        let norm_j = norms[j];
        *cell = if norm_i == 0.0 || norm_j == 0.0 {
            0.0
        } else if i == j {
            1.0
        } else {
            (vectors[i].dot(&vectors[j]) / (norm_i * norm_j)).clamp(0.0, 1.0)
        };
    }
}
