//! Bounded vocabulary selection
//!
//! Terms are ranked by corpus-wide importance, `corpus_count(t) * idf(t)`,
//! so frequent but widespread terms lose to terms concentrated in a few
//! documents. Ties go to the lexically smaller term, which keeps repeated
//! runs over the same corpus bit-identical.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
///
/// Always positive, so a term present in every document still carries
/// some weight.
#[inline]
pub fn idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// Corpus statistics for one term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermStats {
    /// Documents containing the term
    pub df: usize,
    /// Occurrences across the whole corpus
    pub count: u64,
}

/// The selected terms, in lexical order; position is the vector column
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f32>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Pick at most `max_features` terms from `stats` over `n_docs` documents
    pub fn select(stats: &AHashMap<String, TermStats>, n_docs: usize, max_features: usize) -> Self {
        let mut ranked: Vec<(&str, f64)> = stats
            .iter()
            .map(|(term, s)| (term.as_str(), s.count as f64 * idf(n_docs, s.df)))
            .collect();
        ranked.sort_by_key(|&(term, score)| (Reverse(OrderedFloat(score)), term));
        ranked.truncate(max_features);

        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let mut vocabulary = Self::default();
        for term in terms {
            let df = stats.get(term).map(|s| s.df).unwrap_or(0);
            vocabulary.push(term.to_string(), idf(n_docs, df) as f32);
        }
        vocabulary
    }

    fn push(&mut self, term: String, idf: f32) {
        self.index.insert(term.clone(), self.terms.len());
        self.terms.push(term);
        self.idf.push(idf);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column of a term
    #[inline]
    pub fn position(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf_values(&self) -> &[f32] {
        &self.idf
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}
