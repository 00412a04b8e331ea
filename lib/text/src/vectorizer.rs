//! TF-IDF vectorizer
//!
//! ```text
//! weight(t, d) = count(t, d) * idf(t)       for t in the vocabulary
//! idf(t)       = ln((1 + N) / (1 + df(t))) + 1
//! ```
//!
//! Every document vector is scaled to unit length afterwards, so cosine
//! similarity between two documents is their dot product.
//!
//! Tokenization and weighting run per document on the rayon pool. The
//! vocabulary is fixed by one sequential pass in between and only read
//! afterwards.

use crate::stopwords::StopWords;
use crate::tokenize::Tokenizer;
use crate::vocabulary::{TermStats, Vocabulary};
use ahash::AHashMap;
use cinesim_core::{Corpus, Error, ItemId, PipelineConfig, Result, Vector};
use rayon::prelude::*;
use tracing::info;

/// Output of the vectorizer: one unit-length (or all-zero) row per item
#[derive(Debug, Clone, Default)]
pub struct TermWeights {
    ids: Vec<ItemId>,
    vectors: Vec<Vector>,
    vocabulary: Vocabulary,
}

impl TermWeights {
    /// Number of rows (items)
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of columns (vocabulary size)
    #[inline]
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn row(&self, i: usize) -> Option<(&ItemId, &Vector)> {
        self.ids.get(i).zip(self.vectors.get(i))
    }

    /// Assemble rows computed elsewhere; every vector must have one column
    /// per vocabulary term
    pub fn from_parts(ids: Vec<ItemId>, vectors: Vec<Vector>, vocabulary: Vocabulary) -> Result<Self> {
        if ids.len() != vectors.len() {
            return Err(Error::InvalidDimension {
                expected: ids.len(),
                actual: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.dim() != vocabulary.len()) {
            return Err(Error::InvalidDimension {
                expected: vocabulary.len(),
                actual: bad.dim(),
            });
        }
        Ok(Self { ids, vectors, vocabulary })
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    max_features: usize,
}

impl TfidfVectorizer {
    pub fn new(tokenizer: Tokenizer, max_features: usize) -> Result<Self> {
        if max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        Ok(Self { tokenizer, max_features })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let mut stop_words = if config.english_stop_words {
            StopWords::english()
        } else {
            StopWords::none()
        };
        stop_words.extend(&config.stop_words);
        Self::new(Tokenizer::new(config.min_token_len, stop_words), config.max_features)
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Learn the vocabulary from `corpus` and weight every document
    pub fn fit_transform(&self, corpus: &Corpus) -> TermWeights {
        let counts: Vec<AHashMap<String, u32>> = corpus
            .documents()
            .par_iter()
            .map(|doc| self.term_counts(doc))
            .collect();

        let stats = corpus_stats(&counts);
        let vocabulary = Vocabulary::select(&stats, counts.len(), self.max_features);

        let vectors: Vec<Vector> = counts
            .par_iter()
            .map(|doc| weigh(doc, &vocabulary))
            .collect();

        let empty = vectors.iter().filter(|v| v.is_zero()).count();
        info!(
            documents = vectors.len(),
            distinct_terms = stats.len(),
            vocabulary = vocabulary.len(),
            zero_vectors = empty,
            "vectorized corpus"
        );

        TermWeights {
            ids: corpus.ids().to_vec(),
            vectors,
            vocabulary,
        }
    }

    fn term_counts(&self, doc: &str) -> AHashMap<String, u32> {
        let mut counts = AHashMap::new();
        for token in self.tokenizer.tokenize(doc) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}

fn corpus_stats(counts: &[AHashMap<String, u32>]) -> AHashMap<String, TermStats> {
    let mut stats: AHashMap<String, TermStats> = AHashMap::new();
    for doc in counts {
        for (term, &count) in doc.iter() {
            let entry = stats.entry(term.clone()).or_default();
            entry.df += 1;
            entry.count += u64::from(count);
        }
    }
    stats
}

fn weigh(counts: &AHashMap<String, u32>, vocabulary: &Vocabulary) -> Vector {
    let mut vector = Vector::zeros(vocabulary.len());
    let idf = vocabulary.idf_values();
    let data = vector.as_mut_slice();
    for (term, &count) in counts.iter() {
        if let Some(col) = vocabulary.position(term) {
            data[col] = count as f32 * idf[col];
        }
    }
    vector.normalize();
    vector
}
