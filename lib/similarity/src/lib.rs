//! # cinesim Similarity
//!
//! Dense all-pairs cosine similarity over term-weight vectors, and offline
//! neighbour lookup on the result.
//!
//! ## Example
//!
//! ```rust
//! use cinesim_core::{Corpus, ItemId};
//! use cinesim_similarity::SimilarityEngine;
//! use cinesim_text::{TfidfVectorizer, Tokenizer};
//!
//! let corpus = Corpus::from_parts(
//!     vec![ItemId::Integer(1), ItemId::Integer(2)],
//!     vec!["bank heist crew".to_string(), "bank heist crew".to_string()],
//! ).unwrap();
//! let weights = TfidfVectorizer::new(Tokenizer::default(), 100)
//!     .unwrap()
//!     .fit_transform(&corpus);
//!
//! let matrix = SimilarityEngine::default().compute(&weights).unwrap();
//! let score = matrix.get(&ItemId::Integer(1), &ItemId::Integer(2)).unwrap();
//! assert!((score - 1.0).abs() < 1e-5);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ TermWeights │────>│   Engine    │────>│   Matrix    │
//! │  (N x V)    │     │ (row tasks) │     │ (N x N, ids)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐            │
//!                     │ Recommender │<───────────┘
//!                     │ (top-k, ids)│
//!                     └─────────────┘
//! ```

pub mod engine;
pub mod matrix;
pub mod recommend;

pub use engine::SimilarityEngine;
pub use matrix::SimilarityMatrix;
pub use recommend::{facet_filter, Neighbour, Recommender};
