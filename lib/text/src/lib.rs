//! # cinesim Text
//!
//! TF-IDF vectorization of the item corpus.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Corpus    │────>│  Tokenizer  │────>│ Term counts │
//! │ (documents) │     │ (stop words)│     │ per document│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐            │
//!                     │ Vocabulary  │<───────────┘
//!                     │ (top V, idf)│
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │ TermWeights │
//!                     │ (N x V, L2) │
//!                     └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cinesim_core::{Corpus, ItemId};
//! use cinesim_text::{TfidfVectorizer, Tokenizer};
//!
//! let corpus = Corpus::from_parts(
//!     vec![ItemId::Integer(1), ItemId::Integer(2)],
//!     vec!["space pirates".to_string(), "space cowboys".to_string()],
//! ).unwrap();
//! let weights = TfidfVectorizer::new(Tokenizer::default(), 100)
//!     .unwrap()
//!     .fit_transform(&corpus);
//! assert_eq!(weights.len(), 2);
//! assert_eq!(weights.dim(), 3);
//! ```

pub mod stopwords;
pub mod tokenize;
pub mod vectorizer;
pub mod vocabulary;

pub use stopwords::{StopWords, ENGLISH_STOP_WORDS};
pub use tokenize::Tokenizer;
pub use vectorizer::{TermWeights, TfidfVectorizer};
pub use vocabulary::{idf, TermStats, Vocabulary};
