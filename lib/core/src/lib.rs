//! # cinesim Core
//!
//! Core library for the cinesim similarity index.
//!
//! This crate provides the data model and the row-level stages of the
//! batch pipeline:
//!
//! - [`Item`] / [`ItemId`] - a merged catalog entry and its identifier
//! - [`Catalog`] - ordered items with an identifier lookup
//! - [`CatalogMerger`] - inner join of two record sets
//! - [`RecordFilter`] - lifecycle-status and required-field validity filter
//! - [`CorpusBuilder`] - one text document per item
//! - [`Vector`] - dense term-weight vector with SIMD operations
//!
//! ## Example
//!
//! ```rust
//! use cinesim_core::{CatalogMerger, CorpusBuilder, Record, RecordFilter};
//! use serde_json::json;
//!
//! let movies: Vec<Record> = serde_json::from_value(json!([
//!     {"id": 1, "title": "Heat", "status": "Released", "overview": "A heist in LA."},
//! ])).unwrap();
//! let credits: Vec<Record> = serde_json::from_value(json!([
//!     {"movie_id": 1, "title": "Heat", "cast": []},
//! ])).unwrap();
//!
//! let merged = CatalogMerger::new("id", "movie_id").merge(&movies, &credits);
//! let (catalog, _report) = RecordFilter::new("status", "Released", vec!["overview".into()])
//!     .apply(&merged);
//! let corpus = CorpusBuilder::new(vec!["overview".into()]).build(&catalog);
//! assert_eq!(corpus.documents(), &["A heist in LA.".to_string()]);
//! ```

pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod item;
pub mod merge;
pub mod vector;

/// SIMD-optimized vector operations
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use catalog::Catalog;
pub use config::{PipelineConfig, Side};
pub use corpus::{Corpus, CorpusBuilder};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, FilterReport, PayloadFilter, RecordFilter};
pub use item::{Item, ItemId, Record};
pub use merge::CatalogMerger;
pub use vector::Vector;
