//! # cinesim
//!
//! Content-based movie similarity: merge two record sources, keep the valid
//! items, weight their overview text with TF-IDF and compute a dense
//! all-pairs cosine matrix, in one deterministic batch pass.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cinesim build --left movies.json --right credits.json --out ./export
//! cinesim similar --data ./export --title "Heat" --top-k 5 --genre Crime --actor "Al Pacino"
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use cinesim::prelude::*;
//! use serde_json::json;
//!
//! let left: Vec<Record> = serde_json::from_value(json!([
//!     {"id": 1, "status": "Released", "overview": "a bank heist in los angeles", "tagline": null},
//!     {"id": 2, "status": "Released", "overview": "a bank heist goes wrong", "tagline": null},
//! ])).unwrap();
//! let right: Vec<Record> = serde_json::from_value(json!([
//!     {"movie_id": 1}, {"movie_id": 2},
//! ])).unwrap();
//!
//! let output = Pipeline::new(PipelineConfig::default())?.run(&left, &right)?;
//! assert_eq!(output.matrix.dim(), 2);
//! assert!(output.matrix.is_symmetric(1e-6));
//! # Ok::<(), cinesim::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - `cinesim-core` - items, catalog, merger, filter, corpus builder, configuration
//! - `cinesim-text` - tokenizer, stop words, vocabulary selection, TF-IDF
//! - `cinesim-similarity` - dense cosine matrix and neighbour lookup
//! - `cinesim-storage` - CSV export, manifest, reload

pub mod pipeline;

// Re-export core types
pub use cinesim_core::{
    Catalog, CatalogMerger, Corpus, CorpusBuilder, Error, Filter, FilterCondition,
    FilterReport, Item, ItemId, PayloadFilter, PipelineConfig, Record, RecordFilter, Result,
    Side, Vector,
};

// Re-export text, similarity and storage
pub use cinesim_similarity::{
    facet_filter, Neighbour, Recommender, SimilarityEngine, SimilarityMatrix,
};
pub use cinesim_storage::{load_export, ExportBundle, ExportManifest, MatrixExporter};
pub use cinesim_text::{StopWords, TermWeights, TfidfVectorizer, Tokenizer, Vocabulary};

pub use pipeline::{Pipeline, PipelineOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_export, Catalog, Error, Filter, FilterCondition, ItemId, MatrixExporter,
        PayloadFilter, Pipeline, PipelineConfig, PipelineOutput, Record, Recommender, Result,
        SimilarityMatrix,
    };
}

/// SIMD kernels used by the similarity engine
pub mod simd {
    pub use cinesim_core::simd::{dot_product_simd, norm_simd};
}
