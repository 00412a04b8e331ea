//! Stage wiring: Merger -> Filter -> Corpus Builder -> Vectorizer ->
//! Similarity Engine, with the Exporter as an explicit final step.
//!
//! Each stage hands an owned value to the next; nothing is mutated in place
//! once produced.

use cinesim_core::{
    Catalog, CatalogMerger, CorpusBuilder, Error, FilterReport, PipelineConfig, Record,
    RecordFilter, Result,
};
use cinesim_similarity::{SimilarityEngine, SimilarityMatrix};
use cinesim_storage::{ExportManifest, MatrixExporter};
use cinesim_text::{TermWeights, TfidfVectorizer};
use std::path::Path;
use tracing::info;

/// A validated, reusable pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    merger: CatalogMerger,
    filter: RecordFilter,
    corpus: CorpusBuilder,
    vectorizer: TfidfVectorizer,
    engine: SimilarityEngine,
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Items matched by the merge, before filtering
    pub merged: usize,
    pub report: FilterReport,
    /// Filtered catalog, in the row order of `weights` and `matrix`
    pub catalog: Catalog,
    pub weights: TermWeights,
    pub matrix: SimilarityMatrix,
}

impl Pipeline {
    /// Fails fast on an invalid configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            merger: CatalogMerger::from_config(&config),
            filter: RecordFilter::new(
                config.status_field.clone(),
                config.status_value.clone(),
                config.required_fields.clone(),
            ),
            corpus: CorpusBuilder::new(config.text_fields.clone()),
            vectorizer: TfidfVectorizer::from_config(&config)?,
            engine: SimilarityEngine::default(),
            config,
        })
    }

    /// Run the similarity rows sequentially instead of on the rayon pool
    pub fn sequential(mut self) -> Self {
        self.engine = SimilarityEngine::new(false);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, left: &[Record], right: &[Record]) -> Result<PipelineOutput> {
        self.check_fields(left, right)?;

        let merged = self.merger.merge(left, right);
        let (catalog, report) = self.filter.apply(&merged);
        let corpus = self.corpus.build(&catalog);
        let weights = self.vectorizer.fit_transform(&corpus);
        let matrix = self.engine.compute(&weights)?;

        info!(
            merged = merged.len(),
            kept = catalog.len(),
            vocabulary = weights.dim(),
            "pipeline finished"
        );
        Ok(PipelineOutput {
            merged: merged.len(),
            report,
            catalog,
            weights,
            matrix,
        })
    }

    /// Every configured field must appear in at least one record
    fn check_fields(&self, left: &[Record], right: &[Record]) -> Result<()> {
        if left.is_empty() && right.is_empty() {
            return Ok(());
        }
        let present = |rows: &[Record], field: &str| rows.iter().any(|r| r.contains_key(field));

        if !left.is_empty() && !present(left, &self.config.left_key) {
            return Err(Error::UnknownField {
                field: self.config.left_key.clone(),
                source_name: "left".to_string(),
            });
        }
        if !right.is_empty() && !present(right, &self.config.right_key) {
            return Err(Error::UnknownField {
                field: self.config.right_key.clone(),
                source_name: "right".to_string(),
            });
        }
        for field in self.config.referenced_fields() {
            if !present(left, field) && !present(right, field) {
                return Err(Error::UnknownField {
                    field: field.to_string(),
                    source_name: "left or right".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl PipelineOutput {
    /// Write the catalog, matrix and manifest into `dir`
    pub fn export<P: AsRef<Path>>(&self, dir: P, key: &str) -> anyhow::Result<ExportManifest> {
        MatrixExporter::new(dir, key)?.export(&self.catalog, &self.matrix, self.weights.dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let config = PipelineConfig {
            max_features: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(Pipeline::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_field_detected_before_merge() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let left = rows(json!([{"id": 1, "status": "Released", "overview": "a heist"}]));
        let right = rows(json!([{"movie_id": 1, "cast": []}]));
        // `tagline` is referenced by the default text fields but missing everywhere
        let err = pipeline.run(&left, &right).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "tagline"));

        let right = rows(json!([{"id": 1}]));
        let left = rows(json!([{"id": 1, "status": "Released", "overview": "", "tagline": ""}]));
        let err = pipeline.run(&left, &right).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "movie_id"));
    }

    #[test]
    fn test_empty_sources_produce_empty_output() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let output = pipeline.run(&[], &[]).unwrap();
        assert_eq!(output.merged, 0);
        assert!(output.catalog.is_empty());
        assert!(output.matrix.is_empty());
        assert_eq!(output.weights.dim(), 0);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let left = rows(json!([
            {"id": 1, "status": "Released", "overview": "bank heist crew", "tagline": null},
            {"id": 2, "status": "Released", "overview": "heist gone wrong", "tagline": "crew"},
            {"id": 3, "status": "Released", "overview": "space station", "tagline": "alone"},
        ]));
        let right = rows(json!([{"movie_id": 1}, {"movie_id": 2}, {"movie_id": 3}]));
        let config = PipelineConfig::default();
        let parallel = Pipeline::new(config.clone()).unwrap().run(&left, &right).unwrap();
        let sequential = Pipeline::new(config)
            .unwrap()
            .sequential()
            .run(&left, &right)
            .unwrap();
        assert_eq!(parallel.matrix, sequential.matrix);
    }
}
