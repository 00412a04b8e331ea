//! Matrix exporter
//!
//! Writes the filtered catalog and the similarity matrix as CSV tables, then
//! a manifest with their checksums. Each file goes to a temporary name in
//! the target directory and is renamed into place only once fully written,
//! so a failed export never leaves a truncated table behind under the
//! final name. Failures are returned as-is; nothing is retried.

use crate::manifest::{ExportManifest, FileEntry, CATALOG_FILE, MANIFEST_FILE, SIMILARITY_FILE};
use anyhow::{bail, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::Utc;
use cinesim_core::merge::is_collision_copy;
use cinesim_core::Catalog;
use cinesim_similarity::SimilarityMatrix;
use serde_json::Value;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct MatrixExporter {
    dir: PathBuf,
    key: String,
}

impl MatrixExporter {
    /// `key` names the identifier column in both tables
    pub fn new<P: AsRef<Path>>(dir: P, key: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;
        Ok(Self {
            dir,
            key: key.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write both tables and the manifest
    pub fn export(
        &self,
        catalog: &Catalog,
        matrix: &SimilarityMatrix,
        vocabulary: usize,
    ) -> Result<ExportManifest> {
        let catalog_ids = catalog.ids();
        if catalog_ids.as_slice() != matrix.ids() {
            bail!(
                "catalog ({} items) and similarity matrix ({} items) are not aligned",
                catalog.len(),
                matrix.dim()
            );
        }

        self.write_catalog(catalog)?;
        self.write_matrix(matrix)?;

        let manifest = ExportManifest {
            created_at: Utc::now(),
            key: self.key.clone(),
            items: catalog.len(),
            vocabulary,
            catalog: FileEntry::describe(&self.dir, CATALOG_FILE)?,
            similarity: FileEntry::describe(&self.dir, SIMILARITY_FILE)?,
        };
        let json = serde_json::to_vec_pretty(&manifest)?;
        write_atomic(&self.dir.join(MANIFEST_FILE), |f| io::Write::write_all(f, &json))?;

        info!(dir = %self.dir.display(), items = manifest.items, "export written");
        Ok(manifest)
    }

    /// One row per item: id column first, then every field name in sorted
    /// order. Suffixed copies left by a merge collision are not written.
    pub fn write_catalog(&self, catalog: &Catalog) -> Result<()> {
        let all = catalog.columns();
        let columns: Vec<&String> = all
            .iter()
            .filter(|c| *c != &self.key)
            .filter(|c| !is_collision_copy(c, all.iter().map(String::as_str)))
            .collect();

        write_atomic(&self.dir.join(CATALOG_FILE), |f| {
            let mut writer = csv::Writer::from_writer(f);
            writer.write_field(&self.key)?;
            writer.write_record(&columns)?;
            for item in catalog {
                writer.write_field(item.id.to_string())?;
                writer.write_record(columns.iter().map(|c| cell_text(item.get(c))))?;
            }
            writer.flush()
        })
    }

    /// Square table labelled by item id on both axes
    pub fn write_matrix(&self, matrix: &SimilarityMatrix) -> Result<()> {
        write_atomic(&self.dir.join(SIMILARITY_FILE), |f| {
            let mut writer = csv::Writer::from_writer(f);
            writer.write_field(&self.key)?;
            writer.write_record(matrix.ids().iter().map(ToString::to_string))?;
            for (id, row) in matrix.rows() {
                writer.write_field(id.to_string())?;
                writer.write_record(row.iter().map(ToString::to_string))?;
            }
            writer.flush()
        })
    }
}

/// Table cell for a field. Nested values are kept as compact JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(write)
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
        })
        .with_context(|| format!("failed to write {}", path.display()))
}
