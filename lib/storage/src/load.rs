// Reload an export directory written by `MatrixExporter`
use crate::manifest::ExportManifest;
use anyhow::{bail, ensure, Context, Result};
use cinesim_core::{Catalog, Item, ItemId, Record};
use cinesim_similarity::SimilarityMatrix;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Everything an export holds
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub manifest: ExportManifest,
    pub catalog: Catalog,
    pub matrix: SimilarityMatrix,
}

/// Load and verify an export.
///
/// Checksums must match the manifest and the two tables must list the same
/// ids in the same order. Empty cells come back as absent fields; cells that
/// hold a JSON array or object are parsed back, anything else stays a string.
pub fn load_export<P: AsRef<Path>>(dir: P) -> Result<ExportBundle> {
    let dir = dir.as_ref();
    let manifest = ExportManifest::read(dir)?;
    manifest.catalog.verify(dir)?;
    manifest.similarity.verify(dir)?;
    debug!(dir = %dir.display(), "export checksums verified");

    let catalog = read_catalog(&dir.join(&manifest.catalog.name), &manifest.key)?;
    let matrix = read_matrix(&dir.join(&manifest.similarity.name))?;

    ensure!(
        catalog.ids().as_slice() == matrix.ids(),
        "catalog and similarity tables list different items"
    );
    ensure!(
        catalog.len() == manifest.items,
        "manifest records {} items, tables hold {}",
        manifest.items,
        catalog.len()
    );

    info!(dir = %dir.display(), items = catalog.len(), "export loaded");
    Ok(ExportBundle {
        manifest,
        catalog,
        matrix,
    })
}

fn read_catalog(path: &Path, key: &str) -> Result<Catalog> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    ensure!(
        headers.get(0) == Some(key),
        "{} does not start with the '{}' column",
        path.display(),
        key
    );

    let mut catalog = Catalog::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("{}: bad row {}", path.display(), line + 1))?;
        let raw_id = record.get(0).unwrap_or_default();
        let Some(id) = ItemId::parse(raw_id) else {
            bail!("{}: row {} has no usable id", path.display(), line + 1);
        };

        let mut fields = Record::new();
        fields.insert(key.to_string(), id.to_value());
        for (name, cell) in headers.iter().zip(record.iter()).skip(1) {
            if let Some(value) = parse_cell(cell) {
                fields.insert(name.to_string(), value);
            }
        }
        catalog.push(Item::new(id, fields))?;
    }
    Ok(catalog)
}

fn read_matrix(path: &Path) -> Result<SimilarityMatrix> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let ids = reader
        .headers()?
        .iter()
        .skip(1)
        .map(|raw| ItemId::parse(raw).with_context(|| format!("bad column label '{raw}'")))
        .collect::<Result<Vec<_>>>()?;

    let mut data = Vec::with_capacity(ids.len() * ids.len());
    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        ensure!(rows < ids.len(), "{} has more rows than columns", path.display());
        let label = record.get(0).and_then(ItemId::parse);
        ensure!(
            label.as_ref() == Some(&ids[rows]),
            "{}: row {} is labelled {:?}, expected {}",
            path.display(),
            rows + 1,
            record.get(0),
            ids[rows]
        );
        for cell in record.iter().skip(1) {
            let score: f32 = cell
                .parse()
                .with_context(|| format!("{}: bad score '{cell}'", path.display()))?;
            data.push(score);
        }
        rows += 1;
    }
    ensure!(rows == ids.len(), "{} has {} rows for {} columns", path.display(), rows, ids.len());

    Ok(SimilarityMatrix::from_parts(ids, data)?)
}

fn parse_cell(cell: &str) -> Option<Value> {
    if cell.is_empty() {
        return None;
    }
    if cell.starts_with('[') || cell.starts_with('{') {
        if let Ok(value) = serde_json::from_str(cell) {
            return Some(value);
        }
    }
    Some(Value::String(cell.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MatrixExporter;
    use crate::manifest::{CATALOG_FILE, SIMILARITY_FILE};
    use serde_json::json;
    use std::fs;

    fn catalog() -> Catalog {
        let rows: Vec<Record> = serde_json::from_value(json!([
            {"id": 7, "title": "Alien", "genres": [{"id": 27, "name": "Horror"}], "tagline": ""},
            {"id": "tt-x", "title": "[Rec]"},
        ]))
        .unwrap();
        let items = rows
            .into_iter()
            .map(|r| Item::new(ItemId::from_value(&r["id"]).unwrap(), r))
            .collect();
        Catalog::from_items(items).unwrap()
    }

    fn write(dir: &Path) -> (Catalog, SimilarityMatrix) {
        let catalog = catalog();
        let matrix =
            SimilarityMatrix::from_parts(catalog.ids(), vec![1.0, 0.375, 0.375, 1.0])
                .unwrap();
        MatrixExporter::new(dir, "id")
            .unwrap()
            .export(&catalog, &matrix, 3)
            .unwrap();
        (catalog, matrix)
    }

    #[test]
    fn test_reload_preserves_ids_scores_and_nested_fields() {
        let dir = tempfile::tempdir().unwrap();
        let (catalog, matrix) = write(dir.path());

        let bundle = load_export(dir.path()).unwrap();
        assert_eq!(bundle.matrix, matrix);
        assert_eq!(bundle.catalog.ids(), catalog.ids());
        assert_eq!(bundle.manifest.vocabulary, 3);

        let alien = bundle.catalog.get(&ItemId::Integer(7)).unwrap();
        assert_eq!(alien.get("genres"), Some(&json!([{"id": 27, "name": "Horror"}])));
        assert_eq!(alien.get_str("title"), Some("Alien"));
        assert!(alien.get("tagline").is_none());

        // Text that merely looks like JSON is kept as text
        let rec = bundle.catalog.get(&ItemId::String("tt-x".into())).unwrap();
        assert_eq!(rec.get_str("title"), Some("[Rec]"));
    }

    #[test]
    fn test_tampered_table_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path());
        let path = dir.path().join(SIMILARITY_FILE);
        let text = fs::read_to_string(&path).unwrap().replace("0.375", "0.9");
        fs::write(&path, text).unwrap();

        let err = load_export(dir.path()).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_missing_table_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path());
        fs::remove_file(dir.path().join(CATALOG_FILE)).unwrap();
        assert!(load_export(dir.path()).is_err());
    }

    #[test]
    fn test_missing_manifest_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_export(dir.path()).is_err());
    }
}
