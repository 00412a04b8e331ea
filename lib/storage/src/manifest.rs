// Export manifest: what was written, when, and the checksums to verify it
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub const CATALOG_FILE: &str = "catalog.csv";
pub const SIMILARITY_FILE: &str = "similarity.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub sha256: String,
}

impl FileEntry {
    /// Describe a file already on disk
    pub fn describe(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        let data = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            name: name.to_string(),
            size: data.len() as u64,
            sha256: checksum(&data),
        })
    }

    /// Fail if the file under `dir` no longer matches this entry
    pub fn verify(&self, dir: &Path) -> Result<()> {
        let actual = Self::describe(dir, &self.name)?;
        if actual.sha256 != self.sha256 {
            bail!(
                "checksum mismatch for {}: expected {}, found {}",
                self.name,
                self.sha256,
                actual.sha256
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub created_at: DateTime<Utc>,
    /// Name of the identifier column in both tables
    pub key: String,
    pub items: usize,
    pub vocabulary: usize,
    pub catalog: FileEntry,
    pub similarity: FileEntry,
}

impl ExportManifest {
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let data = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("invalid manifest {}", path.display()))
    }
}

pub fn checksum(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_detects_tampering() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "id\n1\n").unwrap();
        let entry = FileEntry::describe(dir.path(), "a.csv").unwrap();
        assert_eq!(entry.size, 5);
        assert!(entry.verify(dir.path()).is_ok());

        fs::write(dir.path().join("a.csv"), "id\n2\n").unwrap();
        assert!(entry.verify(dir.path()).is_err());
    }
}
