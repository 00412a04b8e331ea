//! Export layer: the filtered catalog and its similarity matrix as CSV
//! tables plus a checksummed manifest, written atomically and reloadable.

pub mod export;
pub mod load;
pub mod manifest;

pub use export::MatrixExporter;
pub use load::{load_export, ExportBundle};
pub use manifest::{ExportManifest, FileEntry};
