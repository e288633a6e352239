#![forbid(unsafe_code)]

pub mod diag;
pub mod domain;
pub mod error;
pub mod export;
pub mod ids;
pub mod options;
pub mod stats;

pub mod util {
    pub mod cursor;
    pub mod render;
}

pub mod container {
    pub mod chunktab;
    pub mod custom;
    pub mod filelist;
    pub mod header;
    pub mod manifest;
    pub mod scalars;
    pub mod section;
}

pub mod read {
    pub mod decode;
    pub mod opened;
}

pub mod list;

// Re-exports: stable API surface
pub use container::manifest::Manifest;
pub use diag::Diagnostics;
pub use error::{ManifestError, Result};
pub use export::{ExportFormat, export};
pub use list::list;
pub use options::DecodeOptions;
pub use read::decode::{Decoded, decode, decode_with};
pub use read::opened::Opened;
