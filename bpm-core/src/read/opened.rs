use crate::container::manifest::Manifest;
use crate::diag::Diagnostics;
use crate::domain::{ChunkRow, FileRow};
use crate::error::{ManifestError, Result};
use crate::options::DecodeOptions;
use crate::read::decode::{Decoded, decode_with};
use std::path::{Path, PathBuf};

/// A manifest file read from disk and decoded.
pub struct Opened {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub diagnostics: Diagnostics,
}

impl Opened {
    pub fn open(path: &Path, opts: &DecodeOptions) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let Decoded {
            manifest,
            diagnostics,
        } = decode_with(&bytes, opts)?;
        Ok(Self {
            path: path.to_path_buf(),
            manifest,
            diagnostics,
        })
    }

    pub fn list_entries(&self) -> impl Iterator<Item = FileRow> + '_ {
        self.manifest.list_entries()
    }

    pub fn chunk_map_for(&self, path: &str) -> Result<Vec<ChunkRow>> {
        self.manifest.chunk_map(path).ok_or_else(|| {
            ManifestError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            ))
        })
    }
}
