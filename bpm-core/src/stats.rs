use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub files: u64,
    pub symlinks: u64,
    pub chunks: u64,
    pub parts: u64,
    /// Sum of reconstructed file sizes.
    pub logical_bytes: u64,
    /// Sum of chunk blob sizes as listed in the chunk table.
    pub chunk_blob_bytes: u64,
    pub custom_fields: u64,
    /// Distinct install tags in first-seen order.
    pub install_tags: Vec<String>,
}

impl Stats {
    /// Logical bytes per stored blob byte; 0.0 for an empty chunk table.
    pub fn reuse_ratio(&self) -> f32 {
        if self.chunk_blob_bytes == 0 {
            return 0.0;
        }
        (self.logical_bytes as f64 / self.chunk_blob_bytes as f64) as f32
    }
}
