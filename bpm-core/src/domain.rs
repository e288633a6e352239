// bpm_core/src/domain.rs
use crate::ids::Guid;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct FileRow {
    pub path: String,
    pub size: u64,
    pub parts: usize,
    pub symlink_target: Option<String>,
    pub install_tags: Vec<String>,
}

/// One chunk part positioned within its file. Chunk-side fields are `None`
/// when the part's GUID is dangling.
#[derive(Clone, Debug, Serialize)]
pub struct ChunkRow {
    pub ordinal: u64,
    pub guid: Guid,
    pub file_off: u64,
    pub chunk_off: u32,
    pub len: u32,
    pub group: Option<u8>,
    pub window_size: Option<u32>,
    pub blob_size: Option<u64>,
    pub pct_end: f32,
}
