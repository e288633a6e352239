use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FILE_VERSION: u32 = 32;
pub const DEFAULT_MAX_ELEMENTS: u32 = 5_000_000;

/// Decode limits. Counts above `max_elements` are rejected before anything is
/// allocated for them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_file_version: u32,
    pub max_elements: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_file_version: DEFAULT_MAX_FILE_VERSION,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}
