use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read ran past the end of the buffer.
    #[error("truncated input: need {missing} more byte(s) at offset {offset}")]
    Truncated { offset: usize, missing: usize },

    #[error("bad manifest magic: 0x{found:08x} (expected 0x{expected:08x})")]
    BadMagic { found: u32, expected: u32 },

    #[error("unsupported manifest file version {found} (supported 1..={max})")]
    UnsupportedVersion { found: u32, max: u32 },

    #[error("Format error: {0}")]
    Format(String),
}

impl ManifestError {
    /// True for the fatal layout errors (bad magic, unsupported version, malformed framing).
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            ManifestError::BadMagic { .. }
                | ManifestError::UnsupportedVersion { .. }
                | ManifestError::Format(_)
        )
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ManifestError>;
