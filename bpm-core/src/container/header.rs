use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::options::DecodeOptions;
use crate::util::cursor::ByteCursor;

pub const MAGIC: u32 = 0x44BE_C00C;
/// magic + header_size + compressed_size + uncompressed_size
pub const FIXED_HEADER_LEN: u32 = 16;
pub const META_RUN_LEN: usize = 14;

/// The 14-byte run read at `header_size`. Field boundaries come from observed
/// samples, so every raw value is kept even where its meaning is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRun {
    pub leading: u32,
    pub flag: u8,
    pub file_version: u32,
    pub reserved: u32,
    pub trailing: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub magic: u32,
    pub header_size: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub meta: MetaRun,
}

impl ManifestHeader {
    #[inline]
    pub fn file_version(&self) -> u32 {
        self.meta.file_version
    }

    #[inline]
    pub fn is_file_data(&self) -> bool {
        self.meta.flag & 0x01 != 0
    }

    /// Validates magic and version and leaves the cursor just past the meta run.
    pub fn read_from(c: &mut ByteCursor<'_>, opts: &DecodeOptions) -> Result<Self> {
        let magic = c.read_u32()?;
        if magic != MAGIC {
            return Err(ManifestError::BadMagic {
                found: magic,
                expected: MAGIC,
            });
        }
        let header_size = c.read_u32()?;
        let compressed_size = c.read_u32()?;
        let uncompressed_size = c.read_u32()?;
        if header_size < FIXED_HEADER_LEN {
            return Err(ManifestError::Format(format!(
                "header size {header_size} smaller than fixed header ({FIXED_HEADER_LEN})"
            )));
        }

        c.seek(header_size as usize)?;
        let meta = MetaRun {
            leading: c.read_u32()?,
            flag: c.read_u8()?,
            file_version: c.read_u32()?,
            reserved: c.read_u32()?,
            trailing: c.read_u8()?,
        };
        debug!(
            header_size,
            compressed_size,
            uncompressed_size,
            leading = meta.leading,
            flag = meta.flag,
            file_version = meta.file_version,
            "manifest header"
        );

        if meta.file_version == 0 || meta.file_version > opts.max_file_version {
            return Err(ManifestError::UnsupportedVersion {
                found: meta.file_version,
                max: opts.max_file_version,
            });
        }

        Ok(Self {
            magic,
            header_size,
            compressed_size,
            uncompressed_size,
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(magic: u32, header_size: u32, flag: u8, version: u32) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&magic.to_le_bytes());
        v.extend_from_slice(&header_size.to_le_bytes());
        v.extend_from_slice(&1000u32.to_le_bytes());
        v.extend_from_slice(&4000u32.to_le_bytes());
        v.resize(header_size as usize, 0xEE);
        v.extend_from_slice(&145u32.to_le_bytes());
        v.push(flag);
        v.extend_from_slice(&version.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        v.push(0x5A);
        v
    }

    #[test]
    fn reads_header_and_meta_run() {
        let buf = header_bytes(MAGIC, 41, 0x03, 21);
        let mut c = ByteCursor::new(&buf);
        let h = ManifestHeader::read_from(&mut c, &DecodeOptions::default()).unwrap();
        assert_eq!(h.header_size, 41);
        assert_eq!(h.compressed_size, 1000);
        assert_eq!(h.uncompressed_size, 4000);
        assert_eq!(h.file_version(), 21);
        assert!(h.is_file_data());
        assert_eq!(h.meta.leading, 145);
        assert_eq!(h.meta.trailing, 0x5A);
        assert_eq!(c.position(), 41 + META_RUN_LEN);
    }

    #[test]
    fn flag_bit_zero_is_file_data() {
        let buf = header_bytes(MAGIC, 16, 0x02, 21);
        let h = ManifestHeader::read_from(&mut ByteCursor::new(&buf), &DecodeOptions::default())
            .unwrap();
        assert!(!h.is_file_data());
    }

    #[test]
    fn bad_magic_is_fatal() {
        let buf = header_bytes(0x1234_5678, 16, 0, 21);
        let err = ManifestHeader::read_from(&mut ByteCursor::new(&buf), &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, ManifestError::BadMagic { found: 0x1234_5678, .. }));
    }

    #[test]
    fn version_outside_range_is_rejected() {
        let opts = DecodeOptions::default();
        for v in [0, opts.max_file_version + 1] {
            let buf = header_bytes(MAGIC, 16, 0, v);
            let err = ManifestHeader::read_from(&mut ByteCursor::new(&buf), &opts).unwrap_err();
            assert!(matches!(err, ManifestError::UnsupportedVersion { found, .. } if found == v));
        }
    }

    #[test]
    fn undersized_header_is_format_error() {
        let mut buf = header_bytes(MAGIC, 16, 0, 21);
        buf[4..8].copy_from_slice(&8u32.to_le_bytes());
        let err = ManifestHeader::read_from(&mut ByteCursor::new(&buf), &DecodeOptions::default())
            .unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn header_size_past_end_is_truncation() {
        let mut buf = header_bytes(MAGIC, 16, 0, 21);
        buf[4..8].copy_from_slice(&500u32.to_le_bytes());
        let err = ManifestHeader::read_from(&mut ByteCursor::new(&buf), &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, ManifestError::Truncated { .. }));
    }
}
