use serde::{Serialize, Serializer};

use crate::diag::{Diagnostics, SectionKind};
use crate::error::Result;
use crate::ids::{Guid, ShaHash};
use crate::options::DecodeOptions;
use crate::util::cursor::{ByteCursor, check_count};
use crate::util::render::{PART_WIDTH, zero_pad};

use super::section::{SectionFrame, read_column};

/// Bytes per serialized part: size header, guid, offset, size.
pub const CHUNK_PART_LEN: usize = 4 + 16 + 4 + 4;

/// A byte range inside one chunk. A file's parts, concatenated in order,
/// reproduce the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkPart {
    pub guid: Guid,
    pub offset: u32,
    pub size: u32,
}

impl ChunkPart {
    pub fn offset_label(&self) -> String {
        zero_pad(self.offset as u64, PART_WIDTH)
    }

    pub fn size_label(&self) -> String {
        zero_pad(self.size as u64, PART_WIDTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileManifestEntry {
    pub filename: String,
    pub symlink_target: String,
    #[serde(serialize_with = "sha_as_decimal")]
    pub file_hash: ShaHash,
    pub flags: u8,
    pub install_tags: Vec<String>,
    pub chunk_parts: Vec<ChunkPart>,
}

impl FileManifestEntry {
    /// Reconstructed length: the sum of part sizes.
    pub fn file_size(&self) -> u64 {
        self.chunk_parts.iter().map(|p| p.size as u64).sum()
    }

    pub fn is_symlink(&self) -> bool {
        !self.symlink_target.is_empty()
    }

    pub fn file_hash_decimal(&self) -> String {
        self.file_hash.to_decimal()
    }
}

fn sha_as_decimal<S: Serializer>(sha: &ShaHash, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&sha.to_decimal())
}

/// `count: u32` then `count` records of `{part_size, guid, offset, size}`.
/// `part_size` is read and dropped.
pub fn read_chunk_parts(c: &mut ByteCursor<'_>, opts: &DecodeOptions) -> Result<Vec<ChunkPart>> {
    let at = c.position();
    let count = c.read_u32()?;
    check_count(count, opts.max_elements, at, "chunk part array")?;
    let mut parts = Vec::with_capacity(c.capacity_hint(count, CHUNK_PART_LEN));
    for _ in 0..count {
        let _part_size = c.read_u32()?;
        parts.push(ChunkPart {
            guid: c.read_guid()?,
            offset: c.read_u32()?,
            size: c.read_u32()?,
        });
    }
    Ok(parts)
}

/// Columns, in order: filenames, symlink targets, file hashes, flags,
/// install tag arrays, then one chunk part array per file.
pub fn read_file_data_list(
    c: &mut ByteCursor<'_>,
    opts: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<Vec<FileManifestEntry>> {
    let frame = SectionFrame::open(c, SectionKind::FileDataList, opts)?;
    let n = frame.element_count;

    let filenames = read_column(c, n, 4, |c| c.read_string())?;
    let symlinks = read_column(c, n, 4, |c| c.read_string())?;
    let hashes = read_column(c, n, 20, |c| c.read_sha())?;
    let flags = read_column(c, n, 1, |c| c.read_u8())?;
    let tags = read_column(c, n, 4, |c| c.read_string_array(opts.max_elements))?;
    let parts = read_column(c, n, 4, |c| read_chunk_parts(c, opts))?;

    let files = filenames
        .into_iter()
        .zip(symlinks)
        .zip(hashes)
        .zip(flags)
        .zip(tags)
        .zip(parts)
        .map(
            |(((((filename, symlink_target), file_hash), flags), install_tags), chunk_parts)| {
                FileManifestEntry {
                    filename,
                    symlink_target,
                    file_hash,
                    flags,
                    install_tags,
                    chunk_parts,
                }
            },
        )
        .collect();

    frame.finish(c, diags)?;
    Ok(files)
}
