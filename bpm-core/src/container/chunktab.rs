use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::warn;

use crate::diag::{Diagnostics, SectionKind};
use crate::error::Result;
use crate::ids::{Guid, ShaHash};
use crate::options::DecodeOptions;
use crate::util::cursor::ByteCursor;
use crate::util::render::{FILESIZE_WIDTH, GROUP_WIDTH, zero_pad};

use super::section::{SectionFrame, read_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChunkInfo {
    pub guid: Guid,
    pub rolling_hash: u64,
    pub sha_hash: ShaHash,
    pub group_number: u8,
    pub window_size: u32,
    /// Size of the chunk's backing blob, not of the data it yields.
    pub file_size: u64,
}

impl ChunkInfo {
    pub fn group_label(&self) -> String {
        zero_pad(self.group_number as u64, GROUP_WIDTH)
    }

    pub fn file_size_label(&self) -> String {
        zero_pad(self.file_size, FILESIZE_WIDTH)
    }
}

/// Chunk rows in encounter order with a GUID index over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTable {
    entries: Vec<ChunkInfo>,
    index: HashMap<Guid, usize>,
}

impl ChunkTable {
    /// A repeated GUID replaces the earlier row in place and is reported.
    pub fn from_rows(rows: Vec<ChunkInfo>, diags: &mut Diagnostics) -> Self {
        let mut t = ChunkTable {
            entries: Vec::with_capacity(rows.len()),
            index: HashMap::with_capacity(rows.len()),
        };
        for row in rows {
            match t.index.get(&row.guid) {
                Some(&i) => {
                    warn!(guid = %row.guid, "duplicate chunk guid; keeping later row");
                    diags.duplicate_chunks.push(row.guid);
                    t.entries[i] = row;
                }
                None => {
                    t.index.insert(row.guid, t.entries.len());
                    t.entries.push(row);
                }
            }
        }
        t
    }

    pub fn get(&self, guid: &Guid) -> Option<&ChunkInfo> {
        self.index.get(guid).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.index.contains_key(guid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChunkInfo> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ChunkTable {
    type Item = &'a ChunkInfo;
    type IntoIter = std::slice::Iter<'a, ChunkInfo>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Serialized as GUID -> row, in encounter order.
impl Serialize for ChunkTable {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_map(self.entries.iter().map(|e| (e.guid, e)))
    }
}

/// Columns, in order: guids, rolling hashes, SHA digests, group numbers,
/// window sizes, blob sizes.
pub fn read_chunk_data_list(
    c: &mut ByteCursor<'_>,
    opts: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<ChunkTable> {
    let frame = SectionFrame::open(c, SectionKind::ChunkDataList, opts)?;
    let n = frame.element_count;

    let guids = read_column(c, n, 16, |c| c.read_guid())?;
    let rolling = read_column(c, n, 8, |c| c.read_u64())?;
    let shas = read_column(c, n, 20, |c| c.read_sha())?;
    let groups = read_column(c, n, 1, |c| c.read_u8())?;
    let windows = read_column(c, n, 4, |c| c.read_u32())?;
    let sizes = read_column(c, n, 8, |c| c.read_u64())?;

    let rows = guids
        .into_iter()
        .zip(rolling)
        .zip(shas)
        .zip(groups)
        .zip(windows)
        .zip(sizes)
        .map(
            |(((((guid, rolling_hash), sha_hash), group_number), window_size), file_size)| {
                ChunkInfo {
                    guid,
                    rolling_hash,
                    sha_hash,
                    group_number,
                    window_size,
                    file_size,
                }
            },
        )
        .collect();

    let table = ChunkTable::from_rows(rows, diags);
    frame.finish(c, diags)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManifestError;

    fn guid_bytes(seed: u8) -> [u8; 16] {
        std::array::from_fn(|i| seed.wrapping_add(i as u8))
    }

    fn section(seeds: &[u8], extra: &[u8]) -> Vec<u8> {
        let mut body = vec![0u8];
        body.extend_from_slice(&(seeds.len() as u32).to_le_bytes());
        for s in seeds {
            body.extend_from_slice(&guid_bytes(*s));
        }
        for s in seeds {
            body.extend_from_slice(&(*s as u64 * 1000).to_le_bytes());
        }
        for s in seeds {
            body.extend_from_slice(&[*s; 20]);
        }
        for s in seeds {
            body.push(*s % 100);
        }
        for _ in seeds {
            body.extend_from_slice(&1_048_576u32.to_le_bytes());
        }
        for s in seeds {
            body.extend_from_slice(&(*s as u64 + 500).to_le_bytes());
        }
        body.extend_from_slice(extra);
        let mut out = (body.len() as u32).to_le_bytes().to_vec();
        out.extend(body);
        out
    }

    #[test]
    fn columns_are_zipped_by_index() {
        let buf = section(&[1, 40], &[]);
        let mut c = ByteCursor::new(&buf);
        let mut d = Diagnostics::default();
        let t = read_chunk_data_list(&mut c, &DecodeOptions::default(), &mut d).unwrap();
        assert!(d.is_clean());
        assert_eq!(t.len(), 2);
        let rows: Vec<_> = t.iter().collect();
        assert_eq!(rows[0].guid, Guid::from_le_bytes(guid_bytes(1)));
        assert_eq!(rows[1].rolling_hash, 40_000);
        assert_eq!(rows[1].sha_hash, ShaHash([40; 20]));
        assert_eq!(rows[1].group_label(), "040");
        assert_eq!(rows[0].window_size, 1_048_576);
        assert_eq!(rows[0].file_size_label(), "000000000000000000000501");
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn empty_section_yields_empty_table() {
        let buf = section(&[], &[]);
        let mut c = ByteCursor::new(&buf);
        let t = read_chunk_data_list(&mut c, &DecodeOptions::default(), &mut Diagnostics::default())
            .unwrap();
        assert!(t.is_empty());
        assert_eq!(c.position(), 9);
    }

    #[test]
    fn unknown_trailing_column_is_skipped() {
        let mut buf = section(&[7], &[0xFF; 12]);
        buf.extend_from_slice(&0xCAFEu32.to_le_bytes());
        let mut c = ByteCursor::new(&buf);
        let mut d = Diagnostics::default();
        let t = read_chunk_data_list(&mut c, &DecodeOptions::default(), &mut d).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(d.section_mismatches.len(), 1);
        assert_eq!(c.read_u32().unwrap(), 0xCAFE);
    }

    #[test]
    fn duplicate_guid_keeps_later_row() {
        let buf = section(&[3, 3], &[]);
        let mut d = Diagnostics::default();
        let t = read_chunk_data_list(&mut ByteCursor::new(&buf), &DecodeOptions::default(), &mut d)
            .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(d.duplicate_chunks, vec![Guid::from_le_bytes(guid_bytes(3))]);
    }

    #[test]
    fn truncated_column_fails() {
        let buf = section(&[1, 2], &[]);
        let cut = &buf[..buf.len() - 3];
        let err = read_chunk_data_list(
            &mut ByteCursor::new(cut),
            &DecodeOptions::default(),
            &mut Diagnostics::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Truncated { missing: 3, .. }));
    }
}
