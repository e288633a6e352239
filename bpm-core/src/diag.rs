use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::Guid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    ChunkDataList,
    FileDataList,
    CustomFields,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectionKind::ChunkDataList => "chunk data list",
            SectionKind::FileDataList => "file data list",
            SectionKind::CustomFields => "custom fields",
        })
    }
}

/// Bytes consumed by the known fields differed from the section's declared
/// size. The cursor was moved to `start + declared` regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSizeMismatch {
    pub section: SectionKind,
    pub start: usize,
    pub declared: u32,
    pub consumed: usize,
}

impl SectionSizeMismatch {
    /// Declared size exceeded what was read: unknown trailing data was skipped.
    pub fn is_trailing_data(&self) -> bool {
        self.consumed < self.declared as usize
    }
}

/// A chunk part whose GUID has no entry in the chunk table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub file_index: usize,
    pub filename: String,
    pub part_index: usize,
    pub guid: Guid,
}

/// Non-fatal findings collected during a decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub section_mismatches: Vec<SectionSizeMismatch>,
    pub dangling_references: Vec<DanglingReference>,
    pub duplicate_chunks: Vec<Guid>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.section_mismatches.is_empty()
            && self.dangling_references.is_empty()
            && self.duplicate_chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.section_mismatches.len() + self.dangling_references.len() + self.duplicate_chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One human-readable line per finding.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        for m in &self.section_mismatches {
            out.push(format!(
                "{} at offset {}: declared {} bytes, decoded {}",
                m.section, m.start, m.declared, m.consumed
            ));
        }
        for d in &self.duplicate_chunks {
            out.push(format!("duplicate chunk {d}"));
        }
        for r in &self.dangling_references {
            out.push(format!(
                "{} part #{} references unknown chunk {}",
                r.filename, r.part_index, r.guid
            ));
        }
        out
    }
}
