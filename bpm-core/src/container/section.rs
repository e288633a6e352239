use tracing::{debug, warn};

use crate::diag::{Diagnostics, SectionKind, SectionSizeMismatch};
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::util::cursor::{ByteCursor, check_count};

/// Framing shared by every sized section:
/// `size: u32, version: u8, count: u32, <payload>`.
/// `start` is the offset right after `size`; the section ends at `start + size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionFrame {
    pub kind: SectionKind,
    pub start: usize,
    pub declared_size: u32,
    pub version: u8,
    pub element_count: u32,
}

impl SectionFrame {
    pub fn open(c: &mut ByteCursor<'_>, kind: SectionKind, opts: &DecodeOptions) -> Result<Self> {
        let declared_size = c.read_u32()?;
        let start = c.position();
        let version = c.read_u8()?;
        let count_at = c.position();
        let element_count = c.read_u32()?;
        check_count(element_count, opts.max_elements, count_at, &kind.to_string())?;
        debug!(%kind, start, declared_size, version, element_count, "section");
        Ok(Self {
            kind,
            start,
            declared_size,
            version,
            element_count,
        })
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.declared_size as usize
    }

    /// Reposition to the declared end. Never trusts field consumption.
    pub fn finish(self, c: &mut ByteCursor<'_>, diags: &mut Diagnostics) -> Result<()> {
        let consumed = c.position() - self.start;
        if consumed != self.declared_size as usize {
            warn!(
                section = %self.kind,
                start = self.start,
                declared = self.declared_size,
                consumed,
                "section size mismatch; seeking to declared end"
            );
            diags.section_mismatches.push(SectionSizeMismatch {
                section: self.kind,
                start: self.start,
                declared: self.declared_size,
                consumed,
            });
        }
        c.seek(self.end())
    }
}

/// One column of a columnar section: `count` values of the same field, back to back.
pub fn read_column<'a, T>(
    c: &mut ByteCursor<'a>,
    count: u32,
    min_size: usize,
    mut read_one: impl FnMut(&mut ByteCursor<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(c.capacity_hint(count, min_size));
    for _ in 0..count {
        out.push(read_one(c)?);
    }
    Ok(out)
}
