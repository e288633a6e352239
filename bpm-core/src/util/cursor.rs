use crate::error::{ManifestError, Result};
use crate::ids::{Guid, ShaHash};

/// Bounds-checked little-endian reader over an in-memory manifest buffer.
///
/// Every read either returns the requested bytes and advances, or fails with
/// [`ManifestError::Truncated`] carrying the offset where the read started and
/// how many bytes were missing. The position never moves on failure.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move to an absolute offset. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(ManifestError::Truncated {
                offset: self.pos,
                missing: pos - self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let have = self.remaining();
        if n > have {
            return Err(ManifestError::Truncated {
                offset: self.pos,
                missing: n - have,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    pub fn read_guid(&mut self) -> Result<Guid> {
        Ok(Guid::from_le_bytes(self.read_array::<16>()?))
    }

    pub fn read_sha(&mut self) -> Result<ShaHash> {
        Ok(ShaHash(self.read_array::<20>()?))
    }

    /// Length-prefixed string. The u32 length counts a trailing NUL which is
    /// dropped; invalid UTF-8 is replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = match self.read(len) {
            Ok(b) => b,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };
        Ok(String::from_utf8_lossy(&bytes[..len - 1]).into_owned())
    }

    /// u32 count followed by that many strings.
    pub fn read_string_array(&mut self, max_elements: u32) -> Result<Vec<String>> {
        let at = self.pos;
        let count = self.read_u32()?;
        check_count(count, max_elements, at, "string array")?;
        let mut out = Vec::with_capacity(self.capacity_hint(count, 4));
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    /// Pre-allocation size for `count` elements of at least `min_size` bytes,
    /// capped by what the buffer could possibly still hold.
    pub fn capacity_hint(&self, count: u32, min_size: usize) -> usize {
        (count as usize).min(self.remaining() / min_size.max(1))
    }
}

pub(crate) fn check_count(count: u32, max: u32, offset: usize, what: &str) -> Result<()> {
    if count > max {
        return Err(ManifestError::Format(format!(
            "{what} at offset {offset} declares {count} elements (limit {max})"
        )));
    }
    Ok(())
}
