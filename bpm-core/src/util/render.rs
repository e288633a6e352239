use std::fmt::Write;

/// Fixed zero-pad widths consumed by downstream tooling.
pub const GROUP_WIDTH: usize = 3;
pub const PART_WIDTH: usize = 12;
pub const VERSION_WIDTH: usize = 12;
pub const FILESIZE_WIDTH: usize = 24;

#[inline]
pub fn zero_pad(value: u64, width: usize) -> String {
    format!("{value:0width$}")
}

/// Each byte as a 3-digit decimal, concatenated.
pub fn decimal_triplets(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for b in bytes {
        let _ = write!(out, "{b:03}");
    }
    out
}
