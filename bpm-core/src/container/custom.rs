use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::diag::{Diagnostics, SectionKind};
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::util::cursor::ByteCursor;

use super::section::SectionFrame;

/// String map that keeps first-insertion order; re-inserting a key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFields {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CustomFields {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for CustomFields {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_map(self.iter())
    }
}

/// Key/value pairs read as units, not columns.
pub fn read_custom_fields(
    c: &mut ByteCursor<'_>,
    opts: &DecodeOptions,
    diags: &mut Diagnostics,
) -> Result<CustomFields> {
    let frame = SectionFrame::open(c, SectionKind::CustomFields, opts)?;
    // Each pair is at least two length prefixes.
    let mut fields = CustomFields::with_capacity(c.capacity_hint(frame.element_count, 8));
    for _ in 0..frame.element_count {
        let key = c.read_string()?;
        let value = c.read_string()?;
        fields.insert(key, value);
    }
    frame.finish(c, diags)?;
    Ok(fields)
}
