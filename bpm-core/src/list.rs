use crate::diag::Diagnostics;
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::read::opened::Opened;
use std::path::Path;

/// Prints one line per file and returns whatever the decode flagged.
pub fn list(manifest: &Path, opts: Option<&DecodeOptions>) -> Result<Diagnostics> {
    let opened = Opened::open(manifest, &opts.copied().unwrap_or_default())?;
    for row in opened.list_entries() {
        match &row.symlink_target {
            Some(target) => println!("{}  -> {}", row.path, target),
            None => println!("{}  {} bytes  parts={}", row.path, row.size, row.parts),
        }
    }
    for line in opened.diagnostics.lines() {
        eprintln!("warning: {line}");
    }
    Ok(opened.diagnostics)
}
