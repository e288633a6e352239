use serde::Serialize;
use tracing::{debug, warn};

use crate::container::chunktab::{ChunkTable, read_chunk_data_list};
use crate::container::custom::{CustomFields, read_custom_fields};
use crate::container::filelist::{FileManifestEntry, read_file_data_list};
use crate::container::header::ManifestHeader;
use crate::container::manifest::Manifest;
use crate::container::scalars::ScalarFields;
use crate::diag::Diagnostics;
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::util::cursor::ByteCursor;

/// A manifest plus everything recoverable that went wrong while decoding it.
#[derive(Debug, Clone, Serialize)]
pub struct Decoded {
    pub manifest: Manifest,
    pub diagnostics: Diagnostics,
}

pub fn decode(buf: &[u8]) -> Result<Decoded> {
    decode_with(buf, &DecodeOptions::default())
}

/// Header, scalar fields, chunk list, file list, custom fields, strictly in
/// that order. Any fatal error returns no manifest at all.
pub fn decode_with(buf: &[u8], opts: &DecodeOptions) -> Result<Decoded> {
    let mut c = ByteCursor::new(buf);
    let mut diags = Diagnostics::default();

    let header = ManifestHeader::read_from(&mut c, opts)?;
    let scalars = ScalarFields::read_from(&mut c, opts)?;
    let chunk_table = read_chunk_data_list(&mut c, opts, &mut diags)?;
    let file_list = read_file_data_list(&mut c, opts, &mut diags)?;
    let custom_fields = read_custom_fields(&mut c, opts, &mut diags)?;

    if c.remaining() > 0 {
        debug!(trailing = c.remaining(), "bytes after custom fields ignored");
    }

    Ok(assemble(
        header,
        scalars,
        chunk_table,
        file_list,
        custom_fields,
        diags,
    ))
}

/// Builds the manifest and resolves every chunk part against the chunk table.
pub fn assemble(
    header: ManifestHeader,
    scalars: ScalarFields,
    chunk_table: ChunkTable,
    file_list: Vec<FileManifestEntry>,
    custom_fields: CustomFields,
    mut diagnostics: Diagnostics,
) -> Decoded {
    let manifest = Manifest::new(header, scalars, chunk_table, file_list, custom_fields);
    let dangling = manifest.dangling_references();
    for r in &dangling {
        warn!(file = %r.filename, part = r.part_index, guid = %r.guid, "dangling chunk reference");
    }
    diagnostics.dangling_references = dangling;
    debug!(
        chunks = manifest.chunk_table.len(),
        files = manifest.file_list.len(),
        findings = diagnostics.len(),
        "manifest decoded"
    );
    Decoded {
        manifest,
        diagnostics,
    }
}
