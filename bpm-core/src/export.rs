//! Serialized forms of a decoded manifest.
//!
//! [`LegacyManifest`] is the flat, string-valued JSON document that ingestion
//! tooling already consumes: field names, zero-pad widths and hash renderings
//! are fixed. The typed [`Decoded`] record can also be written as JSON or CBOR.

use serde::{Serialize, Serializer};

use crate::container::chunktab::ChunkInfo;
use crate::container::manifest::Manifest;
use crate::error::{ManifestError, Result};
use crate::read::decode::Decoded;
use crate::util::render::{VERSION_WIDTH, zero_pad};

pub const LEGACY_APP_ID: &str = "000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Legacy,
    Json,
    Cbor,
}

/// String pairs serialized as a map in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedMap(pub Vec<(String, String)>);

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyChunkPart {
    pub guid: String,
    pub offset: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyFile {
    pub filename: String,
    pub file_hash: String,
    pub file_chunk_parts: Vec<LegacyChunkPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyManifest {
    pub manifest_file_version: String,
    #[serde(rename = "bIsFileData")]
    pub is_file_data: bool,
    #[serde(rename = "AppID")]
    pub app_id: String,
    pub app_name_string: String,
    pub build_version_string: String,
    pub launch_exe_string: String,
    pub launch_command: String,
    pub prereq_ids: Vec<String>,
    pub prereq_name: String,
    pub prereq_path: String,
    pub prereq_args: String,
    pub chunk_hash_list: OrderedMap,
    pub chunk_sha_list: OrderedMap,
    pub data_group_list: OrderedMap,
    pub chunk_filesize_list: OrderedMap,
    pub file_manifest_list: Vec<LegacyFile>,
    pub custom_fields: OrderedMap,
}

impl From<&Manifest> for LegacyManifest {
    fn from(m: &Manifest) -> Self {
        LegacyManifest {
            manifest_file_version: zero_pad(m.header.file_version() as u64, VERSION_WIDTH),
            is_file_data: m.header.is_file_data(),
            app_id: LEGACY_APP_ID.to_string(),
            app_name_string: m.app_name.clone(),
            build_version_string: m.build_version.clone(),
            launch_exe_string: m.launch_exe.clone(),
            launch_command: m.launch_command.clone(),
            prereq_ids: m.prereq_ids.clone(),
            prereq_name: m.prereq_name.clone(),
            prereq_path: m.prereq_path.clone(),
            prereq_args: m.prereq_args.clone(),
            chunk_hash_list: keyed(m, |c| c.rolling_hash.to_string()),
            chunk_sha_list: keyed(m, |c| c.sha_hash.to_hex()),
            data_group_list: keyed(m, ChunkInfo::group_label),
            chunk_filesize_list: keyed(m, ChunkInfo::file_size_label),
            file_manifest_list: m
                .file_list
                .iter()
                .map(|fe| LegacyFile {
                    filename: fe.filename.clone(),
                    file_hash: fe.file_hash_decimal(),
                    file_chunk_parts: fe
                        .chunk_parts
                        .iter()
                        .map(|p| LegacyChunkPart {
                            guid: p.guid.to_string(),
                            offset: p.offset_label(),
                            size: p.size_label(),
                        })
                        .collect(),
                })
                .collect(),
            custom_fields: OrderedMap(
                m.custom_fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

/// One GUID-keyed map over the chunk table.
fn keyed(m: &Manifest, render: impl Fn(&ChunkInfo) -> String) -> OrderedMap {
    OrderedMap(
        m.chunk_table
            .iter()
            .map(|c| (c.guid.to_string(), render(c)))
            .collect(),
    )
}

pub fn export(decoded: &Decoded, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Legacy => serde_json::to_vec_pretty(&LegacyManifest::from(&decoded.manifest))
            .map_err(|e| ManifestError::Format(format!("legacy json encode: {e}"))),
        ExportFormat::Json => serde_json::to_vec_pretty(decoded)
            .map_err(|e| ManifestError::Format(format!("json encode: {e}"))),
        ExportFormat::Cbor => {
            let mut out = Vec::new();
            ciborium::ser::into_writer(decoded, &mut out)
                .map_err(|e| ManifestError::Format(format!("cbor encode: {e}")))?;
            Ok(out)
        }
    }
}
