use serde::Serialize;
use std::collections::HashSet;

use crate::diag::DanglingReference;
use crate::domain::{ChunkRow, FileRow};
use crate::stats::Stats;

use super::chunktab::ChunkTable;
use super::custom::CustomFields;
use super::filelist::FileManifestEntry;
use super::header::ManifestHeader;
use super::scalars::ScalarFields;

/// A fully decoded manifest. Built once from a buffer by
/// [`crate::read::decode::decode`]; a new buffer means a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub header: ManifestHeader,
    pub app_name: String,
    pub build_version: String,
    pub launch_exe: String,
    pub launch_command: String,
    pub prereq_ids: Vec<String>,
    pub prereq_name: String,
    pub prereq_path: String,
    pub prereq_args: String,
    pub chunk_table: ChunkTable,
    pub file_list: Vec<FileManifestEntry>,
    pub custom_fields: CustomFields,
}

impl Manifest {
    pub fn new(
        header: ManifestHeader,
        scalars: ScalarFields,
        chunk_table: ChunkTable,
        file_list: Vec<FileManifestEntry>,
        custom_fields: CustomFields,
    ) -> Self {
        let ScalarFields {
            app_name,
            build_version,
            launch_exe,
            launch_command,
            prereq_ids,
            prereq_name,
            prereq_path,
            prereq_args,
        } = scalars;
        Self {
            header,
            app_name,
            build_version,
            launch_exe,
            launch_command,
            prereq_ids,
            prereq_name,
            prereq_path,
            prereq_args,
            chunk_table,
            file_list,
            custom_fields,
        }
    }

    pub fn file(&self, path: &str) -> Option<&FileManifestEntry> {
        self.file_list.iter().find(|f| f.filename == path)
    }

    /// Every chunk part whose GUID is missing from the chunk table, in file order.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        for (file_index, fe) in self.file_list.iter().enumerate() {
            for (part_index, part) in fe.chunk_parts.iter().enumerate() {
                if !self.chunk_table.contains(&part.guid) {
                    out.push(DanglingReference {
                        file_index,
                        filename: fe.filename.clone(),
                        part_index,
                        guid: part.guid,
                    });
                }
            }
        }
        out
    }

    pub fn list_entries(&self) -> impl Iterator<Item = FileRow> + '_ {
        self.file_list.iter().map(|fe| FileRow {
            path: fe.filename.clone(),
            size: fe.file_size(),
            parts: fe.chunk_parts.len(),
            symlink_target: fe.is_symlink().then(|| fe.symlink_target.clone()),
            install_tags: fe.install_tags.clone(),
        })
    }

    /// Part-by-part layout of one file. `None` if no file has that path.
    pub fn chunk_map(&self, path: &str) -> Option<Vec<ChunkRow>> {
        let fe = self.file(path)?;
        let total = fe.file_size().max(1) as f64;
        let mut acc = 0u64;
        let mut out = Vec::with_capacity(fe.chunk_parts.len());
        for (ord, part) in fe.chunk_parts.iter().enumerate() {
            let chunk = self.chunk_table.get(&part.guid);
            let end = acc + part.size as u64;
            out.push(ChunkRow {
                ordinal: ord as u64,
                guid: part.guid,
                file_off: acc,
                chunk_off: part.offset,
                len: part.size,
                group: chunk.map(|c| c.group_number),
                window_size: chunk.map(|c| c.window_size),
                blob_size: chunk.map(|c| c.file_size),
                pct_end: (end as f64 / total) as f32,
            });
            acc = end;
        }
        Some(out)
    }

    pub fn stats(&self) -> Stats {
        let mut seen_tags = HashSet::new();
        let mut s = Stats {
            files: self.file_list.len() as u64,
            chunks: self.chunk_table.len() as u64,
            custom_fields: self.custom_fields.len() as u64,
            ..Default::default()
        };
        for fe in &self.file_list {
            s.parts += fe.chunk_parts.len() as u64;
            s.logical_bytes += fe.file_size();
            if fe.is_symlink() {
                s.symlinks += 1;
            }
            for tag in &fe.install_tags {
                if seen_tags.insert(tag.as_str()) {
                    s.install_tags.push(tag.clone());
                }
            }
        }
        s.chunk_blob_bytes = self.chunk_table.iter().map(|c| c.file_size).sum();
        s
    }
}
