//! Test-only writer for binary manifests. The library itself never encodes.
#![allow(dead_code)]

pub const MAGIC: u32 = 0x44BE_C00C;

pub fn guid(seed: u8) -> [u8; 16] {
    std::array::from_fn(|i| seed.wrapping_mul(16).wrapping_add(i as u8))
}

pub fn guid_str(seed: u8) -> String {
    let b = guid(seed);
    (0..4)
        .map(|w| {
            let v = u32::from_le_bytes([b[w * 4], b[w * 4 + 1], b[w * 4 + 2], b[w * 4 + 3]]);
            format!("{v:08X}")
        })
        .collect()
}

#[derive(Clone)]
pub struct ChunkSpec {
    pub guid: [u8; 16],
    pub rolling: u64,
    pub sha: [u8; 20],
    pub group: u8,
    pub window: u32,
    pub size: u64,
}

impl ChunkSpec {
    pub fn new(seed: u8) -> Self {
        Self {
            guid: guid(seed),
            rolling: 0x1000 + seed as u64,
            sha: [seed; 20],
            group: seed % 100,
            window: 1_048_576,
            size: 4096 + seed as u64,
        }
    }
}

#[derive(Clone, Default)]
pub struct FileSpec {
    pub name: String,
    pub symlink: String,
    pub hash: [u8; 20],
    pub flags: u8,
    pub tags: Vec<String>,
    pub parts: Vec<([u8; 16], u32, u32)>,
}

impl FileSpec {
    pub fn new(name: &str, parts: &[(u8, u32, u32)]) -> Self {
        Self {
            name: name.to_string(),
            hash: [7; 20],
            parts: parts.iter().map(|&(s, o, n)| (guid(s), o, n)).collect(),
            ..Default::default()
        }
    }
}

/// Offsets of each section's leading size field in the built buffer.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub chunk_section: usize,
    pub file_section: usize,
    pub custom_section: usize,
    pub end: usize,
}

pub struct ManifestBuilder {
    pub header_size: u32,
    pub version: u32,
    pub flag: u8,
    pub app_name: String,
    pub build_version: String,
    pub launch_exe: String,
    pub launch_command: String,
    pub prereq_ids: Vec<String>,
    pub prereq_name: String,
    pub prereq_path: String,
    pub prereq_args: String,
    pub chunks: Vec<ChunkSpec>,
    pub files: Vec<FileSpec>,
    pub custom: Vec<(String, String)>,
    /// Extra bytes appended to the chunk section, as a newer writer would.
    pub chunk_section_tail: Vec<u8>,
    pub file_section_tail: Vec<u8>,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self {
            header_size: 41,
            version: 21,
            flag: 0x02,
            app_name: String::new(),
            build_version: String::new(),
            launch_exe: String::new(),
            launch_command: String::new(),
            prereq_ids: Vec::new(),
            prereq_name: String::new(),
            prereq_path: String::new(),
            prereq_args: String::new(),
            chunks: Vec::new(),
            files: Vec::new(),
            custom: Vec::new(),
            chunk_section_tail: Vec::new(),
            file_section_tail: Vec::new(),
        }
    }
}

fn u32le(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn string(out: &mut Vec<u8>, s: &str) {
    if s.is_empty() {
        u32le(out, 0);
        return;
    }
    u32le(out, s.len() as u32 + 1);
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

fn strings(out: &mut Vec<u8>, v: &[String]) {
    u32le(out, v.len() as u32);
    for s in v {
        string(out, s);
    }
}

fn section(out: &mut Vec<u8>, count: usize, payload: &[u8]) {
    u32le(out, (1 + 4 + payload.len()) as u32);
    out.push(0);
    u32le(out, count as u32);
    out.extend_from_slice(payload);
}

impl ManifestBuilder {
    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().0
    }

    pub fn build_with_layout(&self) -> (Vec<u8>, Layout) {
        let mut out = Vec::new();
        u32le(&mut out, MAGIC);
        u32le(&mut out, self.header_size);
        u32le(&mut out, 0);
        u32le(&mut out, 0);
        out.resize(self.header_size as usize, 0);

        u32le(&mut out, 145);
        out.push(self.flag);
        u32le(&mut out, self.version);
        u32le(&mut out, 0);
        out.push(0);

        string(&mut out, &self.app_name);
        string(&mut out, &self.build_version);
        string(&mut out, &self.launch_exe);
        string(&mut out, &self.launch_command);
        strings(&mut out, &self.prereq_ids);
        string(&mut out, &self.prereq_name);
        string(&mut out, &self.prereq_path);
        string(&mut out, &self.prereq_args);

        let chunk_section = out.len();
        let mut p = Vec::new();
        for c in &self.chunks {
            p.extend_from_slice(&c.guid);
        }
        for c in &self.chunks {
            p.extend_from_slice(&c.rolling.to_le_bytes());
        }
        for c in &self.chunks {
            p.extend_from_slice(&c.sha);
        }
        for c in &self.chunks {
            p.push(c.group);
        }
        for c in &self.chunks {
            u32le(&mut p, c.window);
        }
        for c in &self.chunks {
            p.extend_from_slice(&c.size.to_le_bytes());
        }
        p.extend_from_slice(&self.chunk_section_tail);
        section(&mut out, self.chunks.len(), &p);

        let file_section = out.len();
        let mut p = Vec::new();
        for f in &self.files {
            string(&mut p, &f.name);
        }
        for f in &self.files {
            string(&mut p, &f.symlink);
        }
        for f in &self.files {
            p.extend_from_slice(&f.hash);
        }
        for f in &self.files {
            p.push(f.flags);
        }
        for f in &self.files {
            strings(&mut p, &f.tags);
        }
        for f in &self.files {
            u32le(&mut p, f.parts.len() as u32);
            for (g, off, size) in &f.parts {
                u32le(&mut p, 28);
                p.extend_from_slice(g);
                u32le(&mut p, *off);
                u32le(&mut p, *size);
            }
        }
        p.extend_from_slice(&self.file_section_tail);
        section(&mut out, self.files.len(), &p);

        let custom_section = out.len();
        let mut p = Vec::new();
        for (k, v) in &self.custom {
            string(&mut p, k);
            string(&mut p, v);
        }
        section(&mut out, self.custom.len(), &p);

        let end = out.len();
        (
            out,
            Layout {
                chunk_section,
                file_section,
                custom_section,
                end,
            },
        )
    }
}

/// The two-chunk, one-file manifest used across tests.
pub fn my_app() -> ManifestBuilder {
    ManifestBuilder {
        app_name: "MyApp".into(),
        build_version: "1.0.0".into(),
        launch_exe: "Binaries/MyApp.exe".into(),
        chunks: vec![ChunkSpec::new(1), ChunkSpec::new(2)],
        files: vec![FileSpec::new(
            "Content/Maps/Main.umap",
            &[(1, 0, 1000), (2, 16, 24)],
        )],
        custom: vec![("BaseUrl".into(), "https://cdn.example/builds".into())],
        ..Default::default()
    }
}
