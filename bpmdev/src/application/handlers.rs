use std::io::Write;
use std::path::{Path, PathBuf};

use bpm_core::diag::Diagnostics;
use bpm_core::error::{ManifestError, Result};
use bpm_core::{DecodeOptions, Decoded, ExportFormat, Opened, export, list};
use rayon::prelude::*;
use walkdir::WalkDir;

fn report(path: &Path, diags: &Diagnostics) {
    for line in diags.lines() {
        eprintln!("warning: {}: {line}", path.display());
    }
}

fn check_strict(strict: bool, path: &Path, diags: &Diagnostics) -> Result<()> {
    if strict && !diags.is_clean() {
        return Err(ManifestError::Format(format!(
            "{}: {} decode warning(s) (--strict)",
            path.display(),
            diags.len()
        )));
    }
    Ok(())
}

fn open_checked(manifest: &Path, opts: &DecodeOptions, strict: bool) -> Result<Opened> {
    let opened = Opened::open(manifest, opts)?;
    report(manifest, &opened.diagnostics);
    check_strict(strict, manifest, &opened.diagnostics)?;
    Ok(opened)
}

fn print_summary(o: &Opened) {
    let m = &o.manifest;
    let s = m.stats();
    println!("{}", o.path.display());
    println!("  app:        {}", m.app_name);
    println!("  build:      {}", m.build_version);
    if !m.launch_exe.is_empty() {
        println!("  launch:     {} {}", m.launch_exe, m.launch_command);
    }
    println!(
        "  version:    {} (file data: {})",
        m.header.file_version(),
        m.header.is_file_data()
    );
    println!(
        "  files:      {} ({} symlinks, {} bytes)",
        s.files, s.symlinks, s.logical_bytes
    );
    println!(
        "  chunks:     {} ({} parts, {} blob bytes, reuse {:.2}x)",
        s.chunks,
        s.parts,
        s.chunk_blob_bytes,
        s.reuse_ratio()
    );
    if !s.install_tags.is_empty() {
        println!("  tags:       {}", s.install_tags.join(", "));
    }
    if !m.prereq_ids.is_empty() {
        println!("  prereqs:    {} ({})", m.prereq_ids.join(", "), m.prereq_name);
    }
    for (k, v) in m.custom_fields.iter() {
        println!("  {k}: {v}");
    }
    if !o.diagnostics.is_clean() {
        println!("  warnings:   {}", o.diagnostics.len());
    }
}

pub fn handle_inspect(manifests: Vec<PathBuf>, opts: &DecodeOptions, strict: bool) -> Result<()> {
    // Each decode owns its buffer; collect keeps argument order.
    let results: Vec<(PathBuf, Result<Opened>)> = manifests
        .into_par_iter()
        .map(|p| {
            let r = Opened::open(&p, opts);
            (p, r)
        })
        .collect();

    let mut first_err = None;
    for (path, r) in results {
        match r {
            Ok(o) => {
                report(&path, &o.diagnostics);
                print_summary(&o);
                if let Err(e) = check_strict(strict, &path, &o.diagnostics) {
                    first_err.get_or_insert(e);
                }
            }
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub fn handle_list(manifest: PathBuf, opts: &DecodeOptions, strict: bool) -> Result<()> {
    let diags = list(&manifest, Some(opts))?;
    check_strict(strict, &manifest, &diags)
}

pub fn handle_chunks(
    manifest: PathBuf,
    path: String,
    opts: &DecodeOptions,
    strict: bool,
) -> Result<()> {
    let opened = open_checked(&manifest, opts, strict)?;
    let rows = opened.chunk_map_for(&path)?;
    for r in rows {
        let group = r.group.map_or_else(|| "???".to_string(), |g| format!("{g:03}"));
        println!(
            "#{:<5} guid={} group={} file_off={} chunk_off={} len={} end={:.1}%",
            r.ordinal,
            r.guid,
            group,
            r.file_off,
            r.chunk_off,
            r.len,
            r.pct_end * 100.0
        );
    }
    Ok(())
}

pub fn handle_export(
    manifest: PathBuf,
    format: ExportFormat,
    out: Option<PathBuf>,
    opts: &DecodeOptions,
    strict: bool,
) -> Result<()> {
    let opened = open_checked(&manifest, opts, strict)?;
    let decoded = Decoded {
        manifest: opened.manifest,
        diagnostics: opened.diagnostics,
    };
    let bytes = export(&decoded, format)?;
    match out {
        Some(p) => {
            std::fs::write(&p, &bytes)?;
            eprintln!("export: wrote {} ({} bytes)", p.display(), bytes.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if format != ExportFormat::Cbor {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn is_manifest_name(p: &Path) -> bool {
    p.file_name().is_some_and(|n| n == "manifest")
        || p.extension().is_some_and(|e| e.eq_ignore_ascii_case("manifest"))
}

pub fn handle_scan(dir: PathBuf, opts: &DecodeOptions, strict: bool) -> Result<()> {
    let mut paths = Vec::new();
    let mut walk_errors = 0usize;
    for entry in WalkDir::new(&dir).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() && is_manifest_name(e.path()) => {
                paths.push(e.into_path())
            }
            Ok(_) => {}
            Err(e) => {
                walk_errors += 1;
                let at = e.path().unwrap_or(dir.as_path()).display().to_string();
                println!("error {at}: {e}");
            }
        }
    }

    let results: Vec<(PathBuf, Result<Opened>)> = paths
        .into_par_iter()
        .map(|p| {
            let r = Opened::open(&p, opts);
            (p, r)
        })
        .collect();

    let (mut failed, mut warned) = (walk_errors, 0usize);
    for (path, r) in &results {
        match r {
            Ok(o) => {
                let m = &o.manifest;
                println!(
                    "ok    {:<32} {:<16} files={:<6} chunks={:<6} {}",
                    m.app_name,
                    m.build_version,
                    m.file_list.len(),
                    m.chunk_table.len(),
                    path.display()
                );
                if !o.diagnostics.is_clean() {
                    warned += 1;
                    report(path, &o.diagnostics);
                }
            }
            Err(e) => {
                failed += 1;
                println!("error {}: {e}", path.display());
            }
        }
    }
    eprintln!(
        "scan: {} manifest(s), {} failed, {} with warnings",
        results.len() + walk_errors,
        failed,
        warned
    );
    if strict && (failed > 0 || warned > 0) {
        return Err(ManifestError::Format(format!(
            "{failed} failed, {warned} with warnings (--strict)"
        )));
    }
    Ok(())
}
