use bpm_core::ExportFormat;
use bpm_core::options::{DEFAULT_MAX_ELEMENTS, DEFAULT_MAX_FILE_VERSION};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "bpmdev: binary patch manifest inspector", long_about = None)]
pub struct Cli {
    /// Fail when a manifest decodes with warnings (size mismatches, dangling chunks)
    #[arg(long, global = true)]
    pub strict: bool,

    /// Highest manifest file version accepted
    #[arg(long = "max-version", global = true, default_value_t = DEFAULT_MAX_FILE_VERSION)]
    pub max_version: u32,

    /// Upper bound on any declared element count
    #[arg(long = "max-elements", global = true, default_value_t = DEFAULT_MAX_ELEMENTS)]
    pub max_elements: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// Flat string-valued JSON read by the ingestion pipeline
    Legacy,
    /// Typed manifest plus diagnostics as JSON
    Json,
    /// Typed manifest plus diagnostics as CBOR
    Cbor,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Legacy => ExportFormat::Legacy,
            Format::Json => ExportFormat::Json,
            Format::Cbor => ExportFormat::Cbor,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one or more manifests (decoded in parallel)
    Inspect {
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
    },

    /// List files with reconstructed size and part count
    List { manifest: PathBuf },

    /// Print the chunk map for one file
    Chunks { manifest: PathBuf, path: String },

    /// Write the decoded manifest to stdout or a file
    Export {
        manifest: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Legacy)]
        format: Format,

        /// Output path (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Decode every `manifest` / `*.manifest` file under a directory
    Scan { dir: PathBuf },
}
