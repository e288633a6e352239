pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use bpm_core::DecodeOptions;
use bpm_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = DecodeOptions {
        max_file_version: cli.max_version,
        max_elements: cli.max_elements,
    };
    let strict = cli.strict;
    match cli.command {
        Commands::Inspect { manifests } => handlers::handle_inspect(manifests, &opts, strict),
        Commands::List { manifest } => handlers::handle_list(manifest, &opts, strict),
        Commands::Chunks { manifest, path } => {
            handlers::handle_chunks(manifest, path, &opts, strict)
        }
        Commands::Export {
            manifest,
            format,
            out,
        } => handlers::handle_export(manifest, format.into(), out, &opts, strict),
        Commands::Scan { dir } => handlers::handle_scan(dir, &opts, strict),
    }
}
