//! storyscaffold command line
//!
//! Loads the layered configuration, resolves titles from file paths and runs
//! the transform engine over story files.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod title;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::ArgMatches;

pub use commands::{inspect_source, output_path, transform_files, transform_source};
pub use config::{ConfigError, Overrides, ScaffoldConfig, StrategyKind};
pub use title::AutoTitle;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the subcommand selected in `matches`
///
/// # Errors
/// Configuration, I/O and transform failures
pub fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let Some((name, sub)) = matches.subcommand() else {
        anyhow::bail!("no subcommand given");
    };

    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = load_config(sub, &cwd)?;
    tracing::debug!(?config, "resolved configuration");

    match name {
        "transform" => {
            let files: Vec<PathBuf> = sub
                .get_many::<PathBuf>("files")
                .map(|files| files.cloned().collect())
                .unwrap_or_default();
            let out_dir = sub.get_one::<PathBuf>("out-dir").map(PathBuf::as_path);
            let written = transform_files(&files, out_dir, &config)?;
            if !written.is_empty() {
                tracing::info!(count = written.len(), "transform finished");
            }
            Ok(())
        }
        "inspect" => {
            let file = sub
                .get_one::<PathBuf>("file")
                .context("missing story file")?;
            commands::inspect_file(file, &config)
        }
        other => anyhow::bail!("unknown subcommand '{other}'"),
    }
}

fn load_config(matches: &ArgMatches, cwd: &Path) -> anyhow::Result<ScaffoldConfig> {
    let explicit = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let overrides = cli::overrides(matches)?;
    let config = ScaffoldConfig::discover(explicit, cwd)?;
    Ok(config.with_overrides(&overrides))
}
