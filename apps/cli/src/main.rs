mod args;
mod commands;

use crate::args::Cli;
use anyhow::Context;
use clap::Parser;
use consent::domain::config::EngineConfig;
use consent::kernel::config::{load_config, load_engine_config};
use consent_logger::{LevelFilter, Logger};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config::<EngineConfig>(Some(path))
            .with_context(|| format!("Critical: Cannot load configuration {}", path.display()))?,
        None => load_engine_config(None::<&Path>).context("Critical: Configuration is malformed")?,
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir.clone_from(dir);
    }

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).apply(&config.logging)?;
    if !cli.verbose {
        logger = logger.level(LevelFilter::WARN);
    }
    let _log = logger.init()?;

    let engine =
        consent::init(config, Some(&cli.location)).context("Failed to open consent store")?;

    let stdout = std::io::stdout();
    commands::run(&engine, cli.command, &mut stdout.lock())
}
