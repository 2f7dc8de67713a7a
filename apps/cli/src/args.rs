//! # CLI Argument Definitions

use clap::{Parser, Subcommand, ValueEnum};
use consent::domain::ConsentCategory;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "consentctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect and edit the stored consent record")]
pub(crate) struct Cli {
    /// Configuration file (TOML, YAML or JSON). Optional; `CONSENT__*` variables override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `storage.data_dir`.
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at the configured level instead of warnings only.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Page the prompt is evaluated against.
    #[arg(short, long, global = true, default_value = "/")]
    pub location: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show category decisions, overrides and prompt state
    Status {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Grant every category and clear overrides
    AcceptAll,
    /// Deny every category and clear overrides
    DisableAll,
    /// Set one category decision
    SetCategory {
        #[arg(value_parser = parse_category)]
        category: ConsentCategory,
        state: Toggle,
    },
    /// Set or clear one service override
    SetService { id: String, state: OverrideState },
    /// Report whether a service may run
    Check {
        id: String,
        #[arg(value_parser = parse_category)]
        category: ConsentCategory,
        /// The service supports consent mode
        #[arg(long)]
        consent_mode: bool,
    },
    /// Print the consent-mode bootstrap script for the stored decisions
    Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OverrideState {
    On,
    Off,
    Clear,
}

impl From<OverrideState> for Option<bool> {
    fn from(state: OverrideState) -> Self {
        match state {
            OverrideState::On => Some(true),
            OverrideState::Off => Some(false),
            OverrideState::Clear => None,
        }
    }
}

fn parse_category(value: &str) -> Result<ConsentCategory, String> {
    value.parse().map_err(|err: consent::domain::UnknownCategory| err.to_string())
}
