//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Hotframe hot-reload host CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hotframe.toml)
    #[arg(short = 'C', long, global = true, default_value = "hotframe.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the host window and hot-reload the app module on every rebuild
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        host_args: HostArgs,

        /// Watch the artifact directory for rebuilds
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,

        /// Ignore triggers this long after an accepted one (milliseconds)
        #[arg(long = "debounce-ms")]
        debounce_ms: Option<u64>,

        /// Wait this long after a trigger before reloading (milliseconds)
        #[arg(long = "settle-ms")]
        settle_ms: Option<u64>,
    },

    /// Load the app module once, print the window and exit
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        host_args: HostArgs,
    },
}

/// Shared arguments for Run and Check
#[derive(clap::Args, Debug, Clone, Default)]
pub struct HostArgs {
    /// Explicit path of the app module library
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub artifact: Option<PathBuf>,

    /// Crate name of the app module (resolved next to the host executable)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }

    pub const fn host_args(&self) -> &HostArgs {
        match &self.command {
            Commands::Run { host_args, .. } | Commands::Check { host_args } => host_args,
        }
    }
}
