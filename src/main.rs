//! Hotframe - A hot-reload host for dynamically compiled UI modules.

#![allow(dead_code)]

mod actor;
mod cli;
mod config;
mod context;
mod core;
mod logger;
mod reload;
mod utils;
mod view;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::HostConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = HostConfig::load(&cli)?;

    if cli.is_check() {
        cli::check::check_artifact(&config)
    } else {
        cli::run::run_host(config)
    }
}
