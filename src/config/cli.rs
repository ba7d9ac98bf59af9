// SPDX-License-Identifier: GPL-3.0-only
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command line flags. Each one overrides the config file and environment.
#[derive(Debug, Default, Parser)]
#[command(name = "inventory-registry", version, about = "Inventory registration HTTP service")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Host address to bind
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the photo cache directory
    #[arg(short, long = "cache")]
    pub cache: Option<PathBuf>,

    /// Directory holding the HTML form pages
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}
