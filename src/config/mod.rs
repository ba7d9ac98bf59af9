// SPDX-License-Identifier: GPL-3.0-only
pub mod cli;
pub mod config;

pub use cli::Cli;
pub use config::{Config, LogFormat};
