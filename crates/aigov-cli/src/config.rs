//! # Config Subcommand
//!
//! `aigov config check [PATH]` loads a configuration, runs every load-time
//! check, and prints the effective configuration. A rejected configuration
//! is reported on stderr with exit code 1.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use aigov_core::{ConfigError, GovernanceConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate a configuration file and print the effective configuration.
    Check {
        /// File to check. Falls back to `--config`, then `AIGOV_CONFIG`,
        /// then the built-in defaults.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

pub fn run_config(args: &ConfigArgs, global_config: Option<&Path>) -> Result<u8> {
    match &args.action {
        ConfigAction::Check { path } => {
            let path = path.as_deref().or(global_config);
            match check(path) {
                Ok(config) => {
                    crate::print_json(&config)?;
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("configuration rejected: {e}");
                    Ok(1)
                }
            }
        }
    }
}

fn check(path: Option<&Path>) -> Result<GovernanceConfig, ConfigError> {
    match path {
        Some(path) => GovernanceConfig::load(path),
        None => GovernanceConfig::from_env(),
    }
}
