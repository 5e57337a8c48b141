//! # aigov-cli — Governance Command-Line Interface
//!
//! ## Subcommands
//!
//! - `config check [PATH]` — load and validate a governance configuration
//! - `assess --system FILE --evidence FILE [--route]` — register a system,
//!   score its evidence, aggregate, and optionally route to escalation
//! - `demo` — run the two reference scenarios end to end
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers delegate to
//!   `aigov-service` and contain no scoring logic.
//! - Reports go to stdout as pretty JSON; logs go to stderr.
//! - Handlers return the process exit code: 0 on success, 1 on validation
//!   failure. Operational errors propagate as `anyhow::Error`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use aigov_core::{GovernanceConfig, CONFIG_ENV_VAR};

pub mod assess;
pub mod config;
pub mod demo;

/// Input document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => bail!(
                "{}: expected a .json, .yaml or .yml file",
                path.display()
            ),
        }
    }
}

/// Parse `content` in the given format.
pub fn parse_document<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    Ok(match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    })
}

/// Read and parse a JSON or YAML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&content, format).with_context(|| format!("failed to parse {}", path.display()))
}

/// The effective configuration: `--config` if given, else the
/// `AIGOV_CONFIG` environment variable, else the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GovernanceConfig> {
    match path {
        Some(path) => GovernanceConfig::load(path)
            .with_context(|| format!("invalid configuration {}", path.display())),
        None => GovernanceConfig::from_env()
            .with_context(|| format!("invalid configuration from {CONFIG_ENV_VAR}")),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
pub(crate) fn demos_dir() -> std::path::PathBuf {
    let mut dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates
    dir.pop(); // workspace root
    dir.join("demos")
}
