//! # aigov CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aigov_cli::assess::{run_assess, AssessArgs};
use aigov_cli::config::{run_config, ConfigArgs};
use aigov_cli::demo::{run_demo, DemoArgs};

/// AI governance toolchain.
///
/// Checks governance configuration, assesses AI systems from evidence
/// files, and demonstrates the approval and escalation lifecycle.
#[derive(Parser, Debug)]
#[command(name = "aigov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to the governance configuration (JSON or YAML). Defaults to
    /// `AIGOV_CONFIG`, then the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration checks.
    Config(ConfigArgs),

    /// Register a system, score its evidence, and aggregate.
    Assess(AssessArgs),

    /// Run the reference lifecycle scenario in memory.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Config(args) => run_config(args, config),
        Commands::Assess(args) => run_assess(args, config),
        Commands::Demo(args) => run_demo(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
