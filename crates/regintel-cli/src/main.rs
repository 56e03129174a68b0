//! # regintel CLI entry point
//!
//! Parses command-line arguments, initializes logging, loads the engine
//! configuration and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use regintel_cli::deadlines::{run_deadlines, DeadlinesArgs};
use regintel_cli::impact::{run_impact, ImpactArgs};
use regintel_cli::load_config;
use regintel_cli::timeline::{run_timeline, TimelineArgs};

/// Regulatory Intelligence engine
///
/// Turns parsed regulator circulars into implementation timelines and
/// organization-specific impact assessments.
#[derive(Parser, Debug)]
#[command(name = "regintel", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the engine configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the implementation timeline for a circular.
    Timeline(TimelineArgs),

    /// Assess a circular's impact on an organization.
    Impact(ImpactArgs),

    /// List deadlines falling inside an alert window.
    Deadlines(DeadlinesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "regintel starting");

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Timeline(args) => run_timeline(&args, &config, &mut out),
        Commands::Impact(args) => run_impact(&args, &config, &mut out),
        Commands::Deadlines(args) => run_deadlines(&args, &config, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
