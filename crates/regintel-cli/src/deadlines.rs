//! # Deadlines Subcommand
//!
//! Generates timelines for one or more circulars under the same options
//! and lists the deadlines that fall inside the alert window, soonest
//! first.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use regintel_core::{EngineConfig, ParsedCircular};
use regintel_timeline::{TimelineGenerationOptions, TimelineService};

use crate::input::read_document;

/// Default alert window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Arguments for the `regintel deadlines` subcommand.
#[derive(Args, Debug)]
pub struct DeadlinesArgs {
    /// Parsed circular (JSON or YAML). Repeat for several circulars.
    #[arg(long = "circular", value_name = "FILE", required = true)]
    pub circulars: Vec<PathBuf>,

    /// Timeline generation options (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub options: PathBuf,

    /// Organization the timelines are tailored to.
    #[arg(long)]
    pub organization_id: Option<String>,

    /// Alert window in days.
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub within_days: i64,

    /// Evaluate as of this instant (RFC 3339) instead of now.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,
}

/// Execute the deadlines subcommand.
pub fn run_deadlines(
    args: &DeadlinesArgs,
    config: &EngineConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let options: TimelineGenerationOptions = read_document(&args.options)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let service = TimelineService::new(config.clone());

    for path in &args.circulars {
        let circular: ParsedCircular = read_document(path)?;
        let result = service.generate_timeline_at(
            &circular.circular_id,
            &circular,
            &options,
            args.organization_id.as_deref(),
            now,
        );
        if crate::validated(result)?.is_none() {
            tracing::error!(path = %path.display(), "rejected circular");
            return Ok(1);
        }
    }

    let alerts = service.upcoming_deadlines_at(now, args.within_days);
    tracing::info!(
        circulars = args.circulars.len(),
        alerts = alerts.len(),
        within_days = args.within_days,
        "collected deadline alerts"
    );
    crate::write_json(out, &alerts)?;
    Ok(0)
}
