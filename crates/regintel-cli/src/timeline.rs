//! # Timeline Subcommand
//!
//! Generates the implementation timeline for one parsed circular and
//! prints the mapping.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use regintel_core::{EngineConfig, ParsedCircular};
use regintel_timeline::{TimelineGenerationOptions, TimelineService};

use crate::input::read_document;

/// Arguments for the `regintel timeline` subcommand.
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Parsed circular (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub circular: PathBuf,

    /// Timeline generation options (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub options: PathBuf,

    /// Organization the timeline is tailored to.
    #[arg(long)]
    pub organization_id: Option<String>,

    /// Evaluate statuses as of this instant (RFC 3339) instead of now.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,
}

/// Execute the timeline subcommand.
pub fn run_timeline(args: &TimelineArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<u8> {
    let circular: ParsedCircular = read_document(&args.circular)?;
    let options: TimelineGenerationOptions = read_document(&args.options)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let service = TimelineService::new(config.clone());
    let result = service.generate_timeline_at(
        &circular.circular_id,
        &circular,
        &options,
        args.organization_id.as_deref(),
        now,
    );
    let Some(mapping) = crate::validated(result)? else {
        return Ok(1);
    };

    crate::write_json(out, &mapping)?;
    Ok(0)
}
