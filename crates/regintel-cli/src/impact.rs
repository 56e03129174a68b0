//! # Impact Subcommand
//!
//! Assesses a circular's impact on one organization and prints the
//! assessment. The parsed circular is optional; without it only the
//! organization profile drives the score.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use regintel_core::{EngineConfig, ParsedCircular};
use regintel_impact::{ImpactAssessmentRequest, ImpactAssessor};

use crate::input::read_document;

/// Arguments for the `regintel impact` subcommand.
#[derive(Args, Debug)]
pub struct ImpactArgs {
    /// Impact assessment request (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,

    /// Parsed circular the request refers to (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub circular: Option<PathBuf>,

    /// Assessment instant (RFC 3339) instead of now.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,
}

/// Execute the impact subcommand.
pub fn run_impact(args: &ImpactArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<u8> {
    let request: ImpactAssessmentRequest = read_document(&args.request)?;
    let circular: Option<ParsedCircular> = args
        .circular
        .as_deref()
        .map(read_document)
        .transpose()?;
    let now = args.now.unwrap_or_else(Utc::now);

    let assessor = ImpactAssessor::new(config.clone());
    let result = assessor.assess_impact_at(&request, circular.as_ref(), now);
    let Some(assessment) = crate::validated(result)? else {
        return Ok(1);
    };

    crate::write_json(out, &assessment)?;
    Ok(0)
}
