//! # CLI Command Tests
//!
//! Drives the `run_*` handlers behind `regintel timeline`, `regintel impact`
//! and `regintel deadlines` with files in a temporary directory, capturing
//! stdout in a buffer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use regintel_cli::deadlines::{run_deadlines, DeadlinesArgs};
use regintel_cli::impact::{run_impact, ImpactArgs};
use regintel_cli::load_config;
use regintel_cli::timeline::{run_timeline, TimelineArgs};
use regintel_core::{
    CircularAnalysis, CircularContent, CircularMetadata, ComplianceRequirement, EngineConfig,
    ImpactLevel, ParsedCircular, Priority,
};
use regintel_impact::ImpactAssessment;
use regintel_timeline::{DeadlineAlert, TimelineMapping};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OPTIONS_YAML: &str = "\
organization_type: commercial_bank
organization_size: large
compliance_maturity: 7
include_risk_assessment: true
";

const REQUEST_YAML: &str = "\
circular_id: RBI/2024/120
organization_id: bank-1
organization_type: commercial_bank
analysis_type: comprehensive
include_timeline: true
include_cost_estimate: true
organization_profile:
  size: large
  compliance_maturity: 7
  technology_maturity: 6
";

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn circular(id: &str, published: DateTime<Utc>) -> ParsedCircular {
    ParsedCircular {
        circular_id: id.to_string(),
        metadata: CircularMetadata {
            number: format!("{id}/N"),
            title: "Revised framework for capital adequacy".to_string(),
            published_date: published,
            effective_date: None,
            category: "Capital Adequacy".to_string(),
            impact_level: ImpactLevel::High,
            affected_entities: Vec::new(),
        },
        content: CircularContent {
            requirements: vec![ComplianceRequirement {
                id: "CA-1".to_string(),
                description: "Maintain CET1 at 8% of risk-weighted assets".to_string(),
                priority: Priority::High,
                category: String::new(),
                deadline: None,
                affected_entities: Vec::new(),
            }],
            ..CircularContent::default()
        },
        analysis: CircularAnalysis::default(),
        confidence: 0.9,
        processing_time_ms: 0,
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn write_circular(dir: &Path, name: &str, c: &ParsedCircular) -> PathBuf {
    write(dir, name, &serde_json::to_string_pretty(c).unwrap())
}

// ---------------------------------------------------------------------------
// 1. timeline
// ---------------------------------------------------------------------------

#[test]
fn timeline_command_prints_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let args = TimelineArgs {
        circular: write_circular(
            dir.path(),
            "circular.json",
            &circular("RBI/2024/120", date(2024, 1, 15)),
        ),
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: Some("bank-1".to_string()),
        now: Some(date(2024, 1, 1)),
    };

    let mut out: Vec<u8> = Vec::new();
    let code = run_timeline(&args, &EngineConfig::default(), &mut out).unwrap();
    assert_eq!(code, 0);

    let mapping: TimelineMapping = serde_json::from_slice(&out).unwrap();
    assert_eq!(mapping.circular_id, "RBI/2024/120");
    assert_eq!(mapping.organization_id.as_deref(), Some("bank-1"));
    assert!(mapping.is_sorted());
    assert_eq!(mapping.event("RBI/2024/120-req-1").unwrap().date, date(2024, 2, 8));
}

#[test]
fn timeline_command_rejects_invalid_options() {
    let dir = tempfile::tempdir().unwrap();
    let args = TimelineArgs {
        circular: write_circular(dir.path(), "c.json", &circular("C1", date(2024, 1, 15))),
        options: write(
            dir.path(),
            "options.yml",
            "organization_type: nbfc\norganization_size: small\ncompliance_maturity: 0\n",
        ),
        organization_id: None,
        now: Some(date(2024, 1, 1)),
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_timeline(&args, &EngineConfig::default(), &mut out).unwrap(), 1);
    assert!(out.is_empty());
}

#[test]
fn timeline_command_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = TimelineArgs {
        circular: dir.path().join("absent.json"),
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: None,
        now: None,
    };

    let err = run_timeline(&args, &EngineConfig::default(), &mut Vec::<u8>::new()).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

// ---------------------------------------------------------------------------
// 2. impact
// ---------------------------------------------------------------------------

#[test]
fn impact_command_prints_assessment() {
    let dir = tempfile::tempdir().unwrap();
    let args = ImpactArgs {
        request: write(dir.path(), "request.yaml", REQUEST_YAML),
        circular: Some(write_circular(
            dir.path(),
            "circular.json",
            &circular("RBI/2024/120", date(2024, 1, 15)),
        )),
        now: Some(date(2024, 1, 20)),
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_impact(&args, &EngineConfig::default(), &mut out).unwrap(), 0);

    let a: ImpactAssessment = serde_json::from_slice(&out).unwrap();
    assert_eq!(a.organization_id, "bank-1");
    assert!((a.overall_impact.score - 8.85).abs() < 1e-9);
    assert!(a.timeline.is_some());
    assert!(a.cost_estimate.is_some());
    assert!(a.recommendations.is_empty());
    assert!((a.confidence - 0.9).abs() < 1e-9);
}

#[test]
fn impact_command_rejects_mismatched_circular() {
    let dir = tempfile::tempdir().unwrap();
    let args = ImpactArgs {
        request: write(dir.path(), "request.yaml", REQUEST_YAML),
        circular: Some(write_circular(
            dir.path(),
            "other.json",
            &circular("RBI/2024/999", date(2024, 1, 15)),
        )),
        now: None,
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_impact(&args, &EngineConfig::default(), &mut out).unwrap(), 1);
    assert!(out.is_empty());
}

// ---------------------------------------------------------------------------
// 3. deadlines
// ---------------------------------------------------------------------------

#[test]
fn deadlines_command_lists_alerts_across_circulars() {
    let dir = tempfile::tempdir().unwrap();
    let args = DeadlinesArgs {
        circulars: vec![
            write_circular(dir.path(), "a.json", &circular("A", date(2024, 1, 15))),
            write_circular(dir.path(), "b.json", &circular("B", date(2024, 1, 18))),
        ],
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: None,
        within_days: 30,
        now: Some(date(2024, 1, 20)),
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_deadlines(&args, &EngineConfig::default(), &mut out).unwrap(), 0);

    let alerts: Vec<DeadlineAlert> = serde_json::from_slice(&out).unwrap();
    let ids: Vec<&str> = alerts.iter().map(|a| a.event_id.as_str()).collect();
    assert_eq!(ids, vec!["A-req-1", "B-req-1"]);
}

#[test]
fn deadlines_command_accepts_window_past_the_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let args = DeadlinesArgs {
        circulars: vec![write_circular(
            dir.path(),
            "a.json",
            &circular("A", date(2024, 1, 15)),
        )],
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: None,
        within_days: i64::MAX,
        now: Some(date(2024, 1, 20)),
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_deadlines(&args, &EngineConfig::default(), &mut out).unwrap(), 0);

    let alerts: Vec<DeadlineAlert> = serde_json::from_slice(&out).unwrap();
    let ids: Vec<&str> = alerts.iter().map(|a| a.event_id.as_str()).collect();
    assert_eq!(ids, vec!["A-req-1"]);
}

#[test]
fn deadlines_command_stops_at_first_invalid_circular() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = circular("BAD", date(2024, 1, 15));
    bad.confidence = 3.0;
    let args = DeadlinesArgs {
        circulars: vec![
            write_circular(dir.path(), "ok.json", &circular("OK", date(2024, 1, 15))),
            write_circular(dir.path(), "bad.json", &bad),
        ],
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: None,
        within_days: 30,
        now: Some(date(2024, 1, 20)),
    };

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_deadlines(&args, &EngineConfig::default(), &mut out).unwrap(), 1);
    assert!(out.is_empty());
}

// ---------------------------------------------------------------------------
// 4. configuration
// ---------------------------------------------------------------------------

#[test]
fn configured_validity_reaches_the_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(
        dir.path(),
        "regintel.yaml",
        "timeline_validity_days: 10\ncache:\n  capacity: 4\n",
    );
    let config = load_config(Some(config_path.as_path())).unwrap();
    assert_eq!(config.cache.capacity, Some(4));

    let args = TimelineArgs {
        circular: write_circular(dir.path(), "c.json", &circular("C1", date(2024, 1, 15))),
        options: write(dir.path(), "options.yaml", OPTIONS_YAML),
        organization_id: None,
        now: Some(date(2024, 1, 1)),
    };
    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_timeline(&args, &config, &mut out).unwrap(), 0);

    let mapping: TimelineMapping = serde_json::from_slice(&out).unwrap();
    assert_eq!(mapping.valid_until, date(2024, 1, 11));
}
