//! Standard impact areas and how a circular scores against them.

use regintel_core::{ParsedCircular, Priority};

use crate::model::{Effort, ImpactArea};

/// Score every area starts from.
const BASE_AREA_SCORE: f64 = 5.0;

/// Added when the circular's category overlaps the area.
const CATEGORY_OVERLAP_BONUS: f64 = 2.0;

/// Areas at or below this score are dropped.
const AREA_CUTOFF: f64 = 3.0;

struct StandardArea {
    name: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    processes: &'static [&'static str],
    changes: &'static [&'static str],
}

const STANDARD_AREAS: &[StandardArea] = &[
    StandardArea {
        name: "Capital Management",
        description: "Capital planning, buffers and capital adequacy reporting",
        keywords: &["capital", "basel", "leverage", "liquidity"],
        processes: &["Capital planning", "ICAAP", "Regulatory capital reporting"],
        changes: &[
            "Recalibrate capital computation",
            "Update capital planning policy",
        ],
    },
    StandardArea {
        name: "Risk Management",
        description: "Risk identification, measurement and control frameworks",
        keywords: &["risk", "credit", "lending", "cyber"],
        processes: &["Risk appetite setting", "Credit appraisal", "Risk reporting"],
        changes: &[
            "Revise risk policies and limits",
            "Extend risk data aggregation",
        ],
    },
    StandardArea {
        name: "Compliance Operations",
        description: "Day-to-day compliance monitoring, KYC and regulatory reporting",
        keywords: &["compliance", "kyc", "aml", "report", "return", "governance", "consumer"],
        processes: &["Compliance monitoring", "Customer due diligence", "Regulatory returns"],
        changes: &[
            "Update compliance testing plan",
            "Train front-line and compliance staff",
        ],
    },
];

fn overlaps(area: &StandardArea, circular: &ParsedCircular) -> bool {
    let label = format!(
        "{} {}",
        circular.metadata.category.to_lowercase(),
        circular.category().to_string().to_lowercase()
    );
    area.keywords.iter().any(|k| label.contains(k))
}

/// Effort and priority for an area score.
pub fn classify(score: f64) -> (Effort, Priority) {
    if score >= 7.0 {
        (Effort::High, Priority::High)
    } else if score >= 5.0 {
        (Effort::Medium, Priority::Medium)
    } else {
        (Effort::Low, Priority::Low)
    }
}

/// Score the standard areas against the circular, keep those above the
/// cutoff, highest score first.
///
/// Without a circular every area keeps its base score.
pub fn impact_areas(circular: Option<&ParsedCircular>) -> Vec<ImpactArea> {
    let mut areas: Vec<ImpactArea> = STANDARD_AREAS
        .iter()
        .map(|area| {
            let bonus = match circular {
                Some(c) if overlaps(area, c) => CATEGORY_OVERLAP_BONUS,
                _ => 0.0,
            };
            let score = BASE_AREA_SCORE + bonus;
            let (effort, priority) = classify(score);
            ImpactArea {
                area: area.name.to_string(),
                description: area.description.to_string(),
                impact_score: score,
                effort,
                priority,
                affected_processes: area.processes.iter().map(|s| s.to_string()).collect(),
                required_changes: area.changes.iter().map(|s| s.to_string()).collect(),
            }
        })
        .filter(|a| a.impact_score > AREA_CUTOFF)
        .collect();
    areas.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    areas
}
