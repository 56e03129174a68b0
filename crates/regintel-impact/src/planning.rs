//! # Plans, Recommendations, Risks, Cost and Gap
//!
//! Small fixed templates parameterized by the computed impact and areas
//! and by the organization profile.

use regintel_core::{ImpactLevel, OrganizationProfile, Priority, RiskAppetite};

use crate::model::{
    AssessedRisk, AssessmentRecommendation, ComplianceGap, CostBreakdown, CostEstimate,
    CostRange, ImpactArea, ImplementationPhase, ImplementationPlan, OverallImpact,
    RiskAssessment,
};

/// Cost units per point of area impact score.
pub const COST_PER_IMPACT_POINT: f64 = 10_000.0;

/// Relative half-width of the cost range.
pub const COST_RANGE_SPREAD: f64 = 0.2;

/// Currency of cost estimates.
pub const COST_CURRENCY: &str = "INR";

/// Maturity below this earns a capability recommendation and a gap entry.
const MATURITY_CONCERN: u8 = 6;

// ---------------------------------------------------------------------------
// Implementation plan
// ---------------------------------------------------------------------------

fn phase(
    name: &str,
    min_weeks: u32,
    max_weeks: u32,
    activities: &[&str],
    deliverables: &[&str],
) -> ImplementationPhase {
    ImplementationPhase {
        phase: name.to_string(),
        duration: format!("{min_weeks}-{max_weeks} weeks"),
        min_weeks,
        max_weeks,
        activities: activities.iter().map(|s| s.to_string()).collect(),
        deliverables: deliverables.iter().map(|s| s.to_string()).collect(),
    }
}

/// The fixed three-phase plan.
pub fn implementation_plan() -> ImplementationPlan {
    let phases = vec![
        phase(
            "Assessment and planning",
            2,
            4,
            &["Gap analysis", "Stakeholder mapping", "Implementation planning"],
            &["Gap analysis report", "Implementation plan"],
        ),
        phase(
            "Implementation",
            8,
            12,
            &["Policy updates", "System changes", "Process redesign", "Staff training"],
            &["Updated policies", "Deployed system changes", "Training records"],
        ),
        phase(
            "Testing and validation",
            2,
            3,
            &["User acceptance testing", "Compliance testing", "Sign-off"],
            &["Test report", "Compliance certificate"],
        ),
    ];
    let min: u32 = phases.iter().map(|p| p.min_weeks).sum();
    let max: u32 = phases.iter().map(|p| p.max_weeks).sum();
    ImplementationPlan {
        phases,
        total_duration: format!("{min}-{max} weeks"),
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

fn recommendation(
    title: String,
    description: String,
    priority: Priority,
    category: &str,
    timeframe: &str,
) -> AssessmentRecommendation {
    AssessmentRecommendation {
        title,
        description,
        priority,
        category: category.to_string(),
        timeframe: timeframe.to_string(),
    }
}

/// Recommendations for the computed impact.
pub fn recommendations(
    overall: &OverallImpact,
    areas: &[ImpactArea],
    profile: &OrganizationProfile,
) -> Vec<AssessmentRecommendation> {
    let mut recs = Vec::new();

    if matches!(overall.level, ImpactLevel::Critical | ImpactLevel::High) {
        recs.push(recommendation(
            "Establish an implementation steering committee".to_string(),
            format!(
                "Overall impact is {} ({:.1}); give the programme senior sponsorship and weekly tracking",
                overall.level, overall.score
            ),
            Priority::High,
            "Governance",
            "1-2 weeks",
        ));
    }

    for area in areas.iter().filter(|a| a.priority == Priority::High) {
        recs.push(recommendation(
            format!("Prioritise {}", area.area),
            format!(
                "{} carries the highest impact; start with: {}",
                area.area,
                area.required_changes.join(", ")
            ),
            Priority::High,
            &area.area,
            "2-4 weeks",
        ));
    }

    if profile.compliance_maturity < MATURITY_CONCERN {
        recs.push(recommendation(
            "Strengthen the compliance function".to_string(),
            "Add compliance capacity and formalise monitoring before implementation starts"
                .to_string(),
            Priority::Medium,
            "Compliance Operations",
            "4-8 weeks",
        ));
    }

    if profile.technology_maturity < MATURITY_CONCERN {
        recs.push(recommendation(
            "Upgrade regulatory technology".to_string(),
            "Automate data collection and reporting to reduce manual effort".to_string(),
            Priority::Medium,
            "Technology",
            "8-12 weeks",
        ));
    }

    recs.push(recommendation(
        "Monitor follow-up circulars".to_string(),
        "Track clarifications and FAQs issued after the circular".to_string(),
        Priority::Low,
        "Compliance Operations",
        "ongoing",
    ));

    recs
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

/// Implementation and posture risks, highest score first.
pub fn risk_assessment(overall: &OverallImpact, profile: &OrganizationProfile) -> RiskAssessment {
    let mut risks = vec![AssessedRisk::new(
        "Implementation delay",
        0.3 + 0.5 * profile.compliance_gap_ratio(),
        overall.score / 10.0,
        "Phase the work and track milestones against the plan",
    )];

    if profile.technology_maturity < 7 {
        risks.push(AssessedRisk::new(
            "System readiness",
            0.3 + 0.5 * profile.technology_gap_ratio(),
            0.6,
            "Engage technology vendors early and reserve change windows",
        ));
    }

    if !profile.violation_history.is_empty() {
        let count = profile.violation_history.len() as f64;
        risks.push(AssessedRisk::new(
            "Heightened regulatory scrutiny",
            (0.4 + 0.1 * count).min(0.9),
            0.8,
            "Close open findings and brief the regulator proactively",
        ));
    }

    if profile.risk_appetite == RiskAppetite::Aggressive {
        risks.push(AssessedRisk::new(
            "Control under-investment",
            0.5,
            0.7,
            "Set a minimum control budget independent of business targets",
        ));
    }

    risks.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top = risks.first().map_or(0.0, |r| r.score);

    RiskAssessment {
        overall_risk: ImpactLevel::from_score(top * 10.0),
        risks,
        mitigation_strategies: vec![
            "Assign an accountable owner for each requirement".to_string(),
            "Report progress to the board risk committee".to_string(),
            "Keep an evidence trail for supervisory review".to_string(),
        ],
    }
}

// ---------------------------------------------------------------------------
// Cost estimate
// ---------------------------------------------------------------------------

/// Cost estimate from area scores.
pub fn cost_estimate(areas: &[ImpactArea]) -> CostEstimate {
    let total: f64 = areas
        .iter()
        .map(|a| a.impact_score * COST_PER_IMPACT_POINT)
        .sum();
    CostEstimate {
        currency: COST_CURRENCY.to_string(),
        total,
        range: CostRange {
            low: total * (1.0 - COST_RANGE_SPREAD),
            high: total * (1.0 + COST_RANGE_SPREAD),
        },
        breakdown: CostBreakdown {
            implementation: total * 0.40,
            training: total * 0.15,
            technology: total * 0.25,
            consulting: total * 0.10,
            ongoing: total * 0.05,
            contingency: total * 0.05,
        },
    }
}

// ---------------------------------------------------------------------------
// Compliance gap
// ---------------------------------------------------------------------------

/// Maturity an organization needs for a given impact level.
pub fn required_maturity(level: ImpactLevel) -> u8 {
    match level {
        ImpactLevel::Critical => 9,
        ImpactLevel::High => 8,
        ImpactLevel::Medium => 7,
        ImpactLevel::Low => 6,
        ImpactLevel::Minimal => 5,
    }
}

/// Gap between current and required maturity.
pub fn compliance_gap(
    overall: &OverallImpact,
    areas: &[ImpactArea],
    profile: &OrganizationProfile,
) -> ComplianceGap {
    let required = required_maturity(overall.level);
    let current = profile.compliance_maturity;

    let mut gaps = Vec::new();
    if current < required {
        gaps.push(format!(
            "Compliance maturity {current} is below the {required} this impact level calls for"
        ));
    }
    if profile.technology_maturity < required {
        gaps.push(format!(
            "Technology maturity {} is below the {required} this impact level calls for",
            profile.technology_maturity
        ));
    }
    if !profile.violation_history.is_empty() {
        gaps.push(format!(
            "{} past violation(s) indicate control weaknesses to remediate",
            profile.violation_history.len()
        ));
    }

    let mut priority_areas: Vec<String> = areas
        .iter()
        .filter(|a| a.priority == Priority::High)
        .map(|a| a.area.clone())
        .collect();
    if priority_areas.is_empty() {
        priority_areas.extend(areas.first().map(|a| a.area.clone()));
    }

    ComplianceGap {
        current_maturity: current,
        required_maturity: required,
        gap_score: f64::from(required.saturating_sub(current)) / 10.0,
        gaps,
        priority_areas,
    }
}
