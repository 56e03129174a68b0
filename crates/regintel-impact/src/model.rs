//! # Impact Assessment Model
//!
//! The [`ImpactAssessment`] aggregate and its parts. Assessments are
//! immutable once computed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use regintel_core::{ImpactLevel, Priority};

/// The five weighted impact factors, each in 1–10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactors {
    /// Processes, systems and people.
    pub operational: f64,
    /// Capital, cost and revenue.
    pub financial: f64,
    /// Exposure to the regulator.
    pub regulatory: f64,
    /// Public and customer perception.
    pub reputational: f64,
    /// Business model and direction.
    pub strategic: f64,
}

impl ImpactFactors {
    /// Every factor at `value`.
    pub fn uniform(value: f64) -> Self {
        Self {
            operational: value,
            financial: value,
            regulatory: value,
            reputational: value,
            strategic: value,
        }
    }

    /// The factors as an array, in declaration order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.operational,
            self.financial,
            self.regulatory,
            self.reputational,
            self.strategic,
        ]
    }
}

/// Overall impact: weighted score, its level, and the factors behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallImpact {
    /// Weighted score, 1–10.
    pub score: f64,
    /// Categorical level of `score`.
    pub level: ImpactLevel,
    /// The factors `score` was computed from.
    pub factors: ImpactFactors,
}

/// Effort needed to address an impact area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    /// Routine change.
    Low,
    /// Planned project.
    Medium,
    /// Major programme.
    High,
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// A business area the circular touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactArea {
    /// Area name.
    pub area: String,
    /// What changes in this area.
    pub description: String,
    /// Impact on the area, 1–10.
    pub impact_score: f64,
    /// Effort to address it.
    pub effort: Effort,
    /// Priority to address it.
    pub priority: Priority,
    /// Processes affected.
    pub affected_processes: Vec<String>,
    /// Changes required.
    pub required_changes: Vec<String>,
}

/// One phase of the fixed implementation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationPhase {
    /// Phase name.
    pub phase: String,
    /// Duration range, e.g. `"2-4 weeks"`.
    pub duration: String,
    /// Shortest duration in weeks.
    pub min_weeks: u32,
    /// Longest duration in weeks.
    pub max_weeks: u32,
    /// Work done in the phase.
    pub activities: Vec<String>,
    /// What the phase produces.
    pub deliverables: Vec<String>,
}

/// Implementation plan attached to an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    /// Phases, in order.
    pub phases: Vec<ImplementationPhase>,
    /// Sum of the phase ranges, e.g. `"12-19 weeks"`.
    pub total_duration: String,
}

/// A recommended action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecommendation {
    /// Short title.
    pub title: String,
    /// What to do.
    pub description: String,
    /// How urgent it is.
    pub priority: Priority,
    /// Area or theme it belongs to.
    pub category: String,
    /// Suggested time frame, e.g. `"1-2 weeks"`.
    pub timeframe: String,
}

/// A single assessed risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessedRisk {
    /// What could go wrong.
    pub risk: String,
    /// Likelihood, 0–1.
    pub likelihood: f64,
    /// Severity, 0–1.
    pub impact: f64,
    /// `likelihood × impact`.
    pub score: f64,
    /// How to reduce it.
    pub mitigation: String,
}

impl AssessedRisk {
    pub(crate) fn new(risk: &str, likelihood: f64, impact: f64, mitigation: &str) -> Self {
        Self {
            risk: risk.to_string(),
            likelihood,
            impact,
            score: likelihood * impact,
            mitigation: mitigation.to_string(),
        }
    }
}

/// Risks of implementing (or failing to implement) the circular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Level of the highest-scoring risk.
    pub overall_risk: ImpactLevel,
    /// Individual risks, highest score first.
    pub risks: Vec<AssessedRisk>,
    /// Cross-cutting mitigation strategies.
    pub mitigation_strategies: Vec<String>,
}

/// Cost split across the fixed spending heads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// 40%.
    pub implementation: f64,
    /// 15%.
    pub training: f64,
    /// 25%.
    pub technology: f64,
    /// 10%.
    pub consulting: f64,
    /// 5%.
    pub ongoing: f64,
    /// 5%.
    pub contingency: f64,
}

impl CostBreakdown {
    /// Sum of every head.
    pub fn sum(&self) -> f64 {
        self.implementation
            + self.training
            + self.technology
            + self.consulting
            + self.ongoing
            + self.contingency
    }
}

/// Low and high bounds around a point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

/// Rough cost of implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Point estimate.
    pub total: f64,
    /// Range around `total`.
    pub range: CostRange,
    /// Split of `total`.
    pub breakdown: CostBreakdown,
}

/// Distance between the organization's maturity and what the circular
/// demands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceGap {
    /// Compliance maturity today.
    pub current_maturity: u8,
    /// Maturity the impact level calls for.
    pub required_maturity: u8,
    /// `required − current`, floored at 0, over 10.
    pub gap_score: f64,
    /// Identified gaps.
    pub gaps: Vec<String>,
    /// Areas to close first.
    pub priority_areas: Vec<String>,
}

/// A complete impact assessment of one circular for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    /// Unique identifier.
    pub id: String,
    /// Circular assessed.
    pub circular_id: String,
    /// Organization assessed.
    pub organization_id: String,
    /// Weighted overall impact.
    pub overall_impact: OverallImpact,
    /// Areas affected, highest score first.
    pub impact_areas: Vec<ImpactArea>,
    /// Implementation plan, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<ImplementationPlan>,
    /// Recommendations. Empty unless requested.
    pub recommendations: Vec<AssessmentRecommendation>,
    /// Risks.
    pub risk_assessment: RiskAssessment,
    /// Cost estimate, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<CostEstimate>,
    /// Maturity gap.
    pub compliance_gap: ComplianceGap,
    /// Confidence in the assessment, 0–0.95.
    pub confidence: f64,
    /// When it was computed.
    pub assessed_at: DateTime<Utc>,
    /// When it should be recomputed. Not enforced by the cache.
    pub valid_until: DateTime<Utc>,
}

impl ImpactAssessment {
    /// Whether `now` is past `valid_until`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }
}
