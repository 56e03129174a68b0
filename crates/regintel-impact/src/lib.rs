//! # regintel-impact — Impact Assessment of Regulatory Circulars
//!
//! Scores how hard a circular hits one organization and attaches the
//! material a compliance team plans with.
//!
//! ## Pipeline
//!
//! 1. **Overall impact** (`scoring.rs`): five factors from 5, adjusted by
//!    category, impact level, requirement count, size and maturity,
//!    clamped to 1–10, weighted 0.3/0.2/0.3/0.1/0.1.
//! 2. **Impact areas** (`areas.rs`): three standard areas, +2 where the
//!    circular's category overlaps.
//! 3. **Plan, recommendations, risks, cost, gap** (`planning.rs`): fixed
//!    templates.
//! 4. **Confidence** (`scoring.rs`): 0.7 plus bonuses, capped at 0.95.
//!
//! [`ImpactAssessor`] validates requests and memoizes per
//! `(circular_id, organization_id)`.

pub mod areas;
pub mod model;
pub mod planning;
pub mod request;
pub mod scoring;
pub mod service;

pub use model::{
    AssessedRisk, AssessmentRecommendation, ComplianceGap, CostBreakdown, CostEstimate, CostRange,
    Effort, ImpactArea, ImpactAssessment, ImpactFactors, ImplementationPhase, ImplementationPlan,
    OverallImpact, RiskAssessment,
};
pub use request::{AnalysisType, ImpactAssessmentRequest};
pub use service::{AssessmentStats, ImpactAssessor};
