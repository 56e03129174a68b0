//! # Impact Scoring
//!
//! Every factor starts at 5 and is adjusted in a fixed order:
//!
//! 1. Category add-table (circular only).
//! 2. Impact-level multiplier on all five (circular only).
//! 3. +1 operational and regulatory for more than five requirements
//!    (circular only).
//! 4. Size multiplier on operational and financial.
//! 5. Compliance gap added to operational and regulatory; technology gap
//!    added to operational.
//! 6. Clamp to 1–10.
//!
//! The overall score is the weighted sum below, so it also lies in 1–10.

use regintel_core::{ImpactLevel, OrganizationProfile, ParsedCircular};

use crate::model::{ImpactFactors, OverallImpact};
use crate::request::AnalysisType;

/// Starting value of every factor.
pub const BASE_FACTOR: f64 = 5.0;

/// Weights of operational, financial, regulatory, reputational and
/// strategic factors. Sum to 1.
pub const FACTOR_WEIGHTS: [f64; 5] = [0.3, 0.2, 0.3, 0.1, 0.1];

/// A circular with more requirements than this adds operational and
/// regulatory load.
const MANY_REQUIREMENTS: usize = 5;

const MIN_FACTOR: f64 = 1.0;
const MAX_FACTOR: f64 = 10.0;

const BASE_CONFIDENCE: f64 = 0.7;
const MAX_CONFIDENCE: f64 = 0.95;

/// Compute the five factors.
pub fn impact_factors(
    profile: &OrganizationProfile,
    circular: Option<&ParsedCircular>,
) -> ImpactFactors {
    let mut f = ImpactFactors::uniform(BASE_FACTOR);

    if let Some(circular) = circular {
        let adj = circular.category().factor_adjustment();
        f.operational += adj.operational;
        f.financial += adj.financial;
        f.regulatory += adj.regulatory;
        f.reputational += adj.reputational;
        f.strategic += adj.strategic;

        let m = circular.metadata.impact_level.circular_multiplier();
        f.operational *= m;
        f.financial *= m;
        f.regulatory *= m;
        f.reputational *= m;
        f.strategic *= m;

        if circular.content.requirements.len() > MANY_REQUIREMENTS {
            f.operational += 1.0;
            f.regulatory += 1.0;
        }
    }

    let size = profile.size.impact_multiplier();
    f.operational *= size;
    f.financial *= size;

    let compliance_gap = profile.compliance_gap_ratio();
    f.operational += compliance_gap + profile.technology_gap_ratio();
    f.regulatory += compliance_gap;

    let clamp = |v: f64| v.clamp(MIN_FACTOR, MAX_FACTOR);
    ImpactFactors {
        operational: clamp(f.operational),
        financial: clamp(f.financial),
        regulatory: clamp(f.regulatory),
        reputational: clamp(f.reputational),
        strategic: clamp(f.strategic),
    }
}

/// Weighted sum of the factors.
pub fn weighted_score(factors: &ImpactFactors) -> f64 {
    factors
        .as_array()
        .iter()
        .zip(FACTOR_WEIGHTS)
        .map(|(value, weight)| value * weight)
        .sum()
}

/// Factors, weighted score and level.
pub fn overall_impact(
    profile: &OrganizationProfile,
    circular: Option<&ParsedCircular>,
) -> OverallImpact {
    let factors = impact_factors(profile, circular);
    let score = weighted_score(&factors);
    OverallImpact {
        score,
        level: ImpactLevel::from_score(score),
        factors,
    }
}

/// Confidence in an assessment.
///
/// 0.7, plus 0.1 for a parser confidence above 0.8, 0.1 for a
/// comprehensive analysis and 0.05 for compliance maturity above 7;
/// capped at 0.95.
pub fn confidence(
    profile: &OrganizationProfile,
    analysis_type: AnalysisType,
    circular: Option<&ParsedCircular>,
) -> f64 {
    let mut c = BASE_CONFIDENCE;
    if circular.is_some_and(|p| p.confidence > 0.8) {
        c += 0.1;
    }
    if analysis_type == AnalysisType::Comprehensive {
        c += 0.1;
    }
    if profile.compliance_maturity > 7 {
        c += 0.05;
    }
    c.min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use regintel_core::{
        CircularAnalysis, CircularContent, CircularMetadata, ComplianceRequirement,
        OrganizationSize, Priority, RiskAppetite,
    };

    fn profile(size: OrganizationSize, compliance: u8, technology: u8) -> OrganizationProfile {
        OrganizationProfile {
            size,
            compliance_maturity: compliance,
            technology_maturity: technology,
            risk_appetite: RiskAppetite::Moderate,
            asset_size: 1_000.0,
            team_size: 10,
            violation_history: Vec::new(),
        }
    }

    fn circular(category: &str, level: ImpactLevel, requirements: usize) -> ParsedCircular {
        ParsedCircular {
            circular_id: "C1".into(),
            metadata: CircularMetadata {
                number: "N1".into(),
                title: "T".into(),
                published_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
                effective_date: None,
                category: category.into(),
                impact_level: level,
                affected_entities: Vec::new(),
            },
            content: CircularContent {
                requirements: (0..requirements)
                    .map(|i| ComplianceRequirement {
                        id: format!("R{i}"),
                        description: "d".into(),
                        priority: Priority::Medium,
                        category: String::new(),
                        deadline: None,
                        affected_entities: Vec::new(),
                    })
                    .collect(),
                ..CircularContent::default()
            },
            analysis: CircularAnalysis::default(),
            confidence: 0.9,
            processing_time_ms: 0,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((FACTOR_WEIGHTS.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn without_circular_only_profile_adjusts() {
        let o = overall_impact(&profile(OrganizationSize::Medium, 10, 10), None);
        assert_eq!(o.factors, ImpactFactors::uniform(5.0));
        assert!((o.score - 5.0).abs() < 1e-9);
        assert_eq!(o.level, ImpactLevel::Medium);
    }

    #[test]
    fn small_mature_organization_scores_low() {
        // op 4, fin 4, reg 5, rep 5, strat 5
        let o = overall_impact(&profile(OrganizationSize::Small, 10, 10), None);
        assert!((o.score - 4.5).abs() < 1e-9);
        assert_eq!(o.level, ImpactLevel::Low);
    }

    #[test]
    fn capital_adequacy_high_impact_for_large_bank() {
        let c = circular("Capital Adequacy", ImpactLevel::High, 2);
        let o = overall_impact(&profile(OrganizationSize::Large, 7, 6), Some(&c));
        // op: 5 × 1.3 × 1.2 + 0.3 + 0.4
        assert!((o.factors.operational - 8.5).abs() < 1e-9);
        // fin and reg saturate.
        assert_eq!(o.factors.financial, 10.0);
        assert_eq!(o.factors.regulatory, 10.0);
        assert!((o.factors.reputational - 6.5).abs() < 1e-9);
        assert!((o.factors.strategic - 6.5).abs() < 1e-9);
        assert!((o.score - 8.85).abs() < 1e-9);
        assert_eq!(o.level, ImpactLevel::Critical);
    }

    #[test]
    fn many_requirements_add_load() {
        let few = circular("General", ImpactLevel::Medium, 5);
        let many = circular("General", ImpactLevel::Medium, 6);
        let p = profile(OrganizationSize::Medium, 10, 10);
        let a = impact_factors(&p, Some(&few));
        let b = impact_factors(&p, Some(&many));
        assert!((b.operational - a.operational - 1.0).abs() < 1e-9);
        assert!((b.regulatory - a.regulatory - 1.0).abs() < 1e-9);
        assert_eq!(a.financial, b.financial);
    }

    #[test]
    fn minimal_level_does_not_scale() {
        let c = circular("General", ImpactLevel::Minimal, 0);
        let o = overall_impact(&profile(OrganizationSize::Medium, 10, 10), Some(&c));
        assert_eq!(o.factors, ImpactFactors::uniform(5.0));
    }

    #[test]
    fn factors_clamped() {
        let c = circular("KYC/AML", ImpactLevel::Critical, 20);
        let o = overall_impact(&profile(OrganizationSize::VeryLarge, 1, 1), Some(&c));
        for v in o.factors.as_array() {
            assert!((1.0..=10.0).contains(&v));
        }
        assert!(o.score <= 10.0);
    }

    #[test]
    fn confidence_rules() {
        let mature = profile(OrganizationSize::Medium, 8, 5);
        let novice = profile(OrganizationSize::Medium, 5, 5);
        let c = circular("General", ImpactLevel::Low, 0);
        let mut shaky = c.clone();
        shaky.confidence = 0.5;

        assert!((confidence(&novice, AnalysisType::Basic, None) - 0.7).abs() < 1e-9);
        assert!((confidence(&novice, AnalysisType::Basic, Some(&shaky)) - 0.7).abs() < 1e-9);
        assert!((confidence(&novice, AnalysisType::Basic, Some(&c)) - 0.8).abs() < 1e-9);
        assert!((confidence(&novice, AnalysisType::Comprehensive, Some(&c)) - 0.9).abs() < 1e-9);
        // 0.7 + 0.1 + 0.1 + 0.05 caps at 0.95.
        assert!((confidence(&mature, AnalysisType::Comprehensive, Some(&c)) - 0.95).abs() < 1e-9);
    }
}
