//! # Heuristic Lookup Tables
//!
//! The timeline and impact engines are driven by a handful of fixed tables:
//! priority → base implementation days, organization size → multipliers,
//! circular impact level → multiplier, and regulatory category → factor
//! adjustments. Each table is an exhaustive `match` on an enum, so adding a
//! variant is a compile error until every table covers it.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority of a requirement, deadline, or timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Must be addressed first.
    Critical,
    /// Important and time-sensitive.
    High,
    /// Default priority.
    Medium,
    /// Can be scheduled last.
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Base number of days an organization needs to implement a requirement
    /// of this priority, before size and maturity scaling.
    pub fn base_implementation_days(self) -> f64 {
        match self {
            Self::Critical => 7.0,
            Self::High => 14.0,
            Self::Medium => 30.0,
            Self::Low => 60.0,
        }
    }

    /// Whether this priority puts an event on the critical path.
    pub fn is_critical_path(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("critical"),
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

// ---------------------------------------------------------------------------
// OrganizationSize
// ---------------------------------------------------------------------------

/// Size class of a regulated organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationSize {
    /// Systemically important institutions.
    VeryLarge,
    /// Large institutions.
    Large,
    /// Mid-sized institutions.
    Medium,
    /// Small institutions.
    Small,
}

impl OrganizationSize {
    /// Multiplier applied to implementation durations. Larger organizations
    /// take longer to roll out change.
    pub fn timeline_multiplier(self) -> f64 {
        match self {
            Self::VeryLarge => 1.5,
            Self::Large => 1.3,
            Self::Medium => 1.0,
            Self::Small => 0.8,
        }
    }

    /// Multiplier applied to the operational and financial impact factors.
    pub fn impact_multiplier(self) -> f64 {
        match self {
            Self::VeryLarge => 1.3,
            Self::Large => 1.2,
            Self::Medium => 1.0,
            Self::Small => 0.8,
        }
    }

    /// All size classes, largest first.
    pub fn all() -> &'static [OrganizationSize] {
        &[Self::VeryLarge, Self::Large, Self::Medium, Self::Small]
    }
}

impl fmt::Display for OrganizationSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryLarge => f.write_str("very_large"),
            Self::Large => f.write_str("large"),
            Self::Medium => f.write_str("medium"),
            Self::Small => f.write_str("small"),
        }
    }
}

// ---------------------------------------------------------------------------
// ImpactLevel
// ---------------------------------------------------------------------------

/// Coarse severity classification.
///
/// Used both for the impact level the parser assigns to a circular and for
/// the categorical level of a computed impact score. The parser never emits
/// `Minimal`; scoring does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    /// Score at or above 8.5.
    Critical,
    /// Score at or above 7.
    High,
    /// Score at or above 5.
    Medium,
    /// Score at or above 3.
    Low,
    /// Anything lower.
    Minimal,
}

impl ImpactLevel {
    /// Multiplier applied to every impact factor for a circular of this level.
    ///
    /// `Minimal` takes the default branch (no scaling).
    pub fn circular_multiplier(self) -> f64 {
        match self {
            Self::Critical => 1.5,
            Self::High => 1.3,
            Self::Medium => 1.1,
            Self::Low => 0.9,
            Self::Minimal => 1.0,
        }
    }

    /// Map a 1–10 score to its categorical level.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 5.0 {
            Self::Medium
        } else if score >= 3.0 {
            Self::Low
        } else {
            Self::Minimal
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("critical"),
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
            Self::Minimal => f.write_str("minimal"),
        }
    }
}

// ---------------------------------------------------------------------------
// RegulatoryCategory
// ---------------------------------------------------------------------------

/// Additive adjustments to the five impact factors for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactorAdjustment {
    /// Added to the operational factor.
    pub operational: f64,
    /// Added to the financial factor.
    pub financial: f64,
    /// Added to the regulatory factor.
    pub regulatory: f64,
    /// Added to the reputational factor.
    pub reputational: f64,
    /// Added to the strategic factor.
    pub strategic: f64,
}

/// Regulatory category of a circular.
///
/// The parser emits free-text labels ("Capital Adequacy", "KYC/AML", ...).
/// [`RegulatoryCategory::from_label`] folds them onto this fixed set; any
/// label it does not recognise becomes `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryCategory {
    /// Capital adequacy, Basel norms, buffers.
    CapitalAdequacy,
    /// Risk management frameworks.
    RiskManagement,
    /// KYC, AML, CFT.
    KycAml,
    /// Digital lending, payments, cyber security.
    DigitalPayments,
    /// Credit, lending, asset classification.
    CreditManagement,
    /// Board, audit, governance.
    Governance,
    /// Returns and regulatory reporting.
    Reporting,
    /// Customer service, grievance redress, fair practice.
    ConsumerProtection,
    /// FEMA, forex, cross-border.
    ForeignExchange,
    /// Anything else.
    General,
}

impl RegulatoryCategory {
    /// Fold a free-text category label onto the fixed category set.
    ///
    /// Matching is case-insensitive on keywords; the first match wins.
    pub fn from_label(label: &str) -> Self {
        let l = label.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| l.contains(n));

        if has(&["capital", "basel", "leverage"]) {
            Self::CapitalAdequacy
        } else if has(&["kyc", "aml", "money laundering", "know your customer", "cft"]) {
            Self::KycAml
        } else if has(&["risk"]) {
            Self::RiskManagement
        } else if has(&["digital", "payment", "cyber", "technology", "upi"]) {
            Self::DigitalPayments
        } else if has(&["credit", "lending", "loan", "npa", "asset classification"]) {
            Self::CreditManagement
        } else if has(&["governance", "board", "audit"]) {
            Self::Governance
        } else if has(&["report", "return", "disclosure"]) {
            Self::Reporting
        } else if has(&["consumer", "customer", "grievance", "fair practice"]) {
            Self::ConsumerProtection
        } else if has(&["foreign exchange", "forex", "fema", "cross-border", "remittance"]) {
            Self::ForeignExchange
        } else {
            Self::General
        }
    }

    /// Additive factor adjustments applied before the impact-level multiplier.
    pub fn factor_adjustment(self) -> FactorAdjustment {
        let zero = FactorAdjustment::default();
        match self {
            Self::CapitalAdequacy => FactorAdjustment {
                financial: 2.0,
                regulatory: 3.0,
                ..zero
            },
            Self::RiskManagement => FactorAdjustment {
                operational: 2.0,
                regulatory: 2.0,
                ..zero
            },
            Self::KycAml => FactorAdjustment {
                operational: 2.0,
                regulatory: 2.0,
                reputational: 2.0,
                ..zero
            },
            Self::DigitalPayments => FactorAdjustment {
                operational: 3.0,
                strategic: 1.0,
                ..zero
            },
            Self::CreditManagement => FactorAdjustment {
                operational: 1.0,
                financial: 2.0,
                ..zero
            },
            Self::Governance => FactorAdjustment {
                regulatory: 2.0,
                reputational: 1.0,
                strategic: 2.0,
                ..zero
            },
            Self::Reporting => FactorAdjustment {
                operational: 1.0,
                regulatory: 2.0,
                ..zero
            },
            Self::ConsumerProtection => FactorAdjustment {
                regulatory: 1.0,
                reputational: 3.0,
                ..zero
            },
            Self::ForeignExchange => FactorAdjustment {
                financial: 2.0,
                regulatory: 2.0,
                ..zero
            },
            Self::General => zero,
        }
    }
}

impl fmt::Display for RegulatoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CapitalAdequacy => "Capital Adequacy",
            Self::RiskManagement => "Risk Management",
            Self::KycAml => "KYC/AML",
            Self::DigitalPayments => "Digital Payments",
            Self::CreditManagement => "Credit Management",
            Self::Governance => "Governance",
            Self::Reporting => "Reporting",
            Self::ConsumerProtection => "Consumer Protection",
            Self::ForeignExchange => "Foreign Exchange",
            Self::General => "General",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_days_table() {
        assert_eq!(Priority::Critical.base_implementation_days(), 7.0);
        assert_eq!(Priority::High.base_implementation_days(), 14.0);
        assert_eq!(Priority::Medium.base_implementation_days(), 30.0);
        assert_eq!(Priority::Low.base_implementation_days(), 60.0);
    }

    #[test]
    fn size_multipliers_decrease_with_size() {
        let timeline: Vec<f64> = OrganizationSize::all()
            .iter()
            .map(|s| s.timeline_multiplier())
            .collect();
        assert_eq!(timeline, vec![1.5, 1.3, 1.0, 0.8]);

        let impact: Vec<f64> = OrganizationSize::all()
            .iter()
            .map(|s| s.impact_multiplier())
            .collect();
        assert_eq!(impact, vec![1.3, 1.2, 1.0, 0.8]);
    }

    #[test]
    fn impact_level_thresholds() {
        assert_eq!(ImpactLevel::from_score(10.0), ImpactLevel::Critical);
        assert_eq!(ImpactLevel::from_score(8.5), ImpactLevel::Critical);
        assert_eq!(ImpactLevel::from_score(8.49), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_score(7.0), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_score(5.0), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_score(3.0), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_score(2.99), ImpactLevel::Minimal);
        assert_eq!(ImpactLevel::from_score(1.0), ImpactLevel::Minimal);
    }

    #[test]
    fn circular_multipliers() {
        assert_eq!(ImpactLevel::Critical.circular_multiplier(), 1.5);
        assert_eq!(ImpactLevel::High.circular_multiplier(), 1.3);
        assert_eq!(ImpactLevel::Medium.circular_multiplier(), 1.1);
        assert_eq!(ImpactLevel::Low.circular_multiplier(), 0.9);
        assert_eq!(ImpactLevel::Minimal.circular_multiplier(), 1.0);
    }

    #[test]
    fn category_labels_fold() {
        assert_eq!(
            RegulatoryCategory::from_label("Capital Adequacy"),
            RegulatoryCategory::CapitalAdequacy
        );
        assert_eq!(
            RegulatoryCategory::from_label("KYC/AML Guidelines"),
            RegulatoryCategory::KycAml
        );
        assert_eq!(
            RegulatoryCategory::from_label("risk management"),
            RegulatoryCategory::RiskManagement
        );
        assert_eq!(
            RegulatoryCategory::from_label("Master Direction on Something Else"),
            RegulatoryCategory::General
        );
        assert_eq!(RegulatoryCategory::from_label(""), RegulatoryCategory::General);
    }

    #[test]
    fn capital_adequacy_adjustment() {
        let adj = RegulatoryCategory::CapitalAdequacy.factor_adjustment();
        assert_eq!(adj.financial, 2.0);
        assert_eq!(adj.regulatory, 3.0);
        assert_eq!(adj.operational, 0.0);
        assert_eq!(RegulatoryCategory::General.factor_adjustment(), FactorAdjustment::default());
    }

    #[test]
    fn serde_names_are_snake_case() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"critical\"");
        assert_eq!(
            serde_json::to_string(&OrganizationSize::VeryLarge).unwrap(),
            "\"very_large\""
        );
        let level: ImpactLevel = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(level, ImpactLevel::Minimal);
    }

    #[test]
    fn critical_path_priorities() {
        assert!(Priority::Critical.is_critical_path());
        assert!(Priority::High.is_critical_path());
        assert!(!Priority::Medium.is_critical_path());
        assert!(!Priority::Low.is_critical_path());
    }
}
