//! # Organization Profile
//!
//! Static snapshot of a regulated organization, supplied per request and
//! never persisted by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::heuristics::{OrganizationSize, Priority};

/// Licence class of a regulated organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    /// Scheduled commercial bank.
    CommercialBank,
    /// Urban or state co-operative bank.
    CooperativeBank,
    /// Small finance bank.
    SmallFinanceBank,
    /// Payments bank.
    PaymentsBank,
    /// Non-banking financial company.
    Nbfc,
    /// Insurer.
    InsuranceCompany,
    /// Anything else.
    Other,
}

/// Appetite for regulatory and operational risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAppetite {
    /// Minimises risk.
    Conservative,
    /// Balanced.
    #[default]
    Moderate,
    /// Accepts elevated risk.
    Aggressive,
}

/// A past regulatory violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastViolation {
    /// When the violation was recorded.
    pub date: DateTime<Utc>,
    /// What happened.
    pub description: String,
    /// How serious it was.
    pub severity: Priority,
    /// Monetary penalty imposed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
}

/// Snapshot of an organization's size and regulatory posture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Size class.
    pub size: OrganizationSize,
    /// Self-assessed compliance maturity, 1–10.
    pub compliance_maturity: u8,
    /// Self-assessed technology maturity, 1–10.
    pub technology_maturity: u8,
    /// Risk appetite.
    #[serde(default)]
    pub risk_appetite: RiskAppetite,
    /// Total assets, in crore.
    #[serde(default)]
    pub asset_size: f64,
    /// Headcount of the compliance team.
    #[serde(default)]
    pub team_size: u32,
    /// Recorded violations, most recent last.
    #[serde(default)]
    pub violation_history: Vec<PastViolation>,
}

impl OrganizationProfile {
    /// Validate the maturity scores and asset size.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if either maturity is outside 1–10 or the asset size is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range(
            "compliance_maturity",
            f64::from(self.compliance_maturity),
            1.0,
            10.0,
        )?;
        ValidationError::check_range(
            "technology_maturity",
            f64::from(self.technology_maturity),
            1.0,
            10.0,
        )?;
        ValidationError::check_range("asset_size", self.asset_size, 0.0, f64::MAX)?;
        Ok(())
    }

    /// `(10 − compliance_maturity) / 10`, the compliance capability gap.
    pub fn compliance_gap_ratio(&self) -> f64 {
        (10.0 - f64::from(self.compliance_maturity)) / 10.0
    }

    /// `(10 − technology_maturity) / 10`, the technology capability gap.
    pub fn technology_gap_ratio(&self) -> f64 {
        (10.0 - f64::from(self.technology_maturity)) / 10.0
    }
}
