//! Impact assessment requests.

use serde::{Deserialize, Serialize};

use regintel_core::{OrganizationProfile, OrganizationType, ParsedCircular, ValidationError};

/// Depth of analysis requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Headline score only.
    Basic,
    /// Score with areas and gap.
    #[default]
    Detailed,
    /// Everything; raises confidence.
    Comprehensive,
}

/// A request to assess one circular's impact on one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessmentRequest {
    /// Circular to assess.
    pub circular_id: String,
    /// Organization to assess.
    pub organization_id: String,
    /// Licence class of the organization.
    pub organization_type: OrganizationType,
    /// Size and posture of the organization.
    pub organization_profile: OrganizationProfile,
    /// Depth of analysis.
    #[serde(default)]
    pub analysis_type: AnalysisType,
    /// Attach recommendations.
    #[serde(default)]
    pub include_recommendations: bool,
    /// Attach the implementation plan.
    #[serde(default)]
    pub include_timeline: bool,
    /// Attach a cost estimate.
    #[serde(default)]
    pub include_cost_estimate: bool,
}

impl ImpactAssessmentRequest {
    /// Check ids and profile ranges, and that `circular`, when given, is
    /// valid and describes the requested circular.
    pub fn validate(&self, circular: Option<&ParsedCircular>) -> Result<(), ValidationError> {
        ValidationError::check_present("circular_id", &self.circular_id)?;
        ValidationError::check_present("organization_id", &self.organization_id)?;
        self.organization_profile.validate()?;
        if let Some(circular) = circular {
            circular.validate()?;
            if circular.circular_id != self.circular_id {
                return Err(ValidationError::CircularMismatch {
                    expected: self.circular_id.clone(),
                    actual: circular.circular_id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regintel_core::{OrganizationSize, RiskAppetite};

    fn request() -> ImpactAssessmentRequest {
        ImpactAssessmentRequest {
            circular_id: "C1".into(),
            organization_id: "org-1".into(),
            organization_type: OrganizationType::CommercialBank,
            organization_profile: OrganizationProfile {
                size: OrganizationSize::Large,
                compliance_maturity: 7,
                technology_maturity: 6,
                risk_appetite: RiskAppetite::Moderate,
                asset_size: 50_000.0,
                team_size: 40,
                violation_history: Vec::new(),
            },
            analysis_type: AnalysisType::Detailed,
            include_recommendations: true,
            include_timeline: true,
            include_cost_estimate: true,
        }
    }

    #[test]
    fn valid_request() {
        assert!(request().validate(None).is_ok());
    }

    #[test]
    fn blank_ids_rejected() {
        let mut r = request();
        r.circular_id = " ".into();
        assert_eq!(
            r.validate(None).unwrap_err(),
            ValidationError::MissingField("circular_id")
        );

        let mut r = request();
        r.organization_id = String::new();
        assert_eq!(
            r.validate(None).unwrap_err(),
            ValidationError::MissingField("organization_id")
        );
    }

    #[test]
    fn profile_ranges_enforced() {
        let mut r = request();
        r.organization_profile.technology_maturity = 0;
        assert!(matches!(
            r.validate(None).unwrap_err(),
            ValidationError::OutOfRange {
                field: "technology_maturity",
                ..
            }
        ));
    }

    #[test]
    fn flags_default_off() {
        let json = serde_json::json!({
            "circular_id": "C1",
            "organization_id": "org-1",
            "organization_type": "nbfc",
            "organization_profile": {
                "size": "small",
                "compliance_maturity": 4,
                "technology_maturity": 3
            }
        });
        let r: ImpactAssessmentRequest = serde_json::from_value(json).unwrap();
        assert_eq!(r.analysis_type, AnalysisType::Detailed);
        assert!(!r.include_recommendations);
        assert!(!r.include_timeline);
        assert!(!r.include_cost_estimate);
    }
}
