//! Per-organization options for timeline generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use regintel_core::{OrganizationSize, OrganizationType, Priority, ValidationError};

use crate::event::EventType;

/// A caller-supplied event injected verbatim into the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDeadline {
    /// Event type to give the injected event.
    pub event_type: EventType,
    /// What is due. Used as the event title.
    pub description: String,
    /// When it is due.
    pub date: DateTime<Utc>,
    /// How urgent it is.
    #[serde(default)]
    pub priority: Priority,
}

/// Options tailoring a timeline to one organization.
///
/// The whole struct participates in the cache key, so two requests that
/// differ in any field produce distinct mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineGenerationOptions {
    /// Licence class of the organization.
    pub organization_type: OrganizationType,
    /// Size class; scales every computed offset.
    pub organization_size: OrganizationSize,
    /// Compliance maturity, 1–10. Lower maturity stretches offsets.
    pub compliance_maturity: u8,
    /// Push upcoming events later by `buffer_percentage`.
    #[serde(default)]
    pub include_buffer_time: bool,
    /// Percentage of the remaining time added as buffer, 0–100.
    #[serde(default)]
    pub buffer_percentage: f64,
    /// Attach schedule risk factors.
    #[serde(default)]
    pub include_risk_assessment: bool,
    /// Extra events to inject.
    #[serde(default)]
    pub custom_deadlines: Vec<CustomDeadline>,
}

impl TimelineGenerationOptions {
    /// Options with no buffer, no risk assessment and no custom deadlines.
    pub fn new(
        organization_type: OrganizationType,
        organization_size: OrganizationSize,
        compliance_maturity: u8,
    ) -> Self {
        Self {
            organization_type,
            organization_size,
            compliance_maturity,
            include_buffer_time: false,
            buffer_percentage: 0.0,
            include_risk_assessment: false,
            custom_deadlines: Vec::new(),
        }
    }

    /// Enable buffering at `percentage`.
    pub fn with_buffer(mut self, percentage: f64) -> Self {
        self.include_buffer_time = true;
        self.buffer_percentage = percentage;
        self
    }

    /// Enable risk assessment.
    pub fn with_risk_assessment(mut self) -> Self {
        self.include_risk_assessment = true;
        self
    }

    /// Add a custom deadline.
    pub fn with_custom_deadline(mut self, deadline: CustomDeadline) -> Self {
        self.custom_deadlines.push(deadline);
        self
    }

    /// Check maturity, buffer percentage and custom deadlines.
    ///
    /// The buffer percentage is checked even when buffering is disabled,
    /// since it is part of the cache key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range(
            "compliance_maturity",
            f64::from(self.compliance_maturity),
            1.0,
            10.0,
        )?;
        if !(self.buffer_percentage.is_finite()
            && (0.0..=100.0).contains(&self.buffer_percentage))
        {
            return Err(ValidationError::InvalidPercentage {
                field: "buffer_percentage",
                value: self.buffer_percentage,
            });
        }
        for deadline in &self.custom_deadlines {
            if deadline.description.trim().is_empty() {
                return Err(ValidationError::MissingField(
                    "custom_deadlines.description",
                ));
            }
        }
        Ok(())
    }
}
