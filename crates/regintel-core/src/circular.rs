//! # Parsed Circular
//!
//! The input contract produced by the upstream circular parser and consumed
//! by both the timeline and impact engines. A `ParsedCircular` is immutable
//! once produced; the engines only read it.
//!
//! Optional fields are genuinely optional: a missing `effective_date` means
//! "no effective-date event", not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::heuristics::{ImpactLevel, Priority, RegulatoryCategory};

/// A regulator circular after parsing and extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCircular {
    /// Identifier of the circular.
    pub circular_id: String,
    /// Publication metadata.
    pub metadata: CircularMetadata,
    /// Extracted content.
    pub content: CircularContent,
    /// Text analysis results.
    #[serde(default)]
    pub analysis: CircularAnalysis,
    /// Parser confidence in the extraction, 0–1.
    pub confidence: f64,
    /// Time the parser spent on this circular, in milliseconds.
    #[serde(default)]
    pub processing_time_ms: u64,
}

/// Publication metadata of a circular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularMetadata {
    /// Regulator reference number, e.g. `RBI/2024-25/12`.
    pub number: String,
    /// Circular title.
    pub title: String,
    /// Date the circular was published.
    pub published_date: DateTime<Utc>,
    /// Date the circular takes effect, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
    /// Free-text category label assigned by the parser.
    pub category: String,
    /// Severity assigned by the parser.
    pub impact_level: ImpactLevel,
    /// Entity classes the circular applies to.
    #[serde(default)]
    pub affected_entities: Vec<String>,
}

/// Content extracted from the circular body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircularContent {
    /// Short summary.
    #[serde(default)]
    pub summary: String,
    /// Key points, in document order.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Compliance requirements imposed by the circular.
    #[serde(default)]
    pub requirements: Vec<ComplianceRequirement>,
    /// Dated deadlines stated in the circular.
    #[serde(default)]
    pub deadlines: Vec<ExtractedDeadline>,
    /// Other circulars or acts referenced.
    #[serde(default)]
    pub references: Vec<String>,
    /// Defined terms.
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Document sections.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A single compliance requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRequirement {
    /// Requirement identifier, unique within the circular.
    pub id: String,
    /// What must be done.
    pub description: String,
    /// How urgent it is.
    #[serde(default)]
    pub priority: Priority,
    /// Category label, free text.
    #[serde(default)]
    pub category: String,
    /// Explicit deadline for this requirement, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Entity classes this requirement applies to.
    #[serde(default)]
    pub affected_entities: Vec<String>,
}

/// The kind of a deadline stated in a circular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    /// Must be compliant by this date.
    Compliance,
    /// A return or report is due.
    Reporting,
    /// Implementation must be complete.
    Implementation,
    /// Unclassified.
    Other,
}

/// A deadline extracted from the circular text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDeadline {
    /// What is due.
    pub description: String,
    /// When it is due.
    pub date: DateTime<Utc>,
    /// Kind of deadline.
    pub deadline_type: DeadlineType,
    /// How urgent it is.
    #[serde(default)]
    pub priority: Priority,
}

/// A defined term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The term.
    pub term: String,
    /// Its definition.
    pub definition: String,
}

/// A document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Section body.
    #[serde(default)]
    pub content: String,
}

/// Overall tone of the circular.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Relaxation or clarification.
    Positive,
    /// Informational.
    #[default]
    Neutral,
    /// Tightening or restriction.
    Negative,
}

/// How hard the circular is to interpret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Short and self-contained.
    Low,
    /// Typical circular.
    #[default]
    Medium,
    /// Long, cross-referencing, technical.
    High,
}

/// Text analysis of a circular.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircularAnalysis {
    /// Tone.
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Interpretive complexity.
    #[serde(default)]
    pub complexity: Complexity,
    /// Urgency.
    #[serde(default)]
    pub urgency: Priority,
    /// Topics detected.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Named entities detected.
    #[serde(default)]
    pub entities: Vec<String>,
    /// Keywords detected.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ParsedCircular {
    /// The circular's category folded onto the fixed category set.
    pub fn category(&self) -> RegulatoryCategory {
        RegulatoryCategory::from_label(&self.metadata.category)
    }

    /// Validate structural invariants the engines rely on.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the circular id is blank.
    /// - `OutOfRange` if confidence is outside 0–1.
    /// - `InvalidDateRange` if the effective date precedes publication.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_present("circular_id", &self.circular_id)?;
        ValidationError::check_range("confidence", self.confidence, 0.0, 1.0)?;
        if let Some(effective) = self.metadata.effective_date {
            if effective < self.metadata.published_date {
                return Err(ValidationError::InvalidDateRange {
                    start_field: "published_date",
                    start: self.metadata.published_date.to_rfc3339(),
                    end_field: "effective_date",
                    end: effective.to_rfc3339(),
                });
            }
        }
        Ok(())
    }
}
