//! # Timeline Events and Mappings
//!
//! The data model produced by the timeline generator. A [`TimelineMapping`]
//! is the aggregate root: it owns its events, keeps them sorted ascending by
//! date, and is only ever mutated through an explicit status update.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use regintel_core::Priority;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// What a timeline event marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The circular was published.
    CircularPublished,
    /// The circular takes effect.
    EffectiveDate,
    /// A requirement must be implemented.
    ImplementationDeadline,
    /// The organization must be compliant.
    ComplianceDeadline,
    /// A report or return is due.
    ReportingDeadline,
    /// An internal implementation milestone.
    Milestone,
    /// A scheduled review of the implementation.
    ReviewDate,
}

impl EventType {
    /// Whether the event is an externally imposed date the organization can
    /// miss. These feed deadline-approaching alerts.
    pub fn is_deadline(self) -> bool {
        matches!(
            self,
            Self::EffectiveDate
                | Self::ImplementationDeadline
                | Self::ComplianceDeadline
                | Self::ReportingDeadline
        )
    }

    /// Fixed deliverables expected when an event of this type is reached.
    pub fn deliverables(self) -> Vec<String> {
        let items: &[&str] = match self {
            Self::CircularPublished => &["Circular circulated to stakeholders"],
            Self::EffectiveDate => &[
                "Go-live readiness confirmation",
                "Board or committee sign-off",
            ],
            Self::ImplementationDeadline => &[
                "Updated policies and procedures",
                "System changes deployed",
                "Staff training completed",
            ],
            Self::ComplianceDeadline => &[
                "Compliance certificate",
                "Supporting evidence pack",
            ],
            Self::ReportingDeadline => &[
                "Regulatory return submitted",
                "Data validation sign-off",
            ],
            Self::Milestone => &["Milestone sign-off", "Progress report"],
            Self::ReviewDate => &["Review findings", "Remediation plan"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CircularPublished => "circular_published",
            Self::EffectiveDate => "effective_date",
            Self::ImplementationDeadline => "implementation_deadline",
            Self::ComplianceDeadline => "compliance_deadline",
            Self::ReportingDeadline => "reporting_deadline",
            Self::Milestone => "milestone",
            Self::ReviewDate => "review_date",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Date has not been reached.
    Upcoming,
    /// Work towards the event is under way.
    InProgress,
    /// Done.
    Completed,
    /// Date passed without completion.
    Overdue,
    /// No longer applicable.
    Cancelled,
    /// Moved to a later date.
    Postponed,
}

impl EventStatus {
    /// Whether the event still awaits its date.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Upcoming | Self::InProgress)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Upcoming => "upcoming",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
            Self::Postponed => "postponed",
        };
        f.write_str(s)
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Stated in the circular.
    Circular,
    /// Derived by the generator's heuristics.
    Calculated,
    /// Supplied by the caller as a custom deadline.
    Manual,
}

// ---------------------------------------------------------------------------
// TimelineEvent
// ---------------------------------------------------------------------------

/// A single dated event on an implementation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Identifier, unique within the mapping.
    pub id: String,
    /// What the event marks.
    pub event_type: EventType,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// When the event falls.
    pub date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Priority.
    pub priority: Priority,
    /// Category label.
    pub category: String,
    /// Origin of the event.
    pub source: EventSource,
    /// Ids of events that must happen first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Entity classes affected.
    #[serde(default)]
    pub affected_entities: Vec<String>,
    /// Completion percentage, once someone reports progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// A key milestone extracted from the event list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Id of the underlying event.
    pub id: String,
    /// Title of the underlying event.
    pub title: String,
    /// Date of the underlying event.
    pub date: DateTime<Utc>,
    /// Description of the underlying event.
    pub description: String,
    /// Deliverables expected at this milestone.
    pub deliverables: Vec<String>,
    /// Dependencies of the underlying event.
    pub dependencies: Vec<String>,
    /// Status of the underlying event.
    pub status: EventStatus,
    /// 100 once completed, otherwise 0.
    pub progress: u8,
}

/// Kind of schedule risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Too much high-priority work in the same window.
    Schedule,
    /// Not enough people for the volume of work.
    Resource,
}

/// A heuristic risk to the timeline.
///
/// `risk_score` is `probability × impact` and is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Stable identifier of the rule that raised the risk.
    pub id: String,
    /// Kind of risk.
    pub category: RiskCategory,
    /// What the risk is.
    pub description: String,
    /// Likelihood, 0–1.
    pub probability: f64,
    /// Severity, 0–1.
    pub impact: f64,
    /// `probability × impact`.
    pub risk_score: f64,
    /// Suggested mitigations.
    pub mitigation: Vec<String>,
    /// Events the risk bears on.
    pub affected_events: Vec<String>,
}

impl RiskFactor {
    pub(crate) fn new(
        id: &str,
        category: RiskCategory,
        description: String,
        probability: f64,
        impact: f64,
        mitigation: &[&str],
        affected_events: Vec<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            category,
            description,
            probability,
            impact,
            risk_score: probability * impact,
            mitigation: mitigation.iter().map(|s| s.to_string()).collect(),
            affected_events,
        }
    }
}

/// Kind of timeline recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Begin critical work before the computed dates.
    EarlyStart,
    /// Strengthen the compliance function.
    CapacityBuilding,
}

/// A recommendation attached to a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecommendation {
    /// Kind of recommendation.
    pub kind: RecommendationKind,
    /// Short title.
    pub title: String,
    /// What to do.
    pub description: String,
    /// Priority.
    pub priority: Priority,
    /// Events the recommendation concerns.
    pub related_events: Vec<String>,
}

// ---------------------------------------------------------------------------
// TimelineMapping
// ---------------------------------------------------------------------------

/// A generated implementation timeline for one circular and organization.
///
/// Invariant: `timeline` is sorted ascending by `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineMapping {
    /// Unique identifier.
    pub id: String,
    /// The circular the timeline implements.
    pub circular_id: String,
    /// The organization the timeline was tailored to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Events, ascending by date.
    pub timeline: Vec<TimelineEvent>,
    /// Ids of high and critical priority events, in date order.
    pub critical_path: Vec<String>,
    /// Span from first to last event, e.g. `"3 months"`.
    pub total_duration: String,
    /// Key milestones.
    pub key_milestones: Vec<Milestone>,
    /// Schedule risks. Empty unless risk assessment was requested.
    pub risk_factors: Vec<RiskFactor>,
    /// Recommendations.
    pub recommendations: Vec<TimelineRecommendation>,
    /// When the mapping was generated.
    pub created_at: DateTime<Utc>,
    /// Last status update.
    pub updated_at: DateTime<Utc>,
    /// After this instant the mapping should be regenerated. Not enforced
    /// by the cache.
    pub valid_until: DateTime<Utc>,
}

impl TimelineMapping {
    /// Look up an event by id.
    pub fn event(&self, event_id: &str) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|e| e.id == event_id)
    }

    /// Whether `now` is past `valid_until`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Open events whose date has passed as of `now`.
    ///
    /// Stored statuses are fixed at generation time; this derives staleness
    /// on read without mutating the mapping.
    pub fn overdue_events_at(&self, now: DateTime<Utc>) -> Vec<&TimelineEvent> {
        self.timeline
            .iter()
            .filter(|e| e.status.is_open() && e.date <= now)
            .collect()
    }

    /// Whether `timeline` is sorted ascending by date.
    pub fn is_sorted(&self) -> bool {
        self.timeline.windows(2).all(|w| w[0].date <= w[1].date)
    }
}
