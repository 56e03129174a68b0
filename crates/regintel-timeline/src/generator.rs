//! # Timeline Generation
//!
//! Turns a [`ParsedCircular`] and [`TimelineGenerationOptions`] into a
//! [`TimelineMapping`]. Everything here is a pure function of its inputs
//! and the `now` the caller passes in; caching and the clock live in
//! [`crate::service`].
//!
//! ## Pipeline
//!
//! 1. Seed events: publication (always completed) and effective date.
//! 2. One implementation deadline per requirement, offset from publication
//!    by `base_days(priority) × size_multiplier × (1 + (10 − maturity)/10)`.
//! 3. One event per deadline stated in the circular.
//! 4. Three chained implementation phases.
//! 5. Custom deadlines, verbatim.
//! 6. Optional buffer on upcoming events.
//! 7. Stable sort by date.
//!
//! The derived views (critical path, duration, milestones, risks,
//! recommendations) are computed from the sorted list.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use regintel_core::{
    format_duration_days, DeadlineType, OrganizationSize, ParsedCircular, Priority,
    ValidationError,
};

use crate::event::{
    EventSource, EventStatus, EventType, Milestone, RecommendationKind, RiskCategory,
    RiskFactor, TimelineEvent, TimelineMapping, TimelineRecommendation,
};
use crate::options::TimelineGenerationOptions;

/// Days from publication to the end of the planning phase.
pub const PLANNING_PHASE_DAYS: i64 = 7;

/// Shortest permitted system and process update phase.
pub const MIN_SYSTEM_UPDATE_DAYS: i64 = 7;

/// More high or critical events than this raises a schedule risk.
const SCHEDULE_RISK_THRESHOLD: usize = 5;

/// A small organization with more events than this raises a resource risk.
const RESOURCE_RISK_THRESHOLD: usize = 10;

/// Maturity below this earns a capacity-building recommendation.
const CAPACITY_MATURITY_THRESHOLD: u8 = 6;

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

/// Days from publication until a requirement of `priority` should be
/// implemented.
pub fn implementation_offset_days(
    priority: Priority,
    size: OrganizationSize,
    compliance_maturity: u8,
) -> i64 {
    let gap = f64::from(10u8.saturating_sub(compliance_maturity)) / 10.0;
    (priority.base_implementation_days() * size.timeline_multiplier() * (1.0 + gap)).round() as i64
}

/// Length of the system and process update phase, at least
/// [`MIN_SYSTEM_UPDATE_DAYS`].
pub fn system_update_days(size: OrganizationSize, compliance_maturity: u8) -> i64 {
    let maturity = f64::from(compliance_maturity) / 10.0;
    let days = (21.0 * size.timeline_multiplier() * (1.5 - maturity)).round() as i64;
    days.max(MIN_SYSTEM_UPDATE_DAYS)
}

/// Length of the testing phase given the system update phase.
pub fn testing_days(system_update_days: i64) -> i64 {
    (0.3 * system_update_days as f64).round() as i64
}

fn status_at(date: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    if date > now {
        EventStatus::Upcoming
    } else {
        EventStatus::Overdue
    }
}

// ---------------------------------------------------------------------------
// Event construction
// ---------------------------------------------------------------------------

struct EventDraft {
    id: String,
    event_type: EventType,
    title: String,
    description: String,
    date: DateTime<Utc>,
    status: EventStatus,
    priority: Priority,
    category: String,
    source: EventSource,
    dependencies: Vec<String>,
    affected_entities: Vec<String>,
}

impl From<EventDraft> for TimelineEvent {
    fn from(d: EventDraft) -> Self {
        Self {
            id: d.id,
            event_type: d.event_type,
            title: d.title,
            description: d.description,
            date: d.date,
            status: d.status,
            priority: d.priority,
            category: d.category,
            source: d.source,
            dependencies: d.dependencies,
            affected_entities: d.affected_entities,
            progress: None,
        }
    }
}

/// Build the unsorted, unbuffered event list.
///
/// Fails with `DateOutOfRange` if a computed offset runs off the calendar.
pub fn build_events(
    circular_id: &str,
    circular: &ParsedCircular,
    options: &TimelineGenerationOptions,
    now: DateTime<Utc>,
) -> Result<Vec<TimelineEvent>, ValidationError> {
    let meta = &circular.metadata;
    let published = meta.published_date;
    let published_id = format!("{circular_id}-published");
    let mut events: Vec<TimelineEvent> = Vec::new();

    events.push(
        EventDraft {
            id: published_id.clone(),
            event_type: EventType::CircularPublished,
            title: format!("Circular {} published", meta.number),
            description: meta.title.clone(),
            date: published,
            status: EventStatus::Completed,
            priority: Priority::Medium,
            category: meta.category.clone(),
            source: EventSource::Circular,
            dependencies: Vec::new(),
            affected_entities: meta.affected_entities.clone(),
        }
        .into(),
    );

    if let Some(effective) = meta.effective_date {
        events.push(
            EventDraft {
                id: format!("{circular_id}-effective"),
                event_type: EventType::EffectiveDate,
                title: format!("Circular {} takes effect", meta.number),
                description: format!("Provisions of \"{}\" become enforceable", meta.title),
                date: effective,
                status: if effective > now {
                    EventStatus::Upcoming
                } else {
                    EventStatus::Completed
                },
                priority: Priority::High,
                category: meta.category.clone(),
                source: EventSource::Circular,
                dependencies: vec![published_id.clone()],
                affected_entities: meta.affected_entities.clone(),
            }
            .into(),
        );
    }

    for (n, req) in circular.content.requirements.iter().enumerate() {
        let offset = implementation_offset_days(
            req.priority,
            options.organization_size,
            options.compliance_maturity,
        );
        let date = ValidationError::offset_days("implementation_deadline", published, offset)?;
        let category = if req.category.trim().is_empty() {
            meta.category.clone()
        } else {
            req.category.clone()
        };
        events.push(
            EventDraft {
                id: format!("{circular_id}-req-{}", n + 1),
                event_type: EventType::ImplementationDeadline,
                title: if req.id.trim().is_empty() {
                    format!("Implement requirement {}", n + 1)
                } else {
                    format!("Implement requirement {}", req.id)
                },
                description: req.description.clone(),
                date,
                status: status_at(date, now),
                priority: req.priority,
                category,
                source: EventSource::Calculated,
                dependencies: vec![published_id.clone()],
                affected_entities: req.affected_entities.clone(),
            }
            .into(),
        );
    }

    for (n, deadline) in circular.content.deadlines.iter().enumerate() {
        let event_type = match deadline.deadline_type {
            DeadlineType::Reporting => EventType::ReportingDeadline,
            _ => EventType::ComplianceDeadline,
        };
        events.push(
            EventDraft {
                id: format!("{circular_id}-deadline-{}", n + 1),
                event_type,
                title: deadline.description.clone(),
                description: deadline.description.clone(),
                date: deadline.date,
                status: status_at(deadline.date, now),
                priority: deadline.priority,
                category: meta.category.clone(),
                source: EventSource::Circular,
                dependencies: vec![published_id.clone()],
                affected_entities: meta.affected_entities.clone(),
            }
            .into(),
        );
    }

    events.extend(phase_events(circular_id, circular, options, now, &published_id)?);

    for (n, custom) in options.custom_deadlines.iter().enumerate() {
        events.push(
            EventDraft {
                id: format!("{circular_id}-custom-{}", n + 1),
                event_type: custom.event_type,
                title: custom.description.clone(),
                description: custom.description.clone(),
                date: custom.date,
                status: status_at(custom.date, now),
                priority: custom.priority,
                category: "custom".to_string(),
                source: EventSource::Manual,
                dependencies: Vec::new(),
                affected_entities: Vec::new(),
            }
            .into(),
        );
    }

    Ok(events)
}

fn phase_events(
    circular_id: &str,
    circular: &ParsedCircular,
    options: &TimelineGenerationOptions,
    now: DateTime<Utc>,
    published_id: &str,
) -> Result<[TimelineEvent; 3], ValidationError> {
    let system_days = system_update_days(options.organization_size, options.compliance_maturity);
    let planning_date = ValidationError::offset_days(
        "phase_date",
        circular.metadata.published_date,
        PLANNING_PHASE_DAYS,
    )?;
    let system_date = ValidationError::offset_days("phase_date", planning_date, system_days)?;
    let testing_date =
        ValidationError::offset_days("phase_date", system_date, testing_days(system_days))?;

    let planning_id = format!("{circular_id}-phase-planning");
    let system_id = format!("{circular_id}-phase-system-update");
    let testing_id = format!("{circular_id}-phase-testing");
    let entities = &circular.metadata.affected_entities;

    let phase = |id: &str,
                 title: &str,
                 description: &str,
                 date: DateTime<Utc>,
                 priority: Priority,
                 dep: &str| {
        TimelineEvent::from(EventDraft {
            id: id.to_string(),
            event_type: EventType::Milestone,
            title: title.to_string(),
            description: description.to_string(),
            date,
            status: status_at(date, now),
            priority,
            category: "implementation".to_string(),
            source: EventSource::Calculated,
            dependencies: vec![dep.to_string()],
            affected_entities: entities.clone(),
        })
    };

    Ok([
        phase(
            &planning_id,
            "Planning and gap analysis",
            "Assess current state against the circular and plan the changes",
            planning_date,
            Priority::High,
            published_id,
        ),
        phase(
            &system_id,
            "System and process update",
            "Implement system, policy and process changes",
            system_date,
            Priority::High,
            &planning_id,
        ),
        phase(
            &testing_id,
            "Testing and validation",
            "Validate the changes and confirm readiness",
            testing_date,
            Priority::Medium,
            &system_id,
        ),
    ])
}

/// Push every upcoming event later by `percentage` of the time remaining
/// until it. Events in any other status keep their date.
///
/// Fails with `DateOutOfRange`, leaving earlier events already shifted, if a
/// buffered date cannot be represented.
pub fn apply_buffer(
    events: &mut [TimelineEvent],
    percentage: f64,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    for event in events
        .iter_mut()
        .filter(|e| e.status == EventStatus::Upcoming)
    {
        let remaining = (event.date - now).num_seconds();
        if remaining <= 0 {
            continue;
        }
        let extra = (remaining as f64 * percentage / 100.0).round() as i64;
        event.date = ValidationError::offset_seconds("buffered_date", event.date, extra)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Ids of high and critical priority events, in the order given.
pub fn critical_path(events: &[TimelineEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.priority.is_critical_path())
        .map(|e| e.id.clone())
        .collect()
}

/// Span from the first to the last event of a sorted list.
pub fn total_duration(events: &[TimelineEvent]) -> String {
    match (events.first(), events.last()) {
        (Some(first), Some(last)) => format_duration_days((last.date - first.date).num_days()),
        _ => format_duration_days(0),
    }
}

/// Milestone-type and critical events as milestone records.
pub fn key_milestones(events: &[TimelineEvent]) -> Vec<Milestone> {
    events
        .iter()
        .filter(|e| e.event_type == EventType::Milestone || e.priority == Priority::Critical)
        .map(|e| Milestone {
            id: e.id.clone(),
            title: e.title.clone(),
            date: e.date,
            description: e.description.clone(),
            deliverables: e.event_type.deliverables(),
            dependencies: e.dependencies.clone(),
            status: e.status,
            progress: if e.status == EventStatus::Completed { 100 } else { 0 },
        })
        .collect()
}

/// Heuristic schedule and resource risks.
pub fn risk_factors(
    events: &[TimelineEvent],
    options: &TimelineGenerationOptions,
) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    let pressing = critical_path(events);
    if pressing.len() > SCHEDULE_RISK_THRESHOLD {
        risks.push(RiskFactor::new(
            "schedule-compression",
            RiskCategory::Schedule,
            format!(
                "{} high or critical priority events compete for the same implementation window",
                pressing.len()
            ),
            0.7,
            0.8,
            &[
                "Sequence high priority work and agree the order with the business",
                "Secure additional delivery capacity for the peak period",
                "Escalate slippage to the compliance committee early",
            ],
            pressing,
        ));
    }

    if options.organization_size == OrganizationSize::Small
        && events.len() > RESOURCE_RISK_THRESHOLD
    {
        risks.push(RiskFactor::new(
            "resource-constraint",
            RiskCategory::Resource,
            format!(
                "{} timeline events for a small organization may exceed available staff",
                events.len()
            ),
            0.6,
            0.7,
            &[
                "Engage external consultants for specialised work",
                "Cross-train staff across compliance and operations",
            ],
            events.iter().map(|e| e.id.clone()).collect(),
        ));
    }

    risks
}

/// Early-start and capacity-building recommendations.
pub fn recommendations(
    events: &[TimelineEvent],
    options: &TimelineGenerationOptions,
) -> Vec<TimelineRecommendation> {
    let mut recs = Vec::new();

    let critical: Vec<String> = events
        .iter()
        .filter(|e| e.priority == Priority::Critical)
        .map(|e| e.id.clone())
        .collect();
    if !critical.is_empty() {
        recs.push(TimelineRecommendation {
            kind: RecommendationKind::EarlyStart,
            title: "Start critical items immediately".to_string(),
            description: format!(
                "{} critical event(s) leave little slack; begin implementation ahead of the computed dates",
                critical.len()
            ),
            priority: Priority::High,
            related_events: critical,
        });
    }

    if options.compliance_maturity < CAPACITY_MATURITY_THRESHOLD {
        recs.push(TimelineRecommendation {
            kind: RecommendationKind::CapacityBuilding,
            title: "Enhance compliance capacity".to_string(),
            description: format!(
                "Compliance maturity of {} lengthens every phase; invest in process and tooling before the next circular",
                options.compliance_maturity
            ),
            priority: Priority::Medium,
            related_events: Vec::new(),
        });
    }

    recs
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Run the full pipeline and assemble a fresh mapping with a new id.
///
/// Inputs are assumed valid; [`crate::service::TimelineService`] validates
/// before calling. Dates that would leave the calendar still surface as
/// `DateOutOfRange`.
pub fn generate_mapping(
    circular_id: &str,
    circular: &ParsedCircular,
    options: &TimelineGenerationOptions,
    organization_id: Option<&str>,
    validity_days: i64,
    now: DateTime<Utc>,
) -> Result<TimelineMapping, ValidationError> {
    let mut timeline = build_events(circular_id, circular, options, now)?;
    if options.include_buffer_time {
        apply_buffer(&mut timeline, options.buffer_percentage, now)?;
    }
    timeline.sort_by_key(|e| e.date);

    let risk_factors = if options.include_risk_assessment {
        risk_factors(&timeline, options)
    } else {
        Vec::new()
    };

    let valid_until = ValidationError::offset_days("valid_until", now, validity_days)?;

    Ok(TimelineMapping {
        id: Uuid::new_v4().to_string(),
        circular_id: circular_id.to_string(),
        organization_id: organization_id.map(str::to_string),
        critical_path: critical_path(&timeline),
        total_duration: total_duration(&timeline),
        key_milestones: key_milestones(&timeline),
        risk_factors,
        recommendations: recommendations(&timeline, options),
        created_at: now,
        updated_at: now,
        valid_until,
        timeline,
    })
}
