//! # Timeline Service
//!
//! Memoizing front end to the generator. A mapping is stored in the
//! injected cache under a key derived from the request:
//!
//! ```text
//! {circular_id}_{organization_id | "default"}_{sha256(json(options))}
//! ```
//!
//! A repeat request with an equal key returns the stored mapping, with the
//! same `id` and `created_at`, without recomputing. A second index maps
//! mapping ids to cache keys so lookups by id never scan the cache.
//!
//! Concurrent identical requests may both compute; the later write wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use regintel_core::{
    cache_digest, Cache, EngineConfig, ParsedCircular, Priority, RegintelError, ValidationError,
};

use crate::event::{EventStatus, EventType, TimelineMapping};
use crate::generator::generate_mapping;
use crate::options::TimelineGenerationOptions;

/// Organization component of the cache key when no organization is given.
const DEFAULT_ORGANIZATION_KEY: &str = "default";

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Aggregate statistics over every cached mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineStats {
    /// Cached mappings.
    pub total_mappings: usize,
    /// Events across all mappings.
    pub total_events: usize,
    /// `total_events / total_mappings`, or 0.
    pub average_events_per_mapping: f64,
    /// Mean critical path length, or 0.
    pub average_critical_path_length: f64,
    /// Risk factors across all mappings.
    pub total_risk_factors: usize,
    /// Event counts by status.
    pub events_by_status: BTreeMap<EventStatus, usize>,
    /// Event counts by type.
    pub events_by_type: BTreeMap<EventType, usize>,
}

/// A deadline falling inside an alert window, for the notification
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineAlert {
    /// Mapping the event belongs to.
    pub timeline_id: String,
    /// Circular the mapping implements.
    pub circular_id: String,
    /// Organization the mapping was tailored to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// The event.
    pub event_id: String,
    /// Its type.
    pub event_type: EventType,
    /// Its title.
    pub title: String,
    /// When it falls.
    pub date: DateTime<Utc>,
    /// Its priority.
    pub priority: Priority,
    /// Whole days from the alert instant to the event.
    pub days_remaining: i64,
}

// ---------------------------------------------------------------------------
// TimelineService
// ---------------------------------------------------------------------------

/// Generates, caches and updates timeline mappings.
pub struct TimelineService {
    config: EngineConfig,
    cache: Arc<dyn Cache<TimelineMapping>>,
    /// Mapping id → cache key.
    index: RwLock<HashMap<String, String>>,
}

impl std::fmt::Debug for TimelineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineService")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Default for TimelineService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TimelineService {
    /// Create a service with a cache built from `config.cache`.
    pub fn new(config: EngineConfig) -> Self {
        let cache = config.cache.build();
        Self::with_cache(config, cache)
    }

    /// Create a service backed by the given cache.
    pub fn with_cache(config: EngineConfig, cache: Arc<dyn Cache<TimelineMapping>>) -> Self {
        Self {
            config,
            cache,
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Cache key for a request.
    pub fn cache_key(
        circular_id: &str,
        organization_id: Option<&str>,
        options: &TimelineGenerationOptions,
    ) -> Result<String, RegintelError> {
        let digest = cache_digest(options)?;
        Ok(format!(
            "{circular_id}_{}_{digest}",
            organization_id.unwrap_or(DEFAULT_ORGANIZATION_KEY)
        ))
    }

    /// Generate (or fetch from cache) the timeline for a circular.
    pub fn generate_timeline(
        &self,
        circular_id: &str,
        circular: &ParsedCircular,
        options: &TimelineGenerationOptions,
        organization_id: Option<&str>,
    ) -> Result<TimelineMapping, RegintelError> {
        self.generate_timeline_at(circular_id, circular, options, organization_id, Utc::now())
    }

    /// [`generate_timeline`](Self::generate_timeline) with an explicit clock.
    ///
    /// # Errors
    ///
    /// `Validation` if the circular id is blank, the circular or options are
    /// invalid, the organization id is an empty string, `circular_id`
    /// disagrees with the parsed circular, or a computed date falls outside
    /// the representable range.
    pub fn generate_timeline_at(
        &self,
        circular_id: &str,
        circular: &ParsedCircular,
        options: &TimelineGenerationOptions,
        organization_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TimelineMapping, RegintelError> {
        ValidationError::check_present("circular_id", circular_id)?;
        if let Some(org) = organization_id {
            ValidationError::check_present("organization_id", org)?;
        }
        circular.validate()?;
        if circular.circular_id != circular_id {
            return Err(ValidationError::CircularMismatch {
                expected: circular_id.to_string(),
                actual: circular.circular_id.clone(),
            }
            .into());
        }
        options.validate()?;

        let key = Self::cache_key(circular_id, organization_id, options)?;
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(circular_id, timeline_id = %cached.id, "timeline cache hit");
            return Ok(cached);
        }

        let mapping = generate_mapping(
            circular_id,
            circular,
            options,
            organization_id,
            self.config.timeline_validity_days,
            now,
        )?;
        tracing::info!(
            circular_id,
            timeline_id = %mapping.id,
            events = mapping.timeline.len(),
            critical_path = mapping.critical_path.len(),
            duration = %mapping.total_duration,
            "generated timeline"
        );

        self.cache.set(key.clone(), mapping.clone());
        let mut index = self.index.write();
        index.insert(mapping.id.clone(), key);
        if index.len() > self.cache.len() {
            // Entries evicted from a bounded cache or overwritten by a racing
            // write leave index entries behind.
            index.retain(|_, k| self.cache.contains_key(k));
        }
        Ok(mapping)
    }

    /// Update an event's status and optionally its progress.
    ///
    /// Progress is clamped to 100. Returns `false`, changing nothing, if
    /// either id is unknown.
    pub fn update_event_status(
        &self,
        timeline_id: &str,
        event_id: &str,
        status: EventStatus,
        progress: Option<u8>,
    ) -> bool {
        self.update_event_status_at(timeline_id, event_id, status, progress, Utc::now())
    }

    /// [`update_event_status`](Self::update_event_status) with an explicit
    /// clock for `updated_at`.
    pub fn update_event_status_at(
        &self,
        timeline_id: &str,
        event_id: &str,
        status: EventStatus,
        progress: Option<u8>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(key) = self.index.read().get(timeline_id).cloned() else {
            tracing::warn!(timeline_id, event_id, "status update for unknown timeline");
            return false;
        };

        let mut updated = false;
        self.cache.update(&key, &mut |mapping: &mut TimelineMapping| {
            if mapping.id != timeline_id {
                return;
            }
            if let Some(event) = mapping.timeline.iter_mut().find(|e| e.id == event_id) {
                event.status = status;
                if let Some(p) = progress {
                    event.progress = Some(p.min(100));
                }
                if let Some(milestone) = mapping.key_milestones.iter_mut().find(|m| m.id == event_id) {
                    milestone.status = status;
                    milestone.progress = if status == EventStatus::Completed { 100 } else { 0 };
                }
                mapping.updated_at = now;
                updated = true;
            }
        });

        if updated {
            tracing::info!(timeline_id, event_id, %status, "updated timeline event status");
        } else {
            tracing::warn!(timeline_id, event_id, "status update for unknown event");
        }
        updated
    }

    /// Look up a mapping by its id.
    pub fn get_timeline_mapping(&self, timeline_id: &str) -> Option<TimelineMapping> {
        let key = self.index.read().get(timeline_id).cloned()?;
        self.cache
            .get(&key)
            .filter(|mapping| mapping.id == timeline_id)
    }

    /// Aggregate statistics over the cache.
    pub fn get_timeline_stats(&self) -> TimelineStats {
        let mappings = self.cache.values();
        let mut stats = TimelineStats {
            total_mappings: mappings.len(),
            ..TimelineStats::default()
        };
        let mut critical_path_total = 0usize;

        for mapping in &mappings {
            stats.total_events += mapping.timeline.len();
            stats.total_risk_factors += mapping.risk_factors.len();
            critical_path_total += mapping.critical_path.len();
            for event in &mapping.timeline {
                *stats.events_by_status.entry(event.status).or_default() += 1;
                *stats.events_by_type.entry(event.event_type).or_default() += 1;
            }
        }

        if !mappings.is_empty() {
            let n = mappings.len() as f64;
            stats.average_events_per_mapping = stats.total_events as f64 / n;
            stats.average_critical_path_length = critical_path_total as f64 / n;
        }
        stats
    }

    /// Upcoming deadline-type events falling within `window_days` of `now`,
    /// across every cached mapping, soonest first.
    ///
    /// A window reaching past the end of the calendar covers everything after
    /// `now`.
    pub fn upcoming_deadlines_at(&self, now: DateTime<Utc>, window_days: i64) -> Vec<DeadlineAlert> {
        let horizon = ValidationError::offset_days("window_days", now, window_days.max(0))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut alerts: Vec<DeadlineAlert> = self
            .cache
            .values()
            .into_iter()
            .flat_map(|mapping| {
                mapping
                    .timeline
                    .iter()
                    .filter(|e| {
                        e.event_type.is_deadline()
                            && e.status == EventStatus::Upcoming
                            && e.date > now
                            && e.date <= horizon
                    })
                    .map(|e| DeadlineAlert {
                        timeline_id: mapping.id.clone(),
                        circular_id: mapping.circular_id.clone(),
                        organization_id: mapping.organization_id.clone(),
                        event_id: e.id.clone(),
                        event_type: e.event_type,
                        title: e.title.clone(),
                        date: e.date,
                        priority: e.priority,
                        days_remaining: (e.date - now).num_days(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        alerts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
        alerts
    }

    /// Drop every cached mapping and the id index.
    pub fn clear_cache(&self) {
        let mut index = self.index.write();
        self.cache.clear();
        index.clear();
        tracing::info!("cleared timeline cache");
    }

    /// Engine configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regintel_core::{
        CircularAnalysis, CircularContent, CircularMetadata, ComplianceRequirement, ImpactLevel,
        LruCache, OrganizationSize, OrganizationType,
    };

    use crate::options::CustomDeadline;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn circular(id: &str) -> ParsedCircular {
        ParsedCircular {
            circular_id: id.into(),
            metadata: CircularMetadata {
                number: "RBI/2024-25/07".into(),
                title: "Digital lending guidelines".into(),
                published_date: date(2024, 1, 15),
                effective_date: Some(date(2024, 4, 1)),
                category: "Digital Payments".into(),
                impact_level: ImpactLevel::Medium,
                affected_entities: vec!["nbfc".into()],
            },
            content: CircularContent {
                requirements: vec![ComplianceRequirement {
                    id: "R1".into(),
                    description: "Disclose annual percentage rate".into(),
                    priority: Priority::High,
                    category: String::new(),
                    deadline: None,
                    affected_entities: Vec::new(),
                }],
                ..CircularContent::default()
            },
            analysis: CircularAnalysis::default(),
            confidence: 0.85,
            processing_time_ms: 12,
        }
    }

    fn options() -> TimelineGenerationOptions {
        TimelineGenerationOptions::new(OrganizationType::Nbfc, OrganizationSize::Large, 7)
    }

    #[test]
    fn repeat_request_hits_cache() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let first = svc
            .generate_timeline_at("C1", &c, &options(), Some("org-1"), date(2024, 1, 1))
            .unwrap();
        let second = svc
            .generate_timeline_at("C1", &c.clone(), &options().clone(), Some("org-1"), date(2024, 3, 1))
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(svc.get_timeline_stats().total_mappings, 1);
    }

    #[test]
    fn organization_and_options_split_the_key() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let now = date(2024, 1, 1);
        let a = svc.generate_timeline_at("C1", &c, &options(), None, now).unwrap();
        let b = svc.generate_timeline_at("C1", &c, &options(), Some("org-2"), now).unwrap();
        let d = svc
            .generate_timeline_at("C1", &c, &options().with_buffer(10.0), None, now)
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, d.id);
        assert_eq!(svc.get_timeline_stats().total_mappings, 3);
    }

    #[test]
    fn cache_key_shape() {
        let key = TimelineService::cache_key("C1", None, &options()).unwrap();
        assert!(key.starts_with("C1_default_"));
        assert_eq!(key.len(), "C1_default_".len() + 64);
        let org = TimelineService::cache_key("C1", Some("org-9"), &options()).unwrap();
        assert!(org.starts_with("C1_org-9_"));
    }

    #[test]
    fn validation_fails_fast() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let now = date(2024, 1, 1);

        let err = svc.generate_timeline_at("", &c, &options(), None, now).unwrap_err();
        assert!(matches!(
            err,
            RegintelError::Validation(ValidationError::MissingField("circular_id"))
        ));

        let err = svc.generate_timeline_at("C1", &c, &options(), Some(""), now).unwrap_err();
        assert!(matches!(
            err,
            RegintelError::Validation(ValidationError::MissingField("organization_id"))
        ));

        let err = svc.generate_timeline_at("C2", &c, &options(), None, now).unwrap_err();
        assert!(matches!(
            err,
            RegintelError::Validation(ValidationError::CircularMismatch { .. })
        ));

        let mut bad = options();
        bad.compliance_maturity = 0;
        assert!(svc.generate_timeline_at("C1", &c, &bad, None, now).is_err());

        let mut inverted = circular("C1");
        inverted.metadata.effective_date = Some(date(2023, 12, 1));
        let err = svc.generate_timeline_at("C1", &inverted, &options(), None, now).unwrap_err();
        assert!(matches!(
            err,
            RegintelError::Validation(ValidationError::InvalidDateRange { .. })
        ));

        assert_eq!(svc.get_timeline_stats().total_mappings, 0);
    }

    #[test]
    fn update_event_status_in_place() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let m = svc
            .generate_timeline_at("C1", &c, &options(), None, date(2024, 1, 1))
            .unwrap();
        let later = date(2024, 2, 1);

        assert!(svc.update_event_status_at(
            &m.id,
            "C1-phase-planning",
            EventStatus::Completed,
            Some(150),
            later
        ));

        let stored = svc.get_timeline_mapping(&m.id).unwrap();
        let event = stored.event("C1-phase-planning").unwrap();
        assert_eq!(event.status, EventStatus::Completed);
        assert_eq!(event.progress, Some(100));
        assert_eq!(stored.updated_at, later);
        assert_eq!(stored.created_at, m.created_at);
        let milestone = stored
            .key_milestones
            .iter()
            .find(|ms| ms.id == "C1-phase-planning")
            .unwrap();
        assert_eq!(milestone.progress, 100);
    }

    #[test]
    fn update_with_unknown_ids_changes_nothing() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let m = svc
            .generate_timeline_at("C1", &c, &options(), None, date(2024, 1, 1))
            .unwrap();

        assert!(!svc.update_event_status("no-such-timeline", "C1-req-1", EventStatus::Completed, None));
        assert!(!svc.update_event_status(&m.id, "no-such-event", EventStatus::Completed, None));
        assert_eq!(svc.get_timeline_mapping(&m.id).unwrap(), m);
    }

    #[test]
    fn clear_cache_forgets_ids() {
        let svc = TimelineService::default();
        let c = circular("C1");
        let m = svc
            .generate_timeline_at("C1", &c, &options(), None, date(2024, 1, 1))
            .unwrap();
        svc.clear_cache();
        assert!(svc.get_timeline_mapping(&m.id).is_none());
        assert_eq!(svc.get_timeline_stats(), TimelineStats::default());
    }

    #[test]
    fn stats_aggregate() {
        let svc = TimelineService::default();
        let now = date(2024, 1, 1);
        svc.generate_timeline_at("C1", &circular("C1"), &options(), None, now)
            .unwrap();
        svc.generate_timeline_at("C2", &circular("C2"), &options(), None, now)
            .unwrap();

        let stats = svc.get_timeline_stats();
        // published, effective, one requirement, three phases.
        assert_eq!(stats.total_mappings, 2);
        assert_eq!(stats.total_events, 12);
        assert!((stats.average_events_per_mapping - 6.0).abs() < 1e-9);
        assert!((stats.average_critical_path_length - 4.0).abs() < 1e-9);
        assert_eq!(stats.events_by_status[&EventStatus::Completed], 2);
        assert_eq!(stats.events_by_status[&EventStatus::Upcoming], 10);
        assert_eq!(stats.events_by_type[&EventType::Milestone], 6);
    }

    #[test]
    fn deadline_alerts_within_window() {
        let svc = TimelineService::default();
        svc.generate_timeline_at("C1", &circular("C1"), &options(), Some("org-1"), date(2024, 1, 1))
            .unwrap();

        // Requirement lands on 2024-02-08, effective date on 2024-04-01.
        let alerts = svc.upcoming_deadlines_at(date(2024, 2, 1), 30);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event_id, "C1-req-1");
        assert_eq!(alerts[0].days_remaining, 7);
        assert_eq!(alerts[0].organization_id.as_deref(), Some("org-1"));

        let wide = svc.upcoming_deadlines_at(date(2024, 2, 1), 90);
        let ids: Vec<&str> = wide.iter().map(|a| a.event_id.as_str()).collect();
        assert_eq!(ids, vec!["C1-req-1", "C1-effective"]);

        assert!(svc.upcoming_deadlines_at(date(2024, 2, 1), 0).is_empty());
    }

    #[test]
    fn oversized_alert_window_covers_the_rest_of_the_calendar() {
        let svc = TimelineService::default();
        svc.generate_timeline_at("C1", &circular("C1"), &options(), None, date(2024, 1, 1))
            .unwrap();

        let ids: Vec<String> = svc
            .upcoming_deadlines_at(date(2024, 2, 1), 100_000_000)
            .into_iter()
            .map(|a| a.event_id)
            .collect();
        assert_eq!(ids, vec!["C1-req-1", "C1-effective"]);
        assert_eq!(svc.upcoming_deadlines_at(date(2024, 2, 1), i64::MAX).len(), 2);
    }

    #[test]
    fn buffered_date_overflow_is_a_validation_error() {
        let svc = TimelineService::default();
        let opts = options()
            .with_custom_deadline(CustomDeadline {
                event_type: EventType::ReviewDate,
                description: "Far future review".into(),
                date: DateTime::<Utc>::MAX_UTC - chrono::Duration::days(10),
                priority: Priority::Low,
            })
            .with_buffer(50.0);

        let err = svc
            .generate_timeline_at("C1", &circular("C1"), &opts, None, date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            RegintelError::Validation(ValidationError::DateOutOfRange { field: "buffered_date" })
        ));
        assert_eq!(svc.get_timeline_stats().total_mappings, 0);
    }

    #[test]
    fn bounded_cache_evicts_and_index_follows() {
        let cache: Arc<dyn Cache<TimelineMapping>> = Arc::new(LruCache::new(1));
        let svc = TimelineService::with_cache(EngineConfig::default(), cache);
        let now = date(2024, 1, 1);
        let first = svc
            .generate_timeline_at("C1", &circular("C1"), &options(), None, now)
            .unwrap();
        let second = svc
            .generate_timeline_at("C2", &circular("C2"), &options(), None, now)
            .unwrap();

        assert!(svc.get_timeline_mapping(&first.id).is_none());
        assert!(!svc.update_event_status(&first.id, "C1-req-1", EventStatus::Completed, None));
        assert_eq!(svc.get_timeline_mapping(&second.id).unwrap().id, second.id);
        assert_eq!(svc.index.read().len(), 1);
    }
}
