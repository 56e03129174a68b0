//! # regintel-timeline — Implementation Timelines for Regulatory Circulars
//!
//! Given a [`ParsedCircular`](regintel_core::ParsedCircular) and
//! per-organization [`TimelineGenerationOptions`], produces a
//! [`TimelineMapping`]: dated events sorted ascending, the critical path,
//! key milestones, schedule risk factors and recommendations.
//!
//! - `event.rs`: the event and mapping data model.
//! - `options.rs`: generation options and custom deadlines.
//! - `generator.rs`: the pure generation pipeline; takes `now` explicitly.
//! - `service.rs`: [`TimelineService`], which validates, memoizes in an
//!   injected cache, and serves status updates, stats and deadline alerts.
//!
//! "Critical path" here is the date-ordered list of high and critical
//! priority events, not a longest-path computation over a dependency graph.

pub mod event;
pub mod generator;
pub mod options;
pub mod service;

pub use event::{
    EventSource, EventStatus, EventType, Milestone, RecommendationKind, RiskCategory, RiskFactor,
    TimelineEvent, TimelineMapping, TimelineRecommendation,
};
pub use options::{CustomDeadline, TimelineGenerationOptions};
pub use service::{DeadlineAlert, TimelineService, TimelineStats};
