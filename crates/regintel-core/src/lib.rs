//! # regintel-core — Foundational Types for the Regulatory Intelligence Engine
//!
//! Every other crate in the workspace depends on `regintel-core`; it depends
//! on nothing internal.
//!
//! ## Contents
//!
//! - **Circular model** (`circular.rs`): the `ParsedCircular` contract
//!   produced by the upstream parser. Immutable once produced.
//!
//! - **Organization model** (`organization.rs`): the `OrganizationProfile`
//!   snapshot supplied per request.
//!
//! - **Heuristic tables** (`heuristics.rs`): priority, size, impact-level and
//!   category enums mapped to their fixed constants. One definition, one
//!   place to change a multiplier.
//!
//! - **Cache** (`cache.rs`): the injectable `Cache<V>` trait with an
//!   unbounded and an LRU-bounded implementation.
//!
//! - **Configuration** (`config.rs`): `EngineConfig`, loaded from YAML.
//!
//! - **Durations** (`duration.rs`): human duration rendering and parsing.
//!
//! ## Crate Policy
//!
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod cache;
pub mod circular;
pub mod config;
pub mod duration;
pub mod error;
pub mod heuristics;
pub mod organization;

// Re-export primary types for ergonomic imports.
pub use cache::{cache_digest, Cache, LruCache, MemoryCache};
pub use circular::{
    CircularAnalysis, CircularContent, CircularMetadata, Complexity, ComplianceRequirement,
    DeadlineType, Definition, ExtractedDeadline, ParsedCircular, Section, Sentiment,
};
pub use config::{CacheConfig, EngineConfig};
pub use duration::{format_duration_days, parse_duration};
pub use error::{RegintelError, ValidationError};
pub use heuristics::{ImpactLevel, OrganizationSize, Priority, RegulatoryCategory};
pub use organization::{OrganizationProfile, OrganizationType, PastViolation, RiskAppetite};
