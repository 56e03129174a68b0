//! # Engine Configuration
//!
//! `EngineConfig` carries the few knobs the engines expose: how long a
//! generated timeline or assessment stays valid, and whether result caches
//! are bounded. Every field has a default, so an empty YAML document is a
//! valid configuration.
//!
//! ```yaml
//! timeline_validity_days: 180
//! assessment_validity_days: 90
//! cache:
//!   capacity: 500
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{Cache, LruCache, MemoryCache};
use crate::error::RegintelError;

/// Days a generated timeline mapping stays valid.
pub const DEFAULT_TIMELINE_VALIDITY_DAYS: i64 = 180;

/// Days an impact assessment stays valid.
pub const DEFAULT_ASSESSMENT_VALIDITY_DAYS: i64 = 90;

/// Cache sizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries per cache. `None` means unbounded.
    #[serde(default)]
    pub capacity: Option<usize>,
}

impl CacheConfig {
    /// Build a cache honouring this configuration.
    pub fn build<V: Clone + Send + Sync + 'static>(&self) -> Arc<dyn Cache<V>> {
        match self.capacity {
            Some(capacity) => Arc::new(LruCache::new(capacity)),
            None => Arc::new(MemoryCache::new()),
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Days from creation until a timeline mapping's `valid_until`.
    #[serde(default = "default_timeline_validity_days")]
    pub timeline_validity_days: i64,
    /// Days from assessment until an impact assessment's `valid_until`.
    #[serde(default = "default_assessment_validity_days")]
    pub assessment_validity_days: i64,
    /// Cache sizing.
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_timeline_validity_days() -> i64 {
    DEFAULT_TIMELINE_VALIDITY_DAYS
}

fn default_assessment_validity_days() -> i64 {
    DEFAULT_ASSESSMENT_VALIDITY_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeline_validity_days: DEFAULT_TIMELINE_VALIDITY_DAYS,
            assessment_validity_days: DEFAULT_ASSESSMENT_VALIDITY_DAYS,
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegintelError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RegintelError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded engine configuration");
        Ok(config)
    }

    /// Check that validity windows are positive and a set capacity is non-zero.
    pub fn validate(&self) -> Result<(), RegintelError> {
        if self.timeline_validity_days <= 0 {
            return Err(RegintelError::Config(format!(
                "timeline_validity_days must be positive, got {}",
                self.timeline_validity_days
            )));
        }
        if self.assessment_validity_days <= 0 {
            return Err(RegintelError::Config(format!(
                "assessment_validity_days must be positive, got {}",
                self.assessment_validity_days
            )));
        }
        if self.cache.capacity == Some(0) {
            return Err(RegintelError::Config(
                "cache.capacity must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
