//! # Impact Assessor
//!
//! Validates a request, scores it, and memoizes the result per
//! `(circular_id, organization_id)` pair. A repeat request for the same
//! pair returns the stored assessment unchanged, whatever its flags.
//! Assessment ids are UUIDs, indexed so that [`ImpactAssessor::get_assessment`]
//! does not scan the cache.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use regintel_core::{
    Cache, EngineConfig, ImpactLevel, ParsedCircular, RegintelError, ValidationError,
};

use crate::areas::impact_areas;
use crate::model::ImpactAssessment;
use crate::planning::{
    compliance_gap, cost_estimate, implementation_plan, recommendations, risk_assessment,
};
use crate::request::ImpactAssessmentRequest;
use crate::scoring::{confidence, overall_impact};

/// Aggregate statistics over every cached assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentStats {
    /// Cached assessments.
    pub total_assessments: usize,
    /// Mean overall score, or 0.
    pub average_score: f64,
    /// Mean confidence, or 0.
    pub average_confidence: f64,
    /// Assessment counts by overall level.
    pub by_level: BTreeMap<ImpactLevel, usize>,
}

/// Scores and caches impact assessments.
pub struct ImpactAssessor {
    config: EngineConfig,
    cache: Arc<dyn Cache<ImpactAssessment>>,
    /// Assessment id → cache key.
    index: RwLock<HashMap<String, String>>,
}

impl std::fmt::Debug for ImpactAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpactAssessor")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Default for ImpactAssessor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ImpactAssessor {
    /// Create an assessor with a cache built from `config.cache`.
    pub fn new(config: EngineConfig) -> Self {
        let cache = config.cache.build();
        Self::with_cache(config, cache)
    }

    /// Create an assessor backed by the given cache.
    pub fn with_cache(config: EngineConfig, cache: Arc<dyn Cache<ImpactAssessment>>) -> Self {
        Self {
            config,
            cache,
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Cache key for a circular and organization.
    pub fn cache_key(circular_id: &str, organization_id: &str) -> String {
        format!("{circular_id}_{organization_id}")
    }

    /// Assess (or fetch from cache) the impact of a circular.
    pub fn assess_impact(
        &self,
        request: &ImpactAssessmentRequest,
        circular: Option<&ParsedCircular>,
    ) -> Result<ImpactAssessment, RegintelError> {
        self.assess_impact_at(request, circular, Utc::now())
    }

    /// [`assess_impact`](Self::assess_impact) with an explicit clock.
    ///
    /// Without a parsed circular, category, impact-level and
    /// requirement-count adjustments are skipped and areas keep their base
    /// scores.
    ///
    /// # Errors
    ///
    /// `Validation` if an id is blank, the profile is out of range, the
    /// circular is invalid or describes a different circular, or the validity
    /// window runs past the end of the calendar.
    pub fn assess_impact_at(
        &self,
        request: &ImpactAssessmentRequest,
        circular: Option<&ParsedCircular>,
        now: DateTime<Utc>,
    ) -> Result<ImpactAssessment, RegintelError> {
        request.validate(circular)?;

        let key = Self::cache_key(&request.circular_id, &request.organization_id);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(
                circular_id = %request.circular_id,
                organization_id = %request.organization_id,
                assessment_id = %cached.id,
                "impact assessment cache hit"
            );
            return Ok(cached);
        }

        let valid_until = ValidationError::offset_days(
            "valid_until",
            now,
            self.config.assessment_validity_days,
        )?;
        let profile = &request.organization_profile;
        let overall = overall_impact(profile, circular);
        let areas = impact_areas(circular);

        let assessment = ImpactAssessment {
            id: Uuid::new_v4().to_string(),
            circular_id: request.circular_id.clone(),
            organization_id: request.organization_id.clone(),
            timeline: request.include_timeline.then(implementation_plan),
            recommendations: if request.include_recommendations {
                recommendations(&overall, &areas, profile)
            } else {
                Vec::new()
            },
            risk_assessment: risk_assessment(&overall, profile),
            cost_estimate: request.include_cost_estimate.then(|| cost_estimate(&areas)),
            compliance_gap: compliance_gap(&overall, &areas, profile),
            confidence: confidence(profile, request.analysis_type, circular),
            assessed_at: now,
            valid_until,
            overall_impact: overall,
            impact_areas: areas,
        };

        tracing::info!(
            circular_id = %assessment.circular_id,
            organization_id = %assessment.organization_id,
            assessment_id = %assessment.id,
            score = assessment.overall_impact.score,
            level = %assessment.overall_impact.level,
            with_circular = circular.is_some(),
            "assessed impact"
        );

        self.cache.set(key.clone(), assessment.clone());
        let mut index = self.index.write();
        index.insert(assessment.id.clone(), key);
        if index.len() > self.cache.len() {
            index.retain(|_, k| self.cache.contains_key(k));
        }
        Ok(assessment)
    }

    /// Look up an assessment by its id.
    pub fn get_assessment(&self, assessment_id: &str) -> Option<ImpactAssessment> {
        let key = self.index.read().get(assessment_id).cloned()?;
        self.cache.get(&key).filter(|a| a.id == assessment_id)
    }

    /// Aggregate statistics over the cache.
    pub fn assessment_stats(&self) -> AssessmentStats {
        let assessments = self.cache.values();
        let mut stats = AssessmentStats {
            total_assessments: assessments.len(),
            ..AssessmentStats::default()
        };
        if assessments.is_empty() {
            return stats;
        }

        let n = assessments.len() as f64;
        stats.average_score = assessments.iter().map(|a| a.overall_impact.score).sum::<f64>() / n;
        stats.average_confidence = assessments.iter().map(|a| a.confidence).sum::<f64>() / n;
        for a in &assessments {
            *stats.by_level.entry(a.overall_impact.level).or_default() += 1;
        }
        stats
    }

    /// Drop every cached assessment and the id index.
    pub fn clear_cache(&self) {
        let mut index = self.index.write();
        self.cache.clear();
        index.clear();
        tracing::info!("cleared impact assessment cache");
    }

    /// Engine configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
