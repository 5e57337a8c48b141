//! # Score Aggregation
//!
//! Combines module scores into one overall score and a [`GovernanceLevel`].
//!
//! ## Rules
//!
//! - The configured weight map drives aggregation. Every weighted module
//!   takes part; a module with no submitted score is represented as an
//!   insufficient-evidence score (0, flagged). Nothing is skipped.
//! - Overall is the weighted arithmetic mean, clamped to [0,100].
//! - If any module is insufficient, overall is capped at the configured
//!   ceiling.
//! - The level comes from the configured closed-open bands.
//!
//! Aggregation does not persist anything; the caller records the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use aigov_core::{
    AssessmentId, GovernanceConfig, GovernanceLevel, GovernanceModule, SystemId, Timestamp,
};

use crate::score::ModuleScore;

const REVIEW_BELOW: f64 = 70.0;
const SUSPEND_BELOW: f64 = 50.0;

/// Aggregated assessment of a system at a point in time. Immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: AssessmentId,
    pub system_id: SystemId,
    pub overall_score: f64,
    pub level: GovernanceLevel,
    pub module_scores: BTreeMap<GovernanceModule, ModuleScore>,
    /// Modules aggregated as 0 because evidence was missing.
    pub insufficient_modules: Vec<GovernanceModule>,
    /// The ceiling lowered the weighted mean.
    pub capped: bool,
    pub recommendations: Vec<String>,
    pub assessed_at: Timestamp,
}

impl AssessmentResult {
    pub fn has_insufficient_evidence(&self) -> bool {
        !self.insufficient_modules.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: Arc<GovernanceConfig>,
}

impl ScoreAggregator {
    pub fn new(config: Arc<GovernanceConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// Aggregate the current module scores for `system_id`.
    pub fn aggregate(
        &self,
        system_id: SystemId,
        scores: &BTreeMap<GovernanceModule, ModuleScore>,
        at: Timestamp,
    ) -> AssessmentResult {
        let mut module_scores = BTreeMap::new();
        let mut weighted_sum = 0.0;
        for (module, weight) in &self.config.weights {
            let score = scores
                .get(module)
                .cloned()
                .unwrap_or_else(|| ModuleScore::insufficient(*module, &[], None));
            weighted_sum += weight * score.effective_score();
            module_scores.insert(*module, score);
        }

        let mean = if weighted_sum.is_finite() {
            weighted_sum.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let insufficient_modules: Vec<GovernanceModule> = module_scores
            .values()
            .filter(|s| s.is_insufficient())
            .map(|s| s.module)
            .collect();

        let ceiling = self.config.insufficient_evidence_ceiling;
        let capped = !insufficient_modules.is_empty() && mean > ceiling;
        let overall_score = if capped { ceiling } else { mean };
        if capped {
            tracing::warn!(
                system_id = %system_id,
                mean,
                ceiling,
                insufficient = insufficient_modules.len(),
                "overall score capped for insufficient evidence"
            );
        }

        let level = self.config.classify(overall_score);
        let recommendations = recommendations(&module_scores);

        AssessmentResult {
            id: AssessmentId::new(),
            system_id,
            overall_score,
            level,
            module_scores,
            insufficient_modules,
            capped,
            recommendations,
            assessed_at: at,
        }
    }
}

fn recommendations(scores: &BTreeMap<GovernanceModule, ModuleScore>) -> Vec<String> {
    let mut out = Vec::new();
    for score in scores.values() {
        let title = score.module.title();
        match score.score {
            None => out.push(format!("Resupply {title} evidence")),
            Some(s) if s < SUSPEND_BELOW => out.push(format!(
                "{title} scored {s:.1}: consider suspending the system until remediated"
            )),
            Some(s) if s < REVIEW_BELOW => {
                out.push(format!("{title} scored {s:.1}: review {title} controls"))
            }
            Some(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scored(module: GovernanceModule, value: f64) -> ModuleScore {
        ModuleScore {
            module,
            score: Some(value),
            components: BTreeMap::new(),
            findings: Vec::new(),
            evidence_digest: None,
        }
    }

    fn all_scored(values: [f64; 5]) -> BTreeMap<GovernanceModule, ModuleScore> {
        GovernanceModule::all()
            .iter()
            .zip(values)
            .map(|(m, v)| (*m, scored(*m, v)))
            .collect()
    }

    fn aggregator() -> ScoreAggregator {
        ScoreAggregator::new(Arc::new(GovernanceConfig::default()))
    }

    #[test]
    fn test_high_scores_are_minimal() {
        let r = aggregator().aggregate(
            SystemId::new(),
            &all_scored([95.0, 90.0, 92.0, 88.0, 91.0]),
            Timestamp::now(),
        );
        assert!((r.overall_score - 91.2).abs() < 1e-9);
        assert_eq!(r.level, GovernanceLevel::Minimal);
        assert!(!r.capped);
        assert!(r.recommendations.is_empty());
    }

    #[test]
    fn test_low_scores_are_critical() {
        let r = aggregator().aggregate(
            SystemId::new(),
            &all_scored([30.0, 40.0, 35.0, 20.0, 25.0]),
            Timestamp::now(),
        );
        assert!((r.overall_score - 30.0).abs() < 1e-9);
        assert_eq!(r.level, GovernanceLevel::Critical);
        assert_eq!(r.recommendations.len(), 5);
        assert!(r.recommendations[0].contains("suspending"));
    }

    #[test]
    fn test_missing_module_is_insufficient_not_skipped() {
        let mut scores = all_scored([100.0; 5]);
        scores.remove(&GovernanceModule::DataResidency);
        let r = aggregator().aggregate(SystemId::new(), &scores, Timestamp::now());
        assert_eq!(r.module_scores.len(), 5);
        assert_eq!(r.insufficient_modules, vec![GovernanceModule::DataResidency]);
        // weighted mean 80, capped at 60
        assert!(r.capped);
        assert_eq!(r.overall_score, 60.0);
        assert_eq!(r.level, GovernanceLevel::Moderate);
        assert!(r.recommendations.iter().any(|s| s.starts_with("Resupply Data Residency")));
    }

    #[test]
    fn test_insufficient_below_ceiling_is_not_capped() {
        let mut scores = all_scored([50.0; 5]);
        scores.insert(
            GovernanceModule::Oversight,
            ModuleScore::insufficient(GovernanceModule::Oversight, &["decisions_logged".into()], None),
        );
        let r = aggregator().aggregate(SystemId::new(), &scores, Timestamp::now());
        assert!(!r.capped);
        assert!((r.overall_score - 40.0).abs() < 1e-9);
        assert!(r.has_insufficient_evidence());
    }

    #[test]
    fn test_custom_weights() {
        let mut config = GovernanceConfig::default();
        config.weights = [
            (GovernanceModule::ModelRisk, 0.4),
            (GovernanceModule::Oversight, 0.3),
            (GovernanceModule::DataGovernance, 0.1),
            (GovernanceModule::DataResidency, 0.1),
            (GovernanceModule::IsoCompliance, 0.1),
        ]
        .into_iter()
        .collect();
        config.validate().unwrap();
        let agg = ScoreAggregator::new(Arc::new(config));
        let r = agg.aggregate(
            SystemId::new(),
            &all_scored([100.0, 50.0, 0.0, 0.0, 0.0]),
            Timestamp::now(),
        );
        assert!((r.overall_score - 55.0).abs() < 1e-9);
        assert_eq!(r.level, GovernanceLevel::High);
    }

    proptest! {
        #[test]
        fn aggregate_stays_in_range(values in proptest::array::uniform5(0.0f64..=100.0)) {
            let r = aggregator().aggregate(SystemId::new(), &all_scored(values), Timestamp::now());
            prop_assert!((0.0..=100.0).contains(&r.overall_score));
        }

        #[test]
        fn insufficient_module_caps_overall(
            values in proptest::array::uniform5(0.0f64..=100.0),
            missing in 0usize..5,
        ) {
            let mut scores = all_scored(values);
            let module = GovernanceModule::all()[missing];
            scores.insert(module, ModuleScore::insufficient(module, &[], None));
            let r = aggregator().aggregate(SystemId::new(), &scores, Timestamp::now());
            prop_assert!(r.overall_score <= 60.0);
            prop_assert!(r.insufficient_modules.contains(&module));
        }

        #[test]
        fn level_matches_classification(values in proptest::array::uniform5(0.0f64..=100.0)) {
            let agg = aggregator();
            let r = agg.aggregate(SystemId::new(), &all_scored(values), Timestamp::now());
            prop_assert_eq!(r.level, agg.config().classify(r.overall_score));
        }
    }
}
