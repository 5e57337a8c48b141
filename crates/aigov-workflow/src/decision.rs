//! # Decision Sources
//!
//! Produces the approve/reject event a reviewer would submit. The engine
//! never consults a [`DecisionSource`]; callers use one to build the
//! `submit_decision` event they then send through `advance`, so the
//! outcome always enters the state machine as an external event.

use std::fmt;

use aigov_assess::AssessmentResult;

use crate::state::{Decision, WorkflowEvent};

pub trait DecisionSource: Send + Sync + fmt::Debug {
    fn decide(&self, assessment: &AssessmentResult) -> Decision;

    /// The `submit_decision` event for `assessment`.
    fn decision_event(&self, assessment: &AssessmentResult) -> WorkflowEvent {
        WorkflowEvent::SubmitDecision {
            decision: self.decide(assessment),
            score: assessment.overall_score,
        }
    }
}

/// Stand-in for a human reviewer: approves at or above the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdDecisionSource {
    threshold: f64,
}

impl ThresholdDecisionSource {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl DecisionSource for ThresholdDecisionSource {
    fn decide(&self, assessment: &AssessmentResult) -> Decision {
        if assessment.overall_score >= self.threshold {
            Decision::Approve
        } else {
            Decision::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use aigov_core::{AssessmentId, GovernanceLevel, SystemId, Timestamp};

    fn result(score: f64) -> AssessmentResult {
        AssessmentResult {
            id: AssessmentId::new(),
            system_id: SystemId::new(),
            overall_score: score,
            level: GovernanceLevel::Moderate,
            module_scores: BTreeMap::new(),
            insufficient_modules: Vec::new(),
            capped: false,
            recommendations: Vec::new(),
            assessed_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_threshold_boundary_approves() {
        let source = ThresholdDecisionSource::new(70.0);
        assert_eq!(source.decide(&result(70.0)), Decision::Approve);
        assert_eq!(source.decide(&result(69.99)), Decision::Reject);
    }

    #[test]
    fn test_decision_event_carries_score() {
        let source = ThresholdDecisionSource::new(70.0);
        assert_eq!(
            source.decision_event(&result(55.0)),
            WorkflowEvent::SubmitDecision { decision: Decision::Reject, score: 55.0 }
        );
    }
}
