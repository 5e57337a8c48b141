//! # Escalation Policy
//!
//! The engine consults an [`EscalationPolicy`] whenever an `escalate` event
//! arrives and when the service routes a fresh assessment. The policy is a
//! pure decision: it reads, never mutates.

use std::fmt;

use aigov_assess::AssessmentResult;
use aigov_core::{EscalationSettings, WorkflowType};

/// Decides whether a workflow warrants escalation.
pub trait EscalationPolicy: Send + Sync + fmt::Debug {
    /// `dwell_secs` is the time spent in IN_PROGRESS so far, 0 when the
    /// instance is not in progress.
    fn should_escalate(
        &self,
        workflow_type: WorkflowType,
        assessment: Option<&AssessmentResult>,
        dwell_secs: u64,
    ) -> bool;
}

/// Escalates on a configured assessment level or on excessive IN_PROGRESS
/// dwell.
#[derive(Debug, Clone)]
pub struct DefaultEscalationPolicy {
    settings: EscalationSettings,
}

impl DefaultEscalationPolicy {
    pub fn new(settings: EscalationSettings) -> Self {
        Self { settings }
    }
}

impl EscalationPolicy for DefaultEscalationPolicy {
    fn should_escalate(
        &self,
        _workflow_type: WorkflowType,
        assessment: Option<&AssessmentResult>,
        dwell_secs: u64,
    ) -> bool {
        let level_warrants = assessment
            .map(|a| self.settings.levels.contains(&a.level))
            .unwrap_or(false);
        level_warrants || dwell_secs > self.settings.in_progress_limit_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use aigov_core::{AssessmentId, GovernanceLevel, SystemId, Timestamp};

    fn result(level: GovernanceLevel) -> AssessmentResult {
        AssessmentResult {
            id: AssessmentId::new(),
            system_id: SystemId::new(),
            overall_score: 50.0,
            level,
            module_scores: BTreeMap::new(),
            insufficient_modules: Vec::new(),
            capped: false,
            recommendations: Vec::new(),
            assessed_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_levels_trigger_escalation() {
        let policy = DefaultEscalationPolicy::new(EscalationSettings::default());
        let ty = WorkflowType::ComplianceAssessment;
        assert!(policy.should_escalate(ty, Some(&result(GovernanceLevel::Critical)), 0));
        assert!(policy.should_escalate(ty, Some(&result(GovernanceLevel::High)), 0));
        assert!(!policy.should_escalate(ty, Some(&result(GovernanceLevel::Moderate)), 0));
        assert!(!policy.should_escalate(ty, Some(&result(GovernanceLevel::Minimal)), 0));
    }

    #[test]
    fn test_dwell_limit_is_exclusive() {
        let settings = EscalationSettings::default();
        let limit = settings.in_progress_limit_secs;
        let policy = DefaultEscalationPolicy::new(settings);
        let ty = WorkflowType::ModelValidation;
        assert!(!policy.should_escalate(ty, None, limit));
        assert!(policy.should_escalate(ty, None, limit + 1));
        assert!(policy.should_escalate(ty, Some(&result(GovernanceLevel::Low)), limit + 1));
    }

    #[test]
    fn test_custom_levels() {
        let policy = DefaultEscalationPolicy::new(EscalationSettings {
            levels: vec![GovernanceLevel::Critical],
            in_progress_limit_secs: 60,
        });
        let ty = WorkflowType::RiskAssessment;
        assert!(!policy.should_escalate(ty, Some(&result(GovernanceLevel::High)), 0));
        assert!(policy.should_escalate(ty, Some(&result(GovernanceLevel::Critical)), 0));
    }
}
