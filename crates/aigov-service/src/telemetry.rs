//! # Service Counters
//!
//! `metrics` facade counters. Without an installed recorder every call is a
//! no-op; the binary decides whether to install one.

use aigov_core::GovernanceLevel;
use aigov_workflow::WorkflowEvent;

pub const ASSESSMENTS_TOTAL: &str = "aigov_assessments_total";
pub const WORKFLOW_TRANSITIONS_TOTAL: &str = "aigov_workflow_transitions_total";
pub const ESCALATIONS_TOTAL: &str = "aigov_escalations_total";

pub(crate) fn assessment_recorded(level: GovernanceLevel) {
    metrics::counter!(ASSESSMENTS_TOTAL, "level" => level.as_str()).increment(1);
}

pub(crate) fn transition_applied(event: &WorkflowEvent) {
    metrics::counter!(WORKFLOW_TRANSITIONS_TOTAL, "event" => event.name()).increment(1);
    if matches!(event, WorkflowEvent::Escalate) {
        metrics::counter!(ESCALATIONS_TOTAL).increment(1);
    }
}
