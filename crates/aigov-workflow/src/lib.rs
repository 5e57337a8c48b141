//! # aigov-workflow — Governance Workflows
//!
//! The approval lifecycle of a registered AI system:
//!
//! - [`state`]: the workflow state machine, its events and transition log.
//! - [`decision`]: the [`DecisionSource`] capability that produces
//!   reviewer decisions for callers to submit.
//! - [`escalation`]: the [`EscalationPolicy`] capability and its default.
//! - [`notify`]: the outbound [`NotificationSink`] for escalation notices.
//! - [`store`]: the outbound [`WorkflowStore`] persistence seam.
//! - [`engine`]: the [`WorkflowEngine`] runtime tying them together.
//!
//! ## Crate Policy
//!
//! - Approval and rejection are always externally supplied events. The
//!   engine never decides an outcome on its own.
//! - Dwell limits are advisory. Overdue instances are reported by
//!   [`WorkflowEngine::list_overdue`], never auto-transitioned.
//! - No background threads.

pub mod decision;
pub mod engine;
pub mod escalation;
pub mod notify;
pub mod state;
pub mod store;

pub use decision::{DecisionSource, ThresholdDecisionSource};
pub use engine::{OverdueWorkflow, WorkflowEngine, WorkflowFilter};
pub use escalation::{DefaultEscalationPolicy, EscalationPolicy};
pub use notify::{
    EscalationNotice, MemoryNotificationSink, NotificationSink, TracingNotificationSink,
};
pub use state::{
    transition_target, Decision, Outcome, TransitionPayload, TransitionRecord, WorkflowEvent,
    WorkflowInstance, WorkflowState,
};
pub use store::{InMemoryWorkflowStore, WorkflowStore};
