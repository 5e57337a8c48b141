//! # Workflow State Machine
//!
//! ## States
//!
//! ```text
//! PENDING ──start──▶ IN_PROGRESS ──submit_decision(approve)──▶ APPROVED ──close──▶ CLOSED
//!    │                   │   └─────submit_decision(reject)───▶ REJECTED ──close──▶ CLOSED
//!    │                   └──escalate──▶ ESCALATED ──resolve(approve)──▶ APPROVED
//!    │                   │                  └───────resolve(reject)───▶ REJECTED
//!    └───────────────────┴──────────────────┴──cancel──▶ CLOSED (outcome CANCELLED)
//! ```
//!
//! [`transition_target`] is the structural table: it knows which
//! `(state, event)` pairs exist, not whether their guards pass. Guards
//! (approval threshold, escalation policy) are checked by the engine before
//! [`WorkflowInstance::apply`] commits a transition.
//!
//! APPROVED, REJECTED and CLOSED are terminal: an instance in one of them
//! no longer counts as active for its system and type.

use serde::{Deserialize, Serialize};

use aigov_core::{
    ActorId, GovernanceError, GovernanceResult, SystemId, Timestamp, WorkflowId, WorkflowType,
};

// ─── State ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Pending,
    InProgress,
    Approved,
    Rejected,
    Escalated,
    Closed,
}

impl WorkflowState {
    pub fn all() -> &'static [WorkflowState] {
        &[
            Self::Pending,
            Self::InProgress,
            Self::Approved,
            Self::Rejected,
            Self::Escalated,
            Self::Closed,
        ]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Escalated => "ESCALATED",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Events ─────────────────────────────────────────────────────────

/// An externally supplied approve/reject decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

/// How a finished instance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Start,
    /// Reviewer decision backed by the assessment score it was made on.
    SubmitDecision { decision: Decision, score: f64 },
    Escalate,
    /// Manual resolution of an escalated instance.
    Resolve { outcome: Decision },
    Close,
    Cancel,
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SubmitDecision { .. } => "submit_decision",
            Self::Escalate => "escalate",
            Self::Resolve { .. } => "resolve",
            Self::Close => "close",
            Self::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmitDecision { decision, score } => {
                write!(f, "submit_decision({decision:?}, {score})")
            }
            Self::Resolve { outcome } => write!(f, "resolve({outcome:?})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Who caused a transition and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPayload {
    pub actor: ActorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransitionPayload {
    pub fn new(actor: ActorId) -> Self {
        Self { actor, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub(crate) fn invalid(
    from: WorkflowState,
    event: &WorkflowEvent,
    reason: impl Into<String>,
) -> GovernanceError {
    GovernanceError::InvalidTransition {
        from: from.to_string(),
        event: event.name().to_string(),
        reason: reason.into(),
    }
}

/// The state `event` leads to from `state`, ignoring guards.
pub fn transition_target(
    state: WorkflowState,
    event: &WorkflowEvent,
) -> GovernanceResult<WorkflowState> {
    use WorkflowEvent as E;
    use WorkflowState as S;

    let to = match (state, event) {
        (S::Pending, E::Start) => S::InProgress,
        (S::InProgress, E::SubmitDecision { decision: Decision::Approve, .. }) => S::Approved,
        (S::InProgress, E::SubmitDecision { decision: Decision::Reject, .. }) => S::Rejected,
        (S::InProgress, E::Escalate) => S::Escalated,
        (S::Escalated, E::Resolve { outcome: Decision::Approve }) => S::Approved,
        (S::Escalated, E::Resolve { outcome: Decision::Reject }) => S::Rejected,
        (S::Approved | S::Rejected, E::Close) => S::Closed,
        (S::Pending | S::InProgress | S::Escalated, E::Cancel) => S::Closed,
        (S::Closed, _) => return Err(invalid(state, event, "instance is closed")),
        _ => return Err(invalid(state, event, "no such transition")),
    };
    Ok(to)
}

// ─── Transition log ─────────────────────────────────────────────────

/// One immutable entry of an instance's transition log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub at: Timestamp,
    pub actor: ActorId,
    pub from: WorkflowState,
    pub to: WorkflowState,
    pub event: WorkflowEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ─── Instance ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: WorkflowId,
    pub system_id: SystemId,
    pub workflow_type: WorkflowType,
    pub state: WorkflowState,
    pub outcome: Option<Outcome>,
    pub created_by: ActorId,
    pub created_at: Timestamp,
    /// When the current state was entered; drives dwell-time checks.
    pub state_entered_at: Timestamp,
    pub transitions: Vec<TransitionRecord>,
    #[serde(default)]
    pub archived_at: Option<Timestamp>,
}

impl WorkflowInstance {
    pub fn new(
        system_id: SystemId,
        workflow_type: WorkflowType,
        created_by: ActorId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: WorkflowId::new(),
            system_id,
            workflow_type,
            state: WorkflowState::Pending,
            outcome: None,
            created_by,
            created_at: now,
            state_entered_at: now,
            transitions: Vec::new(),
            archived_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Seconds spent in the current state as of `now`.
    pub fn dwell_secs(&self, now: Timestamp) -> u64 {
        u64::try_from(now.seconds_since(&self.state_entered_at)).unwrap_or(0)
    }

    /// Commit `event`, which must lead to `to` per [`transition_target`].
    /// Appends to the log and records the outcome on terminal entry.
    pub fn apply(
        &mut self,
        event: WorkflowEvent,
        payload: TransitionPayload,
        now: Timestamp,
    ) -> GovernanceResult<WorkflowState> {
        let to = transition_target(self.state, &event)?;
        self.outcome = match (to, event) {
            (WorkflowState::Approved, _) => Some(Outcome::Approved),
            (WorkflowState::Rejected, _) => Some(Outcome::Rejected),
            (WorkflowState::Closed, WorkflowEvent::Cancel) => Some(Outcome::Cancelled),
            _ => self.outcome,
        };
        self.transitions.push(TransitionRecord {
            at: now,
            actor: payload.actor,
            from: self.state,
            to,
            event,
            note: payload.note,
        });
        self.state = to;
        self.state_entered_at = now;
        Ok(to)
    }
}
