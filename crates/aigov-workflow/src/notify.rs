//! # Escalation Notices
//!
//! Outbound seam for telling humans that a workflow was escalated. The
//! engine sends the notice before it commits the transition; a failing sink
//! aborts the transition.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use aigov_core::{
    ActorId, GovernanceError, GovernanceLevel, SystemId, Timestamp, WorkflowId, WorkflowType,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationNotice {
    pub workflow_id: WorkflowId,
    pub system_id: SystemId,
    pub workflow_type: WorkflowType,
    /// Level of the latest assessment, if the system has been assessed.
    pub level: Option<GovernanceLevel>,
    pub dwell_secs: u64,
    pub actor: ActorId,
    pub at: Timestamp,
}

pub trait NotificationSink: Send + Sync + fmt::Debug {
    fn notify(&self, notice: &EscalationNotice) -> Result<(), GovernanceError>;
}

/// Emits each notice as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notice: &EscalationNotice) -> Result<(), GovernanceError> {
        tracing::warn!(
            workflow_id = %notice.workflow_id,
            system_id = %notice.system_id,
            workflow_type = %notice.workflow_type,
            level = ?notice.level,
            dwell_secs = notice.dwell_secs,
            actor = %notice.actor,
            "workflow escalated"
        );
        Ok(())
    }
}

/// Collects notices in memory. Can be switched to fail, for exercising the
/// abort path.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    notices: Mutex<Vec<EscalationNotice>>,
    failing: Mutex<bool>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<EscalationNotice> {
        self.notices.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn notify(&self, notice: &EscalationNotice) -> Result<(), GovernanceError> {
        if *self.failing.lock() {
            return Err(GovernanceError::Notification(format!(
                "sink unavailable for {}",
                notice.workflow_id
            )));
        }
        self.notices.lock().push(notice.clone());
        Ok(())
    }
}
