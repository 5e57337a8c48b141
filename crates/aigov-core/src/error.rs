//! # Error Types — Governance Error Taxonomy
//!
//! All library errors use `thiserror`. `GovernanceError` is the single
//! top-level type returned by the registry, the workflow engine and the
//! service facade.
//!
//! ## Design
//!
//! - Validation errors name the offending field.
//! - Transition errors carry the current state, the attempted event and the
//!   reason the transition was refused.
//! - Configuration errors are fatal at startup and wrap [`ConfigError`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::identity::{SystemId, WorkflowId};
use crate::module::GovernanceModule;
use crate::workflow::WorkflowType;

/// Convenience alias used across the workspace.
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Top-level error type for the governance core.
#[derive(Error, Debug)]
pub enum GovernanceError {
    /// Input rejected at the boundary (malformed metadata, wrong evidence
    /// variant, bad identifier).
    #[error("validation error: {0}")]
    Validation(String),

    /// Evidence was structurally valid but lacked mandatory fields. The
    /// module was recorded with an undefined score.
    #[error("insufficient evidence for {module}: missing {}", missing.join(", "))]
    InsufficientEvidence {
        module: GovernanceModule,
        missing: Vec<String>,
    },

    /// Lookup of an unknown entity.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Registration of a system id that already exists.
    #[error("system already registered: {0}")]
    DuplicateSystem(SystemId),

    /// The (state, event) pair is not in the transition table, or its guard
    /// failed.
    #[error("invalid transition from {from} on {event}: {reason}")]
    InvalidTransition {
        from: String,
        event: String,
        reason: String,
    },

    /// Configuration rejected at load time.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Deactivated systems cannot enter new workflows.
    #[error("system is deactivated: {0}")]
    SystemDeactivated(SystemId),

    /// An active workflow of this type already exists for the system.
    #[error("active {workflow_type} workflow already exists for {system_id}: {existing}")]
    ActiveWorkflowExists {
        system_id: SystemId,
        workflow_type: WorkflowType,
        existing: WorkflowId,
    },

    /// The outbound persistence store failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The outbound notification sink failed; the triggering transition was
    /// not applied.
    #[error("notification error: {0}")]
    Notification(String),
}

impl GovernanceError {
    pub fn not_found_system(id: &SystemId) -> Self {
        Self::NotFound {
            kind: "system",
            id: id.to_string(),
        }
    }

    pub fn not_found_workflow(id: &WorkflowId) -> Self {
        Self::NotFound {
            kind: "workflow",
            id: id.to_string(),
        }
    }

    /// True for the boundary-validation family (`Validation` and
    /// `InsufficientEvidence`).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InsufficientEvidence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = GovernanceError::InsufficientEvidence {
            module: GovernanceModule::ModelRisk,
            missing: vec!["validation_score".into(), "lifecycle_stage".into()],
        };
        assert_eq!(
            err.to_string(),
            "insufficient evidence for model_risk: missing validation_score, lifecycle_stage"
        );

        let err = GovernanceError::InvalidTransition {
            from: "CLOSED".into(),
            event: "start".into(),
            reason: "terminal state".into(),
        };
        assert!(err.to_string().contains("CLOSED"));
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_validation_family() {
        assert!(GovernanceError::Validation("x".into()).is_validation());
        assert!(GovernanceError::InsufficientEvidence {
            module: GovernanceModule::Oversight,
            missing: vec![],
        }
        .is_validation());
        assert!(!GovernanceError::not_found_system(&SystemId::new()).is_validation());
    }

    #[test]
    fn test_config_error_converts() {
        let err: GovernanceError = ConfigError::CeilingOutOfRange(120.0).into();
        assert!(matches!(err, GovernanceError::Configuration(_)));
    }
}
