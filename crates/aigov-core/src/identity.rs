//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier in the governance core. These
//! prevent accidental identifier confusion: you cannot pass a `WorkflowId`
//! where a `SystemId` is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GovernanceError;

/// Unique identifier for a registered AI system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub Uuid);

/// Unique identifier for a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub Uuid);

/// Unique identifier for an assessment result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub Uuid);

/// The person or service that caused a state change.
///
/// Free-form (user id, service account, "system"), but never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl SystemId {
    /// Generate a new random system identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl WorkflowId {
    /// Generate a new random workflow identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AssessmentId {
    /// Generate a new random assessment identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SystemId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorId {
    /// The actor recorded for engine-internal bookkeeping.
    pub const SYSTEM: &'static str = "system";

    /// Create an actor id, rejecting empty or whitespace-only values.
    pub fn new(id: impl Into<String>) -> Result<Self, GovernanceError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GovernanceError::Validation(
                "actor id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// The built-in `system` actor.
    pub fn system() -> Self {
        Self(Self::SYSTEM.to_string())
    }

    /// Access the actor id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "system:{}", self.0)
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "workflow:{}", self.0)
    }
}

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assessment:{}", self.0)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SystemId {
    type Err = GovernanceError;

    /// Parse either a bare UUID or the `system:<uuid>` display form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("system:").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| GovernanceError::Validation(format!("invalid system id {s:?}: {e}")))
    }
}

impl FromStr for WorkflowId {
    type Err = GovernanceError;

    /// Parse either a bare UUID or the `workflow:<uuid>` display form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("workflow:").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| GovernanceError::Validation(format!("invalid workflow id {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(SystemId::new(), SystemId::new());
        assert_ne!(WorkflowId::new(), WorkflowId::new());
    }

    #[test]
    fn test_display_prefixes() {
        let id = SystemId::new();
        assert!(id.to_string().starts_with("system:"));
        let wf = WorkflowId::new();
        assert!(wf.to_string().starts_with("workflow:"));
    }

    #[test]
    fn test_parse_accepts_display_form_and_bare_uuid() {
        let id = SystemId::new();
        assert_eq!(id.to_string().parse::<SystemId>().unwrap(), id);
        assert_eq!(id.as_uuid().to_string().parse::<SystemId>().unwrap(), id);
        let wf = WorkflowId::new();
        assert_eq!(wf.to_string().parse::<WorkflowId>().unwrap(), wf);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("system:not-a-uuid".parse::<SystemId>().is_err());
        assert!("".parse::<WorkflowId>().is_err());
    }

    #[test]
    fn test_actor_rejects_blank() {
        assert!(ActorId::new("").is_err());
        assert!(ActorId::new("   ").is_err());
        assert_eq!(ActorId::new("cro").unwrap().as_str(), "cro");
        assert_eq!(ActorId::system().as_str(), "system");
    }
}
