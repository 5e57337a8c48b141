//! # Workflow Persistence
//!
//! Whole-instance load/save/list, mirroring the registry's `SystemStore`.

use std::fmt;

use aigov_core::{GovernanceError, MemoryStore, WorkflowId};

use crate::state::WorkflowInstance;

pub trait WorkflowStore: Send + Sync + fmt::Debug {
    fn load(&self, id: &WorkflowId) -> Result<Option<WorkflowInstance>, GovernanceError>;
    fn save(&self, instance: &WorkflowInstance) -> Result<(), GovernanceError>;
    fn list(&self) -> Result<Vec<WorkflowInstance>, GovernanceError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    instances: MemoryStore<WorkflowId, WorkflowInstance>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn load(&self, id: &WorkflowId) -> Result<Option<WorkflowInstance>, GovernanceError> {
        Ok(self.instances.get(id))
    }

    fn save(&self, instance: &WorkflowInstance) -> Result<(), GovernanceError> {
        self.instances.insert(instance.id, instance.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<WorkflowInstance>, GovernanceError> {
        Ok(self.instances.list())
    }
}
