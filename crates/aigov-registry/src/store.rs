//! # System Persistence
//!
//! [`SystemStore`] is the outbound persistence seam for the registry. The
//! registry loads a [`SystemRecord`], mutates it under the system's lock,
//! and saves it back; stores only need whole-record load/save/list.

use std::fmt;

use serde::{Deserialize, Serialize};

use aigov_assess::{AssessmentResult, ModuleScore};
use aigov_core::{AISystem, GovernanceError, MemoryStore, SystemId, Timestamp};

/// A module score with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedScore {
    pub recorded_at: Timestamp,
    pub score: ModuleScore,
}

/// Everything the registry keeps about one system. Histories are
/// append-only, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub system: AISystem,
    #[serde(default)]
    pub module_scores: Vec<RecordedScore>,
    #[serde(default)]
    pub assessments: Vec<AssessmentResult>,
}

impl SystemRecord {
    pub fn new(system: AISystem) -> Self {
        Self {
            system,
            module_scores: Vec::new(),
            assessments: Vec::new(),
        }
    }
}

/// Outbound persistence for system records.
pub trait SystemStore: Send + Sync + fmt::Debug {
    fn load(&self, id: &SystemId) -> Result<Option<SystemRecord>, GovernanceError>;
    fn save(&self, record: &SystemRecord) -> Result<(), GovernanceError>;
    fn list(&self) -> Result<Vec<SystemRecord>, GovernanceError>;
}

/// Process-local [`SystemStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySystemStore {
    records: MemoryStore<SystemId, SystemRecord>,
}

impl InMemorySystemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SystemStore for InMemorySystemStore {
    fn load(&self, id: &SystemId) -> Result<Option<SystemRecord>, GovernanceError> {
        Ok(self.records.get(id))
    }

    fn save(&self, record: &SystemRecord) -> Result<(), GovernanceError> {
        self.records.insert(record.system.id(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<SystemRecord>, GovernanceError> {
        Ok(self.records.list())
    }
}
