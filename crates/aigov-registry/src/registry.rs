//! # System Registry
//!
//! Canonical record of each registered AI system and its assessment
//! history.
//!
//! ## Concurrency
//!
//! Every mutation of a system (register, update, deactivate, record score,
//! record assessment) runs under that system's mutex from the shared
//! [`LockTable`]: load, mutate, save. Reads go straight to the store and are
//! never blocked by mutations of other systems.
//!
//! The same lock table is exposed through [`SystemRegistry::system_lock`]
//! so the workflow engine can hold a system's lock across its
//! check-then-create for new workflow instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use aigov_assess::{score_trend, AssessmentResult, ModuleScore, ScoreTrend};
use aigov_core::{
    AISystem, Clock, GovernanceError, GovernanceModule, GovernanceResult, KeyGuard, LockTable,
    SystemId, SystemMetadata,
};

use crate::store::{RecordedScore, SystemRecord, SystemStore};

pub struct SystemRegistry {
    store: Arc<dyn SystemStore>,
    clock: Arc<dyn Clock>,
    locks: LockTable<SystemId>,
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl SystemRegistry {
    pub fn new(store: Arc<dyn SystemStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: LockTable::new(),
        }
    }

    /// Hold the lock linearizing mutations of `id` until the guard drops.
    pub fn system_lock(&self, id: SystemId) -> KeyGuard<'_, SystemId> {
        self.locks.lock(&id)
    }

    /// Number of system ids whose lock is currently held or awaited.
    pub fn held_locks(&self) -> usize {
        self.locks.len()
    }

    // ── Registration ────────────────────────────────────────────────

    /// Register a new system with a freshly generated id.
    pub fn register_new(&self, metadata: SystemMetadata) -> GovernanceResult<AISystem> {
        let system = AISystem::new(SystemId::new(), metadata, self.clock.now())?;
        self.register(system.clone())?;
        Ok(system)
    }

    /// Register `system`. Fails with `DuplicateSystem` if the id exists.
    pub fn register(&self, system: AISystem) -> GovernanceResult<SystemId> {
        system.metadata.validate()?;
        let id = system.id();
        let _guard = self.system_lock(id);

        if self.store.load(&id)?.is_some() {
            return Err(GovernanceError::DuplicateSystem(id));
        }
        self.store.save(&SystemRecord::new(system.clone()))?;
        tracing::info!(
            system_id = %id,
            name = %system.metadata.name,
            inherent_risk = %system.inherent_risk,
            "system registered"
        );
        Ok(id)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn get(&self, id: &SystemId) -> GovernanceResult<AISystem> {
        Ok(self.record(id)?.system)
    }

    pub fn record(&self, id: &SystemId) -> GovernanceResult<SystemRecord> {
        self.store
            .load(id)?
            .ok_or_else(|| GovernanceError::not_found_system(id))
    }

    /// All systems ordered by registration time, deactivated ones included
    /// only when asked.
    pub fn list(&self, include_inactive: bool) -> GovernanceResult<Vec<AISystem>> {
        let mut systems: Vec<AISystem> = self
            .store
            .list()?
            .into_iter()
            .map(|r| r.system)
            .filter(|s| include_inactive || s.active)
            .collect();
        systems.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(systems)
    }

    /// Every record, deactivated systems included, in registration order.
    pub fn records(&self) -> GovernanceResult<Vec<SystemRecord>> {
        let mut records = self.store.list()?;
        records.sort_by(|a, b| {
            a.system
                .registered_at
                .cmp(&b.system.registered_at)
                .then_with(|| a.system.id().cmp(&b.system.id()))
        });
        Ok(records)
    }

    pub fn latest_assessment(&self, id: &SystemId) -> GovernanceResult<Option<AssessmentResult>> {
        Ok(self.record(id)?.assessments.pop())
    }

    pub fn assessment_history(&self, id: &SystemId) -> GovernanceResult<Vec<AssessmentResult>> {
        Ok(self.record(id)?.assessments)
    }

    /// Latest recorded score per module.
    pub fn current_module_scores(
        &self,
        id: &SystemId,
    ) -> GovernanceResult<BTreeMap<GovernanceModule, ModuleScore>> {
        let record = self.record(id)?;
        let mut current = BTreeMap::new();
        for recorded in record.module_scores {
            current.insert(recorded.score.module, recorded.score);
        }
        Ok(current)
    }

    pub fn module_score_history(
        &self,
        id: &SystemId,
        module: GovernanceModule,
    ) -> GovernanceResult<Vec<RecordedScore>> {
        Ok(self
            .record(id)?
            .module_scores
            .into_iter()
            .filter(|r| r.score.module == module)
            .collect())
    }

    /// Trend of `module` over its scored runs. Insufficient runs are
    /// skipped.
    pub fn score_trend(&self, id: &SystemId, module: GovernanceModule) -> GovernanceResult<ScoreTrend> {
        let history: Vec<f64> = self
            .module_score_history(id, module)?
            .iter()
            .filter_map(|r| r.score.score)
            .collect();
        Ok(score_trend(&history))
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Replace a system's metadata. Identity and history are untouched.
    pub fn update_metadata(
        &self,
        id: &SystemId,
        metadata: SystemMetadata,
    ) -> GovernanceResult<AISystem> {
        let now = self.clock.now();
        let updated = self.mutate(id, |record| {
            record.system.update_metadata(metadata, now)?;
            Ok(record.system.clone())
        })?;
        tracing::info!(system_id = %id, inherent_risk = %updated.inherent_risk, "system metadata updated");
        Ok(updated)
    }

    /// Flag a system inactive. It stays queryable.
    pub fn deactivate(&self, id: &SystemId) -> GovernanceResult<AISystem> {
        let now = self.clock.now();
        let updated = self.mutate(id, |record| {
            record.system.deactivate(now);
            Ok(record.system.clone())
        })?;
        tracing::info!(system_id = %id, "system deactivated");
        Ok(updated)
    }

    /// Append a module score to the system's history.
    pub fn record_module_score(&self, id: &SystemId, score: ModuleScore) -> GovernanceResult<()> {
        let recorded_at = self.clock.now();
        self.mutate(id, |record| {
            record.module_scores.push(RecordedScore { recorded_at, score });
            Ok(())
        })
    }

    /// Append an assessment result to its system's history.
    pub fn record_assessment(&self, result: AssessmentResult) -> GovernanceResult<()> {
        let id = result.system_id;
        self.mutate(&id, |record| {
            record.assessments.push(result);
            Ok(())
        })
    }

    fn mutate<R>(
        &self,
        id: &SystemId,
        f: impl FnOnce(&mut SystemRecord) -> GovernanceResult<R>,
    ) -> GovernanceResult<R> {
        let _guard = self.system_lock(*id);
        let mut record = self
            .store
            .load(id)?
            .ok_or_else(|| GovernanceError::not_found_system(id))?;
        let out = f(&mut record)?;
        self.store.save(&record)?;
        Ok(out)
    }
}
