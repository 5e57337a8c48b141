//! # Workflow Engine
//!
//! Instantiates, advances, and archives [`WorkflowInstance`]s.
//!
//! ## Locking
//!
//! - `initiate` runs under the registry's per-system lock, so the
//!   check-then-create of the one-active-instance invariant cannot race with
//!   another initiation or with deactivation of the same system.
//! - `advance` and `archive` run under a per-workflow lock.
//!
//! Neither lock is held while calling a registry mutation.
//!
//! ## Guards
//!
//! `submit_decision` carries the score the reviewer decided on. Approve
//! requires `score >= approval_threshold`, reject requires the opposite.
//! `escalate` asks the [`EscalationPolicy`] with the system's latest
//! assessment and the IN_PROGRESS dwell. A failed guard is an
//! `InvalidTransition` and leaves the instance untouched.
//!
//! ## Escalation notices
//!
//! The notice is sent once the escalated instance is saved. If the sink
//! fails, the previous instance is saved back and the sink's error returned,
//! so a notice is never sent for an unsaved transition and an undelivered
//! one never leaves the instance escalated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use aigov_core::{
    ActorId, Clock, GovernanceConfig, GovernanceError, GovernanceResult, LockTable, SystemId,
    WorkflowId, WorkflowType,
};
use aigov_registry::SystemRegistry;

use crate::escalation::EscalationPolicy;
use crate::notify::{EscalationNotice, NotificationSink};
use crate::state::{
    invalid, transition_target, Decision, TransitionPayload, WorkflowEvent, WorkflowInstance,
    WorkflowState,
};
use crate::store::WorkflowStore;

// ─── Queries ────────────────────────────────────────────────────────

/// Selection criteria for [`WorkflowEngine::list`]. Empty fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowFilter {
    pub system_id: Option<SystemId>,
    pub workflow_type: Option<WorkflowType>,
    pub state: Option<WorkflowState>,
    pub include_archived: bool,
}

impl WorkflowFilter {
    pub fn for_system(system_id: SystemId) -> Self {
        Self {
            system_id: Some(system_id),
            ..Self::default()
        }
    }

    fn matches(&self, wf: &WorkflowInstance) -> bool {
        self.system_id.map_or(true, |id| wf.system_id == id)
            && self.workflow_type.map_or(true, |ty| wf.workflow_type == ty)
            && self.state.map_or(true, |s| wf.state == s)
            && (self.include_archived || !wf.is_archived())
    }
}

/// An instance that has stayed in its state longer than configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueWorkflow {
    pub workflow_id: WorkflowId,
    pub system_id: SystemId,
    pub workflow_type: WorkflowType,
    pub state: WorkflowState,
    pub dwell_secs: u64,
    pub limit_secs: u64,
}

// ─── Engine ─────────────────────────────────────────────────────────

pub struct WorkflowEngine {
    config: Arc<GovernanceConfig>,
    registry: Arc<SystemRegistry>,
    store: Arc<dyn WorkflowStore>,
    policy: Arc<dyn EscalationPolicy>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    locks: LockTable<WorkflowId>,
}

impl fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("store", &self.store)
            .field("policy", &self.policy)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    pub fn new(
        config: Arc<GovernanceConfig>,
        registry: Arc<SystemRegistry>,
        store: Arc<dyn WorkflowStore>,
        policy: Arc<dyn EscalationPolicy>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            registry,
            store,
            policy,
            sink,
            clock,
            locks: LockTable::new(),
        }
    }

    pub fn policy(&self) -> &Arc<dyn EscalationPolicy> {
        &self.policy
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Create a PENDING instance of `workflow_type` for `system_id`.
    ///
    /// Fails with `NotFound` for an unknown system, `SystemDeactivated` for
    /// a deactivated one, and `ActiveWorkflowExists` when a non-terminal
    /// instance of the same type already exists for the system.
    pub fn initiate(
        &self,
        system_id: SystemId,
        workflow_type: WorkflowType,
        actor: ActorId,
    ) -> GovernanceResult<WorkflowId> {
        let _guard = self.registry.system_lock(system_id);

        let system = self.registry.get(&system_id)?;
        if !system.active {
            return Err(GovernanceError::SystemDeactivated(system_id));
        }
        if let Some(existing) = self.store.list()?.into_iter().find(|wf| {
            wf.system_id == system_id && wf.workflow_type == workflow_type && wf.is_active()
        }) {
            return Err(GovernanceError::ActiveWorkflowExists {
                system_id,
                workflow_type,
                existing: existing.id,
            });
        }

        let instance = WorkflowInstance::new(system_id, workflow_type, actor, self.clock.now());
        self.store.save(&instance)?;
        tracing::info!(
            workflow_id = %instance.id,
            system_id = %system_id,
            workflow_type = %workflow_type,
            "workflow initiated"
        );
        Ok(instance.id)
    }

    /// Apply `event` to the instance. Returns the new state.
    pub fn advance(
        &self,
        id: &WorkflowId,
        event: WorkflowEvent,
        payload: TransitionPayload,
    ) -> GovernanceResult<WorkflowState> {
        let _guard = self.locks.lock(id);

        let mut instance = self.get(id)?;
        let now = self.clock.now();
        let from = instance.state;
        transition_target(from, &event)?;

        let mut notice = None;
        match event {
            WorkflowEvent::SubmitDecision { decision, score } => {
                self.check_decision(from, &event, decision, score)?;
            }
            WorkflowEvent::Escalate => {
                let assessment = self.registry.latest_assessment(&instance.system_id)?;
                let dwell_secs = instance.dwell_secs(now);
                if !self.policy.should_escalate(
                    instance.workflow_type,
                    assessment.as_ref(),
                    dwell_secs,
                ) {
                    return Err(invalid(from, &event, "escalation policy declined"));
                }
                notice = Some(EscalationNotice {
                    workflow_id: instance.id,
                    system_id: instance.system_id,
                    workflow_type: instance.workflow_type,
                    level: assessment.map(|a| a.level),
                    dwell_secs,
                    actor: payload.actor.clone(),
                    at: now,
                });
            }
            _ => {}
        }

        let before = instance.clone();
        let to = instance.apply(event, payload, now)?;
        self.store.save(&instance)?;
        if let Some(notice) = notice {
            // A notice goes out only for a saved transition; an undelivered
            // one rolls the transition back.
            if let Err(e) = self.sink.notify(&notice) {
                self.store.save(&before)?;
                tracing::warn!(workflow_id = %instance.id, error = %e, "escalation rolled back");
                return Err(e);
            }
        }
        tracing::info!(
            workflow_id = %instance.id,
            system_id = %instance.system_id,
            from = %from,
            to = %to,
            event = event.name(),
            "workflow transition"
        );
        Ok(to)
    }

    fn check_decision(
        &self,
        from: WorkflowState,
        event: &WorkflowEvent,
        decision: Decision,
        score: f64,
    ) -> GovernanceResult<()> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(GovernanceError::Validation(format!(
                "decision score must be within [0, 100], got {score}"
            )));
        }
        let threshold = self.config.approval_threshold;
        match decision {
            Decision::Approve if score < threshold => Err(invalid(
                from,
                event,
                format!("score {score} is below the approval threshold {threshold}"),
            )),
            Decision::Reject if score >= threshold => Err(invalid(
                from,
                event,
                format!("score {score} meets the approval threshold {threshold}"),
            )),
            _ => Ok(()),
        }
    }

    /// Mark a CLOSED instance archived. It stays queryable.
    pub fn archive(&self, id: &WorkflowId, actor: &ActorId) -> GovernanceResult<WorkflowInstance> {
        let _guard = self.locks.lock(id);

        let mut instance = self.get(id)?;
        if instance.state != WorkflowState::Closed {
            return Err(GovernanceError::InvalidTransition {
                from: instance.state.to_string(),
                event: "archive".to_string(),
                reason: "only closed instances can be archived".to_string(),
            });
        }
        if instance.is_archived() {
            return Ok(instance);
        }
        instance.archived_at = Some(self.clock.now());
        self.store.save(&instance)?;
        tracing::info!(workflow_id = %instance.id, actor = %actor, "workflow archived");
        Ok(instance)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn get(&self, id: &WorkflowId) -> GovernanceResult<WorkflowInstance> {
        self.store
            .load(id)?
            .ok_or_else(|| GovernanceError::not_found_workflow(id))
    }

    /// Matching instances, oldest first.
    pub fn list(&self, filter: &WorkflowFilter) -> GovernanceResult<Vec<WorkflowInstance>> {
        let mut out: Vec<WorkflowInstance> = self
            .store
            .list()?
            .into_iter()
            .filter(|wf| filter.matches(wf))
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    /// Number of instances per state, archived ones included. Every state
    /// appears, with 0 when unused.
    pub fn state_counts(&self) -> GovernanceResult<BTreeMap<WorkflowState, usize>> {
        let mut counts: BTreeMap<WorkflowState, usize> =
            WorkflowState::all().iter().map(|s| (*s, 0)).collect();
        for wf in self.store.list()? {
            *counts.entry(wf.state).or_default() += 1;
        }
        Ok(counts)
    }

    /// Non-terminal instances whose dwell exceeds their limit. Reports only.
    pub fn list_overdue(&self) -> GovernanceResult<Vec<OverdueWorkflow>> {
        let now = self.clock.now();
        let mut overdue: Vec<OverdueWorkflow> = self
            .store
            .list()?
            .into_iter()
            .filter_map(|wf| {
                let limits = self.config.dwell_limits_for(wf.workflow_type);
                let limit_secs = match wf.state {
                    WorkflowState::Pending => limits.pending_secs,
                    WorkflowState::InProgress => limits.in_progress_secs,
                    WorkflowState::Escalated => limits.escalated_secs,
                    _ => return None,
                };
                let dwell_secs = wf.dwell_secs(now);
                (dwell_secs > limit_secs).then(|| OverdueWorkflow {
                    workflow_id: wf.id,
                    system_id: wf.system_id,
                    workflow_type: wf.workflow_type,
                    state: wf.state,
                    dwell_secs,
                    limit_secs,
                })
            })
            .collect();
        overdue.sort_by(|a, b| b.dwell_secs.cmp(&a.dwell_secs));
        Ok(overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    use aigov_assess::AssessmentResult;
    use aigov_core::{
        AssessmentId, DataSensitivity, GovernanceLevel, ManualClock, SystemMetadata, Timestamp,
    };
    use aigov_registry::InMemorySystemStore;

    use crate::escalation::DefaultEscalationPolicy;
    use crate::notify::MemoryNotificationSink;
    use crate::store::InMemoryWorkflowStore;

    struct Fixture {
        engine: WorkflowEngine,
        registry: Arc<SystemRegistry>,
        clock: Arc<ManualClock>,
        sink: Arc<MemoryNotificationSink>,
        system_id: SystemId,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryWorkflowStore::new()))
    }

    fn fixture_with(store: Arc<dyn WorkflowStore>) -> Fixture {
        let config = Arc::new(GovernanceConfig::default());
        let clock = Arc::new(ManualClock::new(
            Timestamp::parse("2026-03-01T09:00:00Z").unwrap(),
        ));
        let registry = Arc::new(SystemRegistry::new(
            Arc::new(InMemorySystemStore::new()),
            clock.clone(),
        ));
        let system = registry
            .register_new(SystemMetadata {
                name: "Loan approvals".into(),
                use_case: "credit decisioning".into(),
                model_type: "gradient boosted trees".into(),
                data_sensitivity: DataSensitivity::High,
                jurisdictions: vec!["EU".into()],
                data_categories: Vec::new(),
                risk_factors: Vec::new(),
                quality_management_declared: false,
            })
            .unwrap();
        let sink = Arc::new(MemoryNotificationSink::new());
        let engine = WorkflowEngine::new(
            config.clone(),
            registry.clone(),
            store,
            Arc::new(DefaultEscalationPolicy::new(config.escalation.clone())),
            sink.clone(),
            clock.clone(),
        );
        Fixture {
            engine,
            registry,
            clock,
            sink,
            system_id: system.id(),
        }
    }

    /// In-memory store whose saves can be switched to fail.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: InMemoryWorkflowStore,
        failing: parking_lot::Mutex<bool>,
    }

    impl WorkflowStore for FlakyStore {
        fn load(&self, id: &WorkflowId) -> GovernanceResult<Option<WorkflowInstance>> {
            self.inner.load(id)
        }

        fn save(&self, instance: &WorkflowInstance) -> GovernanceResult<()> {
            if *self.failing.lock() {
                return Err(GovernanceError::Persistence("disk full".into()));
            }
            self.inner.save(instance)
        }

        fn list(&self) -> GovernanceResult<Vec<WorkflowInstance>> {
            self.inner.list()
        }
    }

    fn actor() -> TransitionPayload {
        TransitionPayload::new(ActorId::new("reviewer").unwrap())
    }

    fn record_level(f: &Fixture, level: GovernanceLevel, score: f64) {
        f.registry
            .record_assessment(AssessmentResult {
                id: AssessmentId::new(),
                system_id: f.system_id,
                overall_score: score,
                level,
                module_scores: Map::new(),
                insufficient_modules: Vec::new(),
                capped: false,
                recommendations: Vec::new(),
                assessed_at: f.clock.now(),
            })
            .unwrap();
    }

    fn started(f: &Fixture) -> WorkflowId {
        let id = f
            .engine
            .initiate(f.system_id, WorkflowType::ComplianceAssessment, ActorId::system())
            .unwrap();
        f.engine.advance(&id, WorkflowEvent::Start, actor()).unwrap();
        id
    }

    #[test]
    fn test_initiate_rejects_second_active_instance() {
        let f = fixture();
        let first = f
            .engine
            .initiate(f.system_id, WorkflowType::ComplianceAssessment, ActorId::system())
            .unwrap();
        let err = f
            .engine
            .initiate(f.system_id, WorkflowType::ComplianceAssessment, ActorId::system())
            .unwrap_err();
        match err {
            GovernanceError::ActiveWorkflowExists { existing, .. } => assert_eq!(existing, first),
            other => panic!("unexpected error: {other}"),
        }
        // A different type is independent.
        assert!(f
            .engine
            .initiate(f.system_id, WorkflowType::ModelValidation, ActorId::system())
            .is_ok());
    }

    #[test]
    fn test_initiate_after_terminal_instance() {
        let f = fixture();
        let id = f
            .engine
            .initiate(f.system_id, WorkflowType::AuditReview, ActorId::system())
            .unwrap();
        f.engine.advance(&id, WorkflowEvent::Cancel, actor()).unwrap();
        assert!(f
            .engine
            .initiate(f.system_id, WorkflowType::AuditReview, ActorId::system())
            .is_ok());
    }

    #[test]
    fn test_initiate_unknown_and_deactivated_system() {
        let f = fixture();
        let err = f
            .engine
            .initiate(SystemId::new(), WorkflowType::ComplianceAssessment, ActorId::system())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotFound { .. }));

        f.registry.deactivate(&f.system_id).unwrap();
        let err = f
            .engine
            .initiate(f.system_id, WorkflowType::ComplianceAssessment, ActorId::system())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::SystemDeactivated(_)));
    }

    #[test]
    fn test_decision_guard_uses_threshold() {
        let f = fixture();
        let id = started(&f);

        let err = f
            .engine
            .advance(
                &id,
                WorkflowEvent::SubmitDecision { decision: Decision::Approve, score: 69.5 },
                actor(),
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidTransition { .. }));

        let err = f
            .engine
            .advance(
                &id,
                WorkflowEvent::SubmitDecision { decision: Decision::Reject, score: 70.0 },
                actor(),
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidTransition { .. }));

        let err = f
            .engine
            .advance(
                &id,
                WorkflowEvent::SubmitDecision { decision: Decision::Approve, score: f64::NAN },
                actor(),
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(f.engine.get(&id).unwrap().transitions.len(), 1);

        let state = f
            .engine
            .advance(
                &id,
                WorkflowEvent::SubmitDecision { decision: Decision::Approve, score: 70.0 },
                actor(),
            )
            .unwrap();
        assert_eq!(state, WorkflowState::Approved);
    }

    #[test]
    fn test_escalate_declined_without_warrant() {
        let f = fixture();
        record_level(&f, GovernanceLevel::Low, 80.0);
        let id = started(&f);

        let err = f.engine.advance(&id, WorkflowEvent::Escalate, actor()).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidTransition { .. }));
        assert_eq!(f.engine.get(&id).unwrap().state, WorkflowState::InProgress);
        assert!(f.sink.notices().is_empty());
    }

    #[test]
    fn test_escalate_on_critical_level_notifies() {
        let f = fixture();
        record_level(&f, GovernanceLevel::Critical, 30.0);
        let id = started(&f);

        let state = f.engine.advance(&id, WorkflowEvent::Escalate, actor()).unwrap();
        assert_eq!(state, WorkflowState::Escalated);
        let notices = f.sink.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].workflow_id, id);
        assert_eq!(notices[0].level, Some(GovernanceLevel::Critical));
    }

    #[test]
    fn test_escalate_on_dwell() {
        let f = fixture();
        let id = started(&f);
        let limit = GovernanceConfig::default().escalation.in_progress_limit_secs;
        f.clock.advance_secs(limit as i64 + 1);

        let state = f.engine.advance(&id, WorkflowEvent::Escalate, actor()).unwrap();
        assert_eq!(state, WorkflowState::Escalated);
        assert_eq!(f.sink.notices()[0].dwell_secs, limit + 1);
    }

    #[test]
    fn test_sink_failure_aborts_escalation() {
        let f = fixture();
        record_level(&f, GovernanceLevel::High, 50.0);
        let id = started(&f);
        f.sink.set_failing(true);

        let err = f.engine.advance(&id, WorkflowEvent::Escalate, actor()).unwrap_err();
        assert!(matches!(err, GovernanceError::Notification(_)));
        let wf = f.engine.get(&id).unwrap();
        assert_eq!(wf.state, WorkflowState::InProgress);
        assert_eq!(wf.transitions.len(), 1);
    }

    #[test]
    fn test_failed_save_sends_no_notice() {
        let store = Arc::new(FlakyStore::default());
        let f = fixture_with(store.clone());
        record_level(&f, GovernanceLevel::Critical, 30.0);
        let id = started(&f);
        *store.failing.lock() = true;

        let err = f.engine.advance(&id, WorkflowEvent::Escalate, actor()).unwrap_err();
        assert!(matches!(err, GovernanceError::Persistence(_)));
        assert!(f.sink.notices().is_empty());
        assert_eq!(f.engine.get(&id).unwrap().state, WorkflowState::InProgress);
    }

    #[test]
    fn test_rejected_ids_leave_no_locks_behind() {
        let f = fixture();
        for _ in 0..100 {
            let id = WorkflowId::new();
            assert!(f.engine.advance(&id, WorkflowEvent::Start, actor()).is_err());
            assert!(f.engine.archive(&id, &ActorId::system()).is_err());
            assert!(f
                .engine
                .initiate(SystemId::new(), WorkflowType::Escalation, ActorId::system())
                .is_err());
        }
        assert!(f.engine.locks.is_empty());
        assert_eq!(f.registry.held_locks(), 0);

        let id = started(&f);
        f.engine.advance(&id, WorkflowEvent::Cancel, actor()).unwrap();
        assert!(f.engine.locks.is_empty());
        assert_eq!(f.registry.held_locks(), 0);
    }

    #[test]
    fn test_list_overdue_reports_without_transitioning() {
        let f = fixture();
        let pending = f
            .engine
            .initiate(f.system_id, WorkflowType::PolicyUpdate, ActorId::system())
            .unwrap();
        let limits = GovernanceConfig::default().dwell_limits_for(WorkflowType::PolicyUpdate);

        f.clock.advance_secs(limits.pending_secs as i64);
        assert!(f.engine.list_overdue().unwrap().is_empty());

        f.clock.advance_secs(1);
        let overdue = f.engine.list_overdue().unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].workflow_id, pending);
        assert_eq!(overdue[0].state, WorkflowState::Pending);
        assert_eq!(overdue[0].limit_secs, limits.pending_secs);
        assert_eq!(f.engine.get(&pending).unwrap().state, WorkflowState::Pending);
    }

    #[test]
    fn test_terminal_instances_never_overdue() {
        let f = fixture();
        let id = started(&f);
        f.engine
            .advance(
                &id,
                WorkflowEvent::SubmitDecision { decision: Decision::Reject, score: 40.0 },
                actor(),
            )
            .unwrap();
        f.clock.advance_secs(365 * 86_400);
        assert!(f.engine.list_overdue().unwrap().is_empty());
    }

    #[test]
    fn test_archive_only_closed() {
        let f = fixture();
        let id = started(&f);
        let err = f.engine.archive(&id, &ActorId::system()).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidTransition { .. }));

        f.engine.advance(&id, WorkflowEvent::Cancel, actor()).unwrap();
        let archived = f.engine.archive(&id, &ActorId::system()).unwrap();
        assert!(archived.is_archived());

        assert!(f.engine.list(&WorkflowFilter::default()).unwrap().is_empty());
        let all = f
            .engine
            .list(&WorkflowFilter {
                include_archived: true,
                ..WorkflowFilter::default()
            })
            .unwrap();
        assert_eq!(all.len(), 1);
        assert!(f.engine.get(&id).is_ok());
    }

    #[test]
    fn test_list_filter_and_state_counts() {
        let f = fixture();
        let a = started(&f);
        let _b = f
            .engine
            .initiate(f.system_id, WorkflowType::RiskAssessment, ActorId::system())
            .unwrap();

        let in_progress = f
            .engine
            .list(&WorkflowFilter {
                state: Some(WorkflowState::InProgress),
                ..WorkflowFilter::default()
            })
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, a);

        let for_system = f.engine.list(&WorkflowFilter::for_system(f.system_id)).unwrap();
        assert_eq!(for_system.len(), 2);

        let counts = f.engine.state_counts().unwrap();
        assert_eq!(counts[&WorkflowState::InProgress], 1);
        assert_eq!(counts[&WorkflowState::Pending], 1);
        assert_eq!(counts[&WorkflowState::Closed], 0);
        assert_eq!(counts.len(), WorkflowState::all().len());
    }

    #[test]
    fn test_unknown_workflow() {
        let f = fixture();
        let err = f
            .engine
            .advance(&WorkflowId::new(), WorkflowEvent::Start, actor())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotFound { .. }));
    }
}
