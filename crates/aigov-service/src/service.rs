//! # Governance Service
//!
//! [`GovernanceService`] is the narrow command/query surface that outer
//! layers (HTTP handlers, the CLI, batch jobs) drive. It owns no state of
//! its own: it wires the assessors, the aggregator, the registry and the
//! workflow engine together, and emits counters.
//!
//! Construction goes through [`ServiceBuilder`]; every outbound
//! collaborator (stores, notification sink, clock, escalation policy) can
//! be replaced, and defaults to the in-process implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use aigov_assess::{
    AssessmentResult, AssessorSet, Evidence, ModuleScore, ScoreAggregator, ScoreTrend,
};
use aigov_core::{
    ActorId, AISystem, Clock, GovernanceConfig, GovernanceError, GovernanceModule,
    GovernanceResult, SystemClock, SystemId, SystemMetadata, WorkflowId, WorkflowType,
};
use aigov_registry::{InMemorySystemStore, SystemRecord, SystemRegistry, SystemStore};
use aigov_workflow::{
    DefaultEscalationPolicy, EscalationPolicy, InMemoryWorkflowStore, NotificationSink,
    OverdueWorkflow, TracingNotificationSink, TransitionPayload, WorkflowEngine, WorkflowEvent,
    WorkflowFilter, WorkflowInstance, WorkflowState, WorkflowStore,
};

use crate::dashboard::DashboardSummary;
use crate::telemetry;

// ─── Builder ────────────────────────────────────────────────────────

/// Assembles a [`GovernanceService`]. The configuration is validated in
/// [`ServiceBuilder::build`].
pub struct ServiceBuilder {
    config: GovernanceConfig,
    assessors: Option<AssessorSet>,
    system_store: Option<Arc<dyn SystemStore>>,
    workflow_store: Option<Arc<dyn WorkflowStore>>,
    policy: Option<Arc<dyn EscalationPolicy>>,
    sink: Option<Arc<dyn NotificationSink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl std::fmt::Debug for ServiceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBuilder")
            .field("config", &self.config)
            .field("assessors", &self.assessors)
            .finish_non_exhaustive()
    }
}

impl ServiceBuilder {
    pub fn new(config: GovernanceConfig) -> Self {
        Self {
            config,
            assessors: None,
            system_store: None,
            workflow_store: None,
            policy: None,
            sink: None,
            clock: None,
        }
    }

    /// Replace the standard assessors.
    pub fn assessors(mut self, assessors: AssessorSet) -> Self {
        self.assessors = Some(assessors);
        self
    }

    pub fn system_store(mut self, store: Arc<dyn SystemStore>) -> Self {
        self.system_store = Some(store);
        self
    }

    pub fn workflow_store(mut self, store: Arc<dyn WorkflowStore>) -> Self {
        self.workflow_store = Some(store);
        self
    }

    pub fn escalation_policy(mut self, policy: Arc<dyn EscalationPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> GovernanceResult<GovernanceService> {
        self.config.validate()?;
        let config = Arc::new(self.config);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let assessors = self
            .assessors
            .unwrap_or_else(|| AssessorSet::standard(&config));
        let registry = Arc::new(SystemRegistry::new(
            self.system_store
                .unwrap_or_else(|| Arc::new(InMemorySystemStore::new())),
            Arc::clone(&clock),
        ));
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(DefaultEscalationPolicy::new(config.escalation.clone())));
        let engine = WorkflowEngine::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            self.workflow_store
                .unwrap_or_else(|| Arc::new(InMemoryWorkflowStore::new())),
            policy,
            self.sink.unwrap_or_else(|| Arc::new(TracingNotificationSink)),
            Arc::clone(&clock),
        );
        Ok(GovernanceService {
            aggregator: ScoreAggregator::new(Arc::clone(&config)),
            config,
            assessors,
            registry,
            engine,
            clock,
        })
    }
}

// ─── Service ────────────────────────────────────────────────────────

pub struct GovernanceService {
    config: Arc<GovernanceConfig>,
    assessors: AssessorSet,
    aggregator: ScoreAggregator,
    registry: Arc<SystemRegistry>,
    engine: WorkflowEngine,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for GovernanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceService")
            .field("registry", &self.registry)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl GovernanceService {
    /// A service with in-process collaborators and the wall clock.
    pub fn new(config: GovernanceConfig) -> GovernanceResult<Self> {
        ServiceBuilder::new(config).build()
    }

    pub fn builder(config: GovernanceConfig) -> ServiceBuilder {
        ServiceBuilder::new(config)
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn registry(&self) -> &SystemRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    // ── Systems ─────────────────────────────────────────────────────

    pub fn register_system(&self, metadata: SystemMetadata) -> GovernanceResult<SystemId> {
        Ok(self.registry.register_new(metadata)?.id())
    }

    pub fn get_system(&self, id: &SystemId) -> GovernanceResult<AISystem> {
        self.registry.get(id)
    }

    /// The full record: system, module score history and assessments.
    pub fn system_record(&self, id: &SystemId) -> GovernanceResult<SystemRecord> {
        self.registry.record(id)
    }

    /// Controls required by the system's inherent risk tier.
    pub fn system_requirements(&self, id: &SystemId) -> GovernanceResult<Vec<&'static str>> {
        Ok(self.registry.get(id)?.requirements())
    }

    pub fn update_system(
        &self,
        id: &SystemId,
        metadata: SystemMetadata,
    ) -> GovernanceResult<AISystem> {
        self.registry.update_metadata(id, metadata)
    }

    pub fn deactivate_system(&self, id: &SystemId) -> GovernanceResult<AISystem> {
        self.registry.deactivate(id)
    }

    pub fn list_systems(&self, include_inactive: bool) -> GovernanceResult<Vec<AISystem>> {
        self.registry.list(include_inactive)
    }

    pub fn score_trend(
        &self,
        id: &SystemId,
        module: GovernanceModule,
    ) -> GovernanceResult<ScoreTrend> {
        self.registry.score_trend(id, module)
    }

    // ── Assessment ──────────────────────────────────────────────────

    /// Score `evidence` for `module` and append the score to the system's
    /// history.
    ///
    /// Evidence lacking mandatory fields is still recorded, as an
    /// insufficient score, before the `InsufficientEvidence` error is
    /// returned. Other errors record nothing.
    pub fn submit_evidence(
        &self,
        system_id: &SystemId,
        module: GovernanceModule,
        evidence: &Evidence,
    ) -> GovernanceResult<ModuleScore> {
        let system = self.registry.get(system_id)?;
        match self.assessors.score(&system, module, evidence) {
            Ok(score) => {
                self.registry.record_module_score(system_id, score.clone())?;
                Ok(score)
            }
            Err(GovernanceError::InsufficientEvidence { module, missing }) => {
                tracing::warn!(
                    system_id = %system_id,
                    module = %module,
                    missing = ?missing,
                    "insufficient evidence"
                );
                let score = ModuleScore::insufficient(module, &missing, evidence.digest().ok());
                self.registry.record_module_score(system_id, score)?;
                Err(GovernanceError::InsufficientEvidence { module, missing })
            }
            Err(e) => Err(e),
        }
    }

    /// Aggregate the latest score of every module and append the result.
    pub fn run_assessment(&self, system_id: &SystemId) -> GovernanceResult<AssessmentResult> {
        let current = self.registry.current_module_scores(system_id)?;
        let result = self
            .aggregator
            .aggregate(*system_id, &current, self.clock.now());
        self.registry.record_assessment(result.clone())?;
        telemetry::assessment_recorded(result.level);
        tracing::info!(
            system_id = %system_id,
            assessment_id = %result.id,
            overall_score = result.overall_score,
            level = %result.level,
            capped = result.capped,
            "assessment recorded"
        );
        Ok(result)
    }

    /// Start an ESCALATION workflow when the policy says the latest
    /// assessment warrants one.
    ///
    /// Returns the workflow id (an already active escalation is reused), or
    /// `None` when the system is unassessed or the policy declines.
    pub fn route_assessment(&self, system_id: &SystemId) -> GovernanceResult<Option<WorkflowId>> {
        let Some(latest) = self.registry.latest_assessment(system_id)? else {
            return Ok(None);
        };
        if !self
            .engine
            .policy()
            .should_escalate(WorkflowType::Escalation, Some(&latest), 0)
        {
            return Ok(None);
        }
        match self
            .engine
            .initiate(*system_id, WorkflowType::Escalation, ActorId::system())
        {
            Ok(id) => {
                tracing::warn!(
                    system_id = %system_id,
                    workflow_id = %id,
                    level = %latest.level,
                    "assessment routed to escalation"
                );
                Ok(Some(id))
            }
            Err(GovernanceError::ActiveWorkflowExists { existing, .. }) => Ok(Some(existing)),
            Err(e) => Err(e),
        }
    }

    // ── Workflows ───────────────────────────────────────────────────

    pub fn initiate_workflow(
        &self,
        system_id: &SystemId,
        workflow_type: WorkflowType,
        actor: ActorId,
    ) -> GovernanceResult<WorkflowId> {
        self.engine.initiate(*system_id, workflow_type, actor)
    }

    pub fn advance_workflow(
        &self,
        id: &WorkflowId,
        event: WorkflowEvent,
        payload: TransitionPayload,
    ) -> GovernanceResult<WorkflowState> {
        let state = self.engine.advance(id, event, payload)?;
        telemetry::transition_applied(&event);
        Ok(state)
    }

    pub fn get_workflow(&self, id: &WorkflowId) -> GovernanceResult<WorkflowInstance> {
        self.engine.get(id)
    }

    pub fn list_workflows(&self, filter: &WorkflowFilter) -> GovernanceResult<Vec<WorkflowInstance>> {
        self.engine.list(filter)
    }

    pub fn archive_workflow(
        &self,
        id: &WorkflowId,
        actor: &ActorId,
    ) -> GovernanceResult<WorkflowInstance> {
        self.engine.archive(id, actor)
    }

    pub fn list_overdue_workflows(&self) -> GovernanceResult<Vec<OverdueWorkflow>> {
        self.engine.list_overdue()
    }

    // ── Dashboard ───────────────────────────────────────────────────

    pub fn dashboard(&self) -> GovernanceResult<DashboardSummary> {
        let records = self.registry.records()?;
        let states: BTreeMap<WorkflowState, usize> = self.engine.state_counts()?;
        Ok(DashboardSummary::build(&records, states))
    }
}
