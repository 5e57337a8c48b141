#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use aigov_assess::{
    AssessorSet, DataGovernanceEvidence, DataResidencyEvidence, Evidence, IsoComplianceEvidence,
    ModelRiskEvidence, ModuleAssessor, ModuleScore, OversightEvidence,
};
use aigov_core::{
    AISystem, DataSensitivity, GovernanceConfig, GovernanceError, GovernanceModule, ManualClock,
    SystemMetadata, Timestamp,
};
use aigov_service::GovernanceService;
use aigov_workflow::MemoryNotificationSink;

/// Returns a preset score regardless of the evidence.
#[derive(Debug)]
pub struct FixedAssessor {
    pub module: GovernanceModule,
    pub score: f64,
}

impl ModuleAssessor for FixedAssessor {
    fn module(&self) -> GovernanceModule {
        self.module
    }

    fn score(&self, _system: &AISystem, _evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        Ok(ModuleScore {
            module: self.module,
            score: Some(self.score),
            components: BTreeMap::new(),
            findings: Vec::new(),
            evidence_digest: None,
        })
    }
}

pub struct Harness {
    pub service: GovernanceService,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<MemoryNotificationSink>,
}

pub fn start_time() -> Timestamp {
    Timestamp::parse("2026-05-04T08:00:00Z").unwrap()
}

pub fn harness_with(assessors: Option<AssessorSet>) -> Harness {
    let config = GovernanceConfig::default();
    let clock = Arc::new(ManualClock::new(start_time()));
    let sink = Arc::new(MemoryNotificationSink::new());
    let mut builder = GovernanceService::builder(config.clone())
        .clock(clock.clone())
        .notification_sink(sink.clone());
    if let Some(assessors) = assessors {
        builder = builder.assessors(assessors);
    }
    Harness {
        service: builder.build().unwrap(),
        clock,
        sink,
    }
}

pub fn harness() -> Harness {
    harness_with(None)
}

/// Assessors that score the five modules with `scores`, in canonical
/// module order.
pub fn fixed_assessors(scores: [f64; 5]) -> AssessorSet {
    let config = GovernanceConfig::default();
    GovernanceModule::all()
        .iter()
        .zip(scores)
        .fold(AssessorSet::standard(&config), |set, (module, score)| {
            set.with_assessor(Arc::new(FixedAssessor { module: *module, score }))
        })
}

pub fn credit_model() -> SystemMetadata {
    SystemMetadata {
        name: "Retail credit scoring".into(),
        use_case: "credit underwriting".into(),
        model_type: "gradient boosted ensemble".into(),
        data_sensitivity: DataSensitivity::High,
        jurisdictions: vec!["EU".into(), "UK".into()],
        data_categories: Vec::new(),
        risk_factors: vec!["automated adverse decisions".into()],
        quality_management_declared: false,
    }
}

/// Placeholder evidence of the right variant for `module`.
pub fn placeholder_evidence(module: GovernanceModule) -> Evidence {
    match module {
        GovernanceModule::ModelRisk => Evidence::ModelRisk(ModelRiskEvidence::default()),
        GovernanceModule::Oversight => Evidence::Oversight(OversightEvidence::default()),
        GovernanceModule::DataGovernance => {
            Evidence::DataGovernance(DataGovernanceEvidence::default())
        }
        GovernanceModule::DataResidency => {
            Evidence::DataResidency(DataResidencyEvidence::default())
        }
        GovernanceModule::IsoCompliance => {
            Evidence::IsoCompliance(IsoComplianceEvidence::default())
        }
    }
}
