//! # Demo Subcommand
//!
//! Runs two systems through the whole lifecycle in an in-process service:
//! a well-governed one that is approved and closed, and a poorly governed
//! one that is escalated, rejected, and routed to an escalation workflow.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use aigov_assess::{
    AssessmentResult, CrossBorderTransfer, DataGovernanceEvidence, DataResidencyEvidence,
    Evidence, IsoComplianceEvidence, IsoStandard, LifecycleStage, LineageFlags,
    ModelRiskEvidence, OversightEvidence, PerformanceMetrics, QualityMetrics, SovereigntyLevel,
};
use aigov_core::{
    ActorId, DataCategory, DataSensitivity, GovernanceError, SystemMetadata, WorkflowType,
};
use aigov_service::{DashboardSummary, GovernanceService};
use aigov_workflow::{
    Decision, DecisionSource, ThresholdDecisionSource, TransitionPayload, WorkflowEvent,
    WorkflowInstance,
};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print only the dashboard summary.
    #[arg(long)]
    pub dashboard_only: bool,
}

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub assessments: Vec<AssessmentResult>,
    pub workflows: Vec<WorkflowInstance>,
    pub dashboard: DashboardSummary,
}

pub fn run_demo(args: &DemoArgs, config: Option<&Path>) -> Result<u8> {
    let service = GovernanceService::new(crate::load_config(config)?)?;
    let report = run_scenario(&service)?;
    if args.dashboard_only {
        crate::print_json(&report.dashboard)?;
    } else {
        crate::print_json(&report)?;
    }
    Ok(0)
}

pub fn run_scenario(service: &GovernanceService) -> Result<DemoReport, GovernanceError> {
    let committee = ActorId::new("governance-committee")?;
    let payload = || TransitionPayload::new(committee.clone());
    let mut assessments = Vec::new();
    let mut workflows = Vec::new();

    // Well governed: approved on its score.
    let strong = service.register_system(fraud_screening())?;
    for ev in strong_evidence() {
        service.submit_evidence(&strong, ev.module(), &ev)?;
    }
    let result = service.run_assessment(&strong)?;
    let wf = service.initiate_workflow(
        &strong,
        WorkflowType::ComplianceAssessment,
        committee.clone(),
    )?;
    service.advance_workflow(&wf, WorkflowEvent::Start, payload())?;
    let reviewer = ThresholdDecisionSource::new(service.config().approval_threshold);
    service.advance_workflow(
        &wf,
        reviewer.decision_event(&result),
        payload().with_note("decided on the latest assessment"),
    )?;
    service.advance_workflow(&wf, WorkflowEvent::Close, payload())?;
    workflows.push(service.get_workflow(&wf)?);
    assessments.push(result);

    // Poorly governed: escalated, then rejected by the committee.
    let weak = service.register_system(pricing_engine())?;
    for ev in weak_evidence() {
        match service.submit_evidence(&weak, ev.module(), &ev) {
            Ok(_) | Err(GovernanceError::InsufficientEvidence { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    let result = service.run_assessment(&weak)?;
    let wf = service.initiate_workflow(
        &weak,
        WorkflowType::ComplianceAssessment,
        committee.clone(),
    )?;
    service.advance_workflow(&wf, WorkflowEvent::Start, payload())?;
    service.advance_workflow(&wf, WorkflowEvent::Escalate, payload())?;
    service.advance_workflow(
        &wf,
        WorkflowEvent::Resolve { outcome: Decision::Reject },
        payload().with_note("controls insufficient for production use"),
    )?;
    workflows.push(service.get_workflow(&wf)?);
    if let Some(routed) = service.route_assessment(&weak)? {
        workflows.push(service.get_workflow(&routed)?);
    }
    assessments.push(result);

    Ok(DemoReport {
        assessments,
        workflows,
        dashboard: service.dashboard()?,
    })
}

// ─── Fixtures ───────────────────────────────────────────────────────

fn fraud_screening() -> SystemMetadata {
    SystemMetadata {
        name: "Card fraud screening".into(),
        use_case: "fraud detection".into(),
        model_type: "logistic regression".into(),
        data_sensitivity: DataSensitivity::Medium,
        jurisdictions: vec!["EU".into()],
        data_categories: vec![DataCategory::Operational],
        risk_factors: Vec::new(),
        quality_management_declared: false,
    }
}

fn pricing_engine() -> SystemMetadata {
    SystemMetadata {
        name: "Dynamic pricing engine".into(),
        use_case: "pricing optimisation".into(),
        model_type: "deep neural network".into(),
        data_sensitivity: DataSensitivity::High,
        jurisdictions: vec!["EU".into()],
        data_categories: vec![DataCategory::Financial, DataCategory::Behavioral],
        risk_factors: vec!["customer-facing price discrimination".into()],
        quality_management_declared: false,
    }
}

fn categories(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn strong_evidence() -> Vec<Evidence> {
    vec![
        Evidence::ModelRisk(ModelRiskEvidence {
            validation_score: Some(92.0),
            validations_performed: 12,
            validations_passed: 12,
            lifecycle_stage: LifecycleStage::Production,
            performance: Some(PerformanceMetrics {
                accuracy: Some(0.94),
                precision: Some(0.88),
                data_drift: Some(0.04),
            }),
        }),
        Evidence::Oversight(OversightEvidence {
            decisions_logged: Some(20_000),
            decisions_explained: 19_500,
            days_since_last_audit: Some(1),
            escalation_procedure_documented: true,
        }),
        Evidence::DataGovernance(DataGovernanceEvidence {
            quality: Some(QualityMetrics {
                completeness: Some(99.0),
                accuracy: Some(97.0),
                consistency: Some(95.0),
                timeliness: Some(93.0),
                validity: Some(98.0),
                uniqueness: Some(99.5),
            }),
            lineage: Some(LineageFlags {
                data_flow_documented: true,
                transformations_documented: true,
                dependencies_documented: true,
            }),
            privacy_score: Some(90.0),
            retention_policy: true,
        }),
        Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec!["EU".into()]),
            processing_regions: vec!["EU".into()],
            restricted_regions: Vec::new(),
            transfers: Vec::new(),
            sovereignty: SovereigntyLevel::Strict,
        }),
        Evidence::IsoCompliance(IsoComplianceEvidence {
            standards: [
                (
                    IsoStandard::Iec23053,
                    categories(&[("framework", 92.0), ("lifecycle", 90.0)]),
                ),
                (
                    IsoStandard::Iec23901,
                    categories(&[("governance", 91.0), ("risk", 89.0)]),
                ),
            ]
            .into_iter()
            .collect(),
        }),
    ]
}

fn weak_evidence() -> Vec<Evidence> {
    vec![
        Evidence::ModelRisk(ModelRiskEvidence {
            validation_score: Some(55.0),
            validations_performed: 4,
            validations_passed: 2,
            lifecycle_stage: LifecycleStage::Development,
            performance: None,
        }),
        Evidence::Oversight(OversightEvidence {
            decisions_logged: Some(800),
            decisions_explained: 100,
            days_since_last_audit: None,
            escalation_procedure_documented: false,
        }),
        Evidence::DataGovernance(DataGovernanceEvidence {
            quality: Some(QualityMetrics {
                completeness: Some(71.0),
                accuracy: Some(64.0),
                consistency: Some(58.0),
                timeliness: Some(60.0),
                validity: Some(66.0),
                uniqueness: Some(80.0),
            }),
            lineage: Some(LineageFlags {
                data_flow_documented: true,
                ..LineageFlags::default()
            }),
            privacy_score: None,
            retention_policy: false,
        }),
        Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec!["EU".into(), "US".into()]),
            processing_regions: Vec::new(),
            restricted_regions: vec!["US".into()],
            transfers: vec![CrossBorderTransfer {
                from: "EU".into(),
                to: "US".into(),
                safeguarded: false,
            }],
            sovereignty: SovereigntyLevel::Basic,
        }),
        // ISO evidence never arrived for this system.
        Evidence::IsoCompliance(IsoComplianceEvidence::default()),
    ]
}
