//! # Assess Subcommand
//!
//! Registers the system described by `--system`, submits every evidence
//! document from `--evidence`, aggregates, and prints a JSON report.
//! Modules with insufficient evidence are reported and aggregated as
//! flagged zeros; any other rejected input fails the run with exit code 1.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use aigov_assess::{AssessmentResult, Evidence, ModuleScore};
use aigov_core::{GovernanceError, GovernanceModule, InherentRisk, SystemId, SystemMetadata};
use aigov_service::GovernanceService;

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// System metadata document (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub system: PathBuf,

    /// Evidence document: a list of evidence entries tagged by `module`.
    #[arg(long, value_name = "FILE")]
    pub evidence: PathBuf,

    /// Start an escalation workflow if the result warrants one.
    #[arg(long)]
    pub route: bool,
}

#[derive(Debug, Serialize)]
pub struct AssessmentReport {
    pub system_id: SystemId,
    pub inherent_risk: InherentRisk,
    pub requirements: Vec<&'static str>,
    pub module_scores: Vec<ModuleScore>,
    pub insufficient: Vec<InsufficientModule>,
    pub assessment: AssessmentResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_workflow: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsufficientModule {
    pub module: GovernanceModule,
    pub missing: Vec<String>,
}

pub fn run_assess(args: &AssessArgs, config: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config)?;
    let metadata: SystemMetadata = crate::read_document(&args.system)?;
    let evidence: Vec<Evidence> = crate::read_document(&args.evidence)?;
    let service = GovernanceService::new(config)?;

    match assess(&service, metadata, &evidence, args.route) {
        Ok(report) => {
            crate::print_json(&report)?;
            Ok(0)
        }
        Err(e) if is_input_error(&e) => {
            eprintln!("assessment rejected: {e}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_input_error(e: &GovernanceError) -> bool {
    matches!(
        e,
        GovernanceError::Validation(_) | GovernanceError::DuplicateSystem(_)
    )
}

/// Run one system through registration, scoring and aggregation.
pub fn assess(
    service: &GovernanceService,
    metadata: SystemMetadata,
    evidence: &[Evidence],
    route: bool,
) -> Result<AssessmentReport, GovernanceError> {
    let system_id = service.register_system(metadata)?;
    let system = service.get_system(&system_id)?;

    let mut module_scores = Vec::new();
    let mut insufficient = Vec::new();
    for ev in evidence {
        match service.submit_evidence(&system_id, ev.module(), ev) {
            Ok(score) => module_scores.push(score),
            Err(GovernanceError::InsufficientEvidence { module, missing }) => {
                insufficient.push(InsufficientModule { module, missing });
            }
            Err(e) => return Err(e),
        }
    }

    let assessment = service.run_assessment(&system_id)?;
    let escalation_workflow = if route {
        service
            .route_assessment(&system_id)?
            .map(|id| id.to_string())
    } else {
        None
    };

    Ok(AssessmentReport {
        system_id,
        inherent_risk: system.inherent_risk,
        requirements: system.requirements(),
        module_scores,
        insufficient,
        assessment,
        escalation_workflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aigov_core::{GovernanceConfig, GovernanceLevel};

    fn service() -> GovernanceService {
        GovernanceService::new(GovernanceConfig::default()).unwrap()
    }

    fn demo_inputs() -> (SystemMetadata, Vec<Evidence>) {
        let dir = crate::demos_dir();
        (
            crate::read_document(&dir.join("system.yaml")).unwrap(),
            crate::read_document(&dir.join("evidence.yaml")).unwrap(),
        )
    }

    #[test]
    fn test_demo_inputs_assess_cleanly() {
        let (metadata, evidence) = demo_inputs();
        let report = assess(&service(), metadata, &evidence, true).unwrap();
        assert_eq!(report.module_scores.len(), 5);
        assert!(report.insufficient.is_empty());
        assert!(!report.assessment.capped);
        assert!(report.assessment.level <= GovernanceLevel::Moderate);
        assert!(report.escalation_workflow.is_none());
    }

    #[test]
    fn test_insufficient_module_is_reported_not_fatal() {
        let (metadata, mut evidence) = demo_inputs();
        evidence.retain(|e| e.module() != GovernanceModule::Oversight);
        evidence.push(Evidence::Oversight(Default::default()));

        let report = assess(&service(), metadata, &evidence, true).unwrap();
        assert_eq!(report.insufficient.len(), 1);
        assert_eq!(report.insufficient[0].module, GovernanceModule::Oversight);
        assert!(report.assessment.capped || report.assessment.overall_score <= 60.0);
    }

    #[test]
    fn test_invalid_metadata_is_an_input_error() {
        let (mut metadata, evidence) = demo_inputs();
        metadata.name = "  ".into();
        let err = assess(&service(), metadata, &evidence, false).unwrap_err();
        assert!(is_input_error(&err));
    }
}
