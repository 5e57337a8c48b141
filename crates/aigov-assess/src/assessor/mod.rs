//! # Module Assessors
//!
//! One [`ModuleAssessor`] per governance module. Each turns an
//! [`AISystem`] plus that module's [`Evidence`] variant into a
//! [`ModuleScore`]. Assessors are pure: identical system metadata and
//! evidence always produce an identical score, findings and digest.
//!
//! [`AssessorSet`] holds one assessor per module and dispatches on the
//! evidence variant. The standard set is built from configuration
//! (evidence floors); individual assessors can be replaced.

mod data_governance;
mod data_residency;
mod iso;
mod model_risk;
mod oversight;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use aigov_core::{AISystem, GovernanceConfig, GovernanceError, GovernanceModule};

use crate::evidence::Evidence;
use crate::score::{Finding, ModuleScore, Severity, CRITICAL_FINDING};

pub use data_governance::DataGovernanceAssessor;
pub use data_residency::DataResidencyAssessor;
pub use iso::{applicable_standards, maturity_label, IsoComplianceAssessor};
pub use model_risk::ModelRiskAssessor;
pub use oversight::{OversightAssessor, OversightLevel};

/// Scores one governance dimension.
pub trait ModuleAssessor: Send + Sync + fmt::Debug {
    /// The module this assessor handles.
    fn module(&self) -> GovernanceModule;

    /// Score `evidence` for `system`.
    ///
    /// Errors with `Validation` when the evidence belongs to another module
    /// or is malformed, and with `InsufficientEvidence` when mandatory
    /// fields are absent.
    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError>;
}

/// Boundary checks shared by every assessor.
pub(crate) fn check_evidence(
    module: GovernanceModule,
    evidence: &Evidence,
) -> Result<(), GovernanceError> {
    if evidence.module() != module {
        return Err(GovernanceError::Validation(format!(
            "{} evidence submitted to the {module} assessor",
            evidence.module()
        )));
    }
    evidence.validate()?;
    let missing = evidence.missing_fields();
    if !missing.is_empty() {
        return Err(GovernanceError::InsufficientEvidence { module, missing });
    }
    Ok(())
}

/// Weighted sum of `(name, score, weight)` components.
pub(crate) fn weighted(components: &[(&str, f64, f64)]) -> f64 {
    components.iter().map(|(_, score, weight)| score * weight).sum()
}

/// Clamp, apply the evidence floor, and attach the evidence digest.
pub(crate) fn finish(
    module: GovernanceModule,
    floor: f64,
    raw: f64,
    components: &[(&str, f64)],
    mut findings: Vec<Finding>,
    evidence: &Evidence,
) -> Result<ModuleScore, GovernanceError> {
    let score = if raw.is_finite() { raw.clamp(0.0, 100.0) } else { 0.0 };
    if score < floor {
        findings.push(Finding::new(
            CRITICAL_FINDING,
            Severity::Critical,
            format!("{} score {score:.1} is below the floor of {floor:.1}", module.title()),
        ));
    }
    Ok(ModuleScore {
        module,
        score: Some(score),
        components: components
            .iter()
            .map(|(name, value)| (name.to_string(), value.clamp(0.0, 100.0)))
            .collect(),
        findings,
        evidence_digest: Some(evidence.digest()?),
    })
}

// ─── AssessorSet ────────────────────────────────────────────────────

/// One assessor per governance module.
#[derive(Debug, Clone)]
pub struct AssessorSet {
    assessors: BTreeMap<GovernanceModule, Arc<dyn ModuleAssessor>>,
}

impl AssessorSet {
    /// The five built-in assessors, with floors from `config`.
    pub fn standard(config: &GovernanceConfig) -> Self {
        let floor = |m| config.evidence_floor(m);
        let mut assessors: BTreeMap<GovernanceModule, Arc<dyn ModuleAssessor>> = BTreeMap::new();
        for module in GovernanceModule::all() {
            let assessor: Arc<dyn ModuleAssessor> = match module {
                GovernanceModule::ModelRisk => Arc::new(ModelRiskAssessor::new(floor(*module))),
                GovernanceModule::Oversight => Arc::new(OversightAssessor::new(floor(*module))),
                GovernanceModule::DataGovernance => {
                    Arc::new(DataGovernanceAssessor::new(floor(*module)))
                }
                GovernanceModule::DataResidency => {
                    Arc::new(DataResidencyAssessor::new(floor(*module)))
                }
                GovernanceModule::IsoCompliance => {
                    Arc::new(IsoComplianceAssessor::new(floor(*module)))
                }
            };
            assessors.insert(*module, assessor);
        }
        Self { assessors }
    }

    /// Replace the assessor for its module.
    pub fn with_assessor(mut self, assessor: Arc<dyn ModuleAssessor>) -> Self {
        self.assessors.insert(assessor.module(), assessor);
        self
    }

    pub fn get(&self, module: GovernanceModule) -> Option<&Arc<dyn ModuleAssessor>> {
        self.assessors.get(&module)
    }

    /// Score `evidence` with the assessor for `module`.
    pub fn score(
        &self,
        system: &AISystem,
        module: GovernanceModule,
        evidence: &Evidence,
    ) -> Result<ModuleScore, GovernanceError> {
        let assessor = self.assessors.get(&module).ok_or_else(|| GovernanceError::NotFound {
            kind: "assessor",
            id: module.to_string(),
        })?;
        let result = assessor.score(system, evidence)?;
        tracing::debug!(
            system_id = %system.id(),
            module = %module,
            score = ?result.score,
            findings = result.findings.len(),
            "module scored"
        );
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::system;
    use super::*;
    use crate::evidence::{ModelRiskEvidence, OversightEvidence};
    use aigov_core::DataSensitivity;

    #[test]
    fn test_wrong_variant_is_validation_error() {
        let set = AssessorSet::standard(&GovernanceConfig::default());
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::Oversight(OversightEvidence {
            decisions_logged: Some(1),
            ..OversightEvidence::default()
        });
        let err = set.score(&sys, GovernanceModule::ModelRisk, &ev).unwrap_err();
        assert!(matches!(err, GovernanceError::Validation(_)));
    }

    #[test]
    fn test_missing_fields_are_insufficient() {
        let set = AssessorSet::standard(&GovernanceConfig::default());
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::ModelRisk(ModelRiskEvidence::default());
        let err = set.score(&sys, GovernanceModule::ModelRisk, &ev).unwrap_err();
        match err {
            GovernanceError::InsufficientEvidence { module, missing } => {
                assert_eq!(module, GovernanceModule::ModelRisk);
                assert_eq!(missing, vec!["validation_score".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_standard_set_covers_every_module() {
        let set = AssessorSet::standard(&GovernanceConfig::default());
        for module in GovernanceModule::all() {
            assert_eq!(set.get(*module).map(|a| a.module()), Some(*module));
        }
    }

    #[test]
    fn test_floor_attaches_critical_finding() {
        let ev = Evidence::ModelRisk(ModelRiskEvidence {
            validation_score: Some(10.0),
            ..ModelRiskEvidence::default()
        });
        let score = finish(GovernanceModule::ModelRisk, 40.0, 35.0, &[], vec![], &ev).unwrap();
        assert!(score.has_critical_finding());
        assert_eq!(score.findings.last().map(|f| f.code.as_str()), Some(CRITICAL_FINDING));

        let score = finish(GovernanceModule::ModelRisk, 40.0, 140.0, &[], vec![], &ev).unwrap();
        assert_eq!(score.score, Some(100.0));
        assert!(!score.has_critical_finding());
    }

    #[derive(Debug)]
    struct FixedAssessor;

    impl ModuleAssessor for FixedAssessor {
        fn module(&self) -> GovernanceModule {
            GovernanceModule::Oversight
        }

        fn score(&self, _system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
            finish(GovernanceModule::Oversight, 0.0, 77.0, &[], vec![], evidence)
        }
    }

    #[test]
    fn test_with_assessor_replaces_module() {
        let set = AssessorSet::standard(&GovernanceConfig::default())
            .with_assessor(Arc::new(FixedAssessor));
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::Oversight(OversightEvidence::default());
        let score = set.score(&sys, GovernanceModule::Oversight, &ev).unwrap();
        assert_eq!(score.score, Some(77.0));
    }
}
