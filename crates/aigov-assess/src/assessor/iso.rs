//! ISO compliance against the standards applicable to a system.
//!
//! Applicability comes from metadata, not from what was submitted: an
//! applicable standard with no submitted category scores contributes 0.
//! Standards submitted but not applicable are ignored.

use std::collections::BTreeMap;

use aigov_core::{AISystem, DataSensitivity, GovernanceError, GovernanceModule};

use super::{check_evidence, finish, ModuleAssessor};
use crate::evidence::{Evidence, IsoStandard};
use crate::score::{Finding, ModuleScore, Severity};

const CATEGORY_GAP: f64 = 70.0;
const CATEGORY_GAP_HIGH: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct IsoComplianceAssessor {
    floor: f64,
}

impl IsoComplianceAssessor {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

/// Standards a system must conform to, in canonical order.
pub fn applicable_standards(system: &AISystem) -> Vec<IsoStandard> {
    let m = &system.metadata;
    let mut standards = vec![IsoStandard::Iec23053];
    if m.is_machine_learning() {
        standards.push(IsoStandard::Iec23901);
    }
    if m.data_sensitivity == DataSensitivity::High || m.handles_personal_data() {
        standards.push(IsoStandard::Iec27001);
    }
    if m.quality_management_declared {
        standards.push(IsoStandard::Iso9001);
    }
    standards
}

/// Maturity label for an overall ISO score.
pub fn maturity_label(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "optimized",
        s if s >= 75.0 => "managed",
        s if s >= 60.0 => "defined",
        s if s >= 40.0 => "developing",
        _ => "initial",
    }
}

fn mean(values: &BTreeMap<String, f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.values().sum::<f64>() / values.len() as f64
    }
}

impl ModuleAssessor for IsoComplianceAssessor {
    fn module(&self) -> GovernanceModule {
        GovernanceModule::IsoCompliance
    }

    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        check_evidence(self.module(), evidence)?;
        let Evidence::IsoCompliance(ev) = evidence else {
            return Err(GovernanceError::Validation("expected ISO compliance evidence".into()));
        };
        let mut findings = Vec::new();
        let mut components: Vec<(&str, f64)> = Vec::new();

        let applicable = applicable_standards(system);
        for standard in &applicable {
            let standard_score = match ev.standards.get(standard) {
                None => {
                    findings.push(Finding::new(
                        "standard_not_assessed",
                        Severity::High,
                        format!("{standard} applies but was not assessed"),
                    ));
                    0.0
                }
                Some(categories) => {
                    for (category, score) in categories {
                        if *score < CATEGORY_GAP {
                            let severity = if *score < CATEGORY_GAP_HIGH {
                                Severity::High
                            } else {
                                Severity::Medium
                            };
                            findings.push(Finding::new(
                                "category_gap",
                                severity,
                                format!("{standard} {category}: {score:.1} below {CATEGORY_GAP:.0}"),
                            ));
                        }
                    }
                    mean(categories)
                }
            };
            components.push((standard.as_str(), standard_score));
        }

        let raw = components.iter().map(|(_, s)| s).sum::<f64>() / components.len() as f64;
        findings.push(Finding::new(
            format!("maturity_{}", maturity_label(raw)),
            Severity::Info,
            format!("compliance maturity {}", maturity_label(raw)),
        ));

        finish(self.module(), self.floor, raw, &components, findings, evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessor::test_support::system;
    use crate::evidence::IsoComplianceEvidence;
    use aigov_core::DataCategory;

    fn categories(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_applicable_standards() {
        let sys = system("search", "rules", DataSensitivity::Low);
        assert_eq!(applicable_standards(&sys), vec![IsoStandard::Iec23053]);

        let mut sys = system("lending", "gradient boosting classifier", DataSensitivity::Medium);
        sys.metadata.data_categories = vec![DataCategory::Personal];
        sys.metadata.quality_management_declared = true;
        assert_eq!(
            applicable_standards(&sys),
            vec![
                IsoStandard::Iec23053,
                IsoStandard::Iec23901,
                IsoStandard::Iec27001,
                IsoStandard::Iso9001
            ]
        );
    }

    #[test]
    fn test_unassessed_applicable_standard_counts_zero() {
        let sys = system("search", "neural ranker", DataSensitivity::Low);
        let mut standards = BTreeMap::new();
        standards.insert(IsoStandard::Iec23053, categories(&[("governance", 90.0), ("risk", 80.0)]));
        let ev = Evidence::IsoCompliance(IsoComplianceEvidence { standards });
        let s = IsoComplianceAssessor::new(40.0).score(&sys, &ev).unwrap();
        // (85 + 0) / 2
        assert!((s.score.unwrap() - 42.5).abs() < 1e-9);
        assert!(s.findings.iter().any(|f| f.code == "standard_not_assessed"));
        assert!(s.findings.iter().any(|f| f.code == "maturity_developing"));
    }

    #[test]
    fn test_category_gaps() {
        let sys = system("search", "rules", DataSensitivity::Low);
        let mut standards = BTreeMap::new();
        standards.insert(
            IsoStandard::Iec23053,
            categories(&[("governance", 95.0), ("data", 65.0), ("lifecycle", 45.0)]),
        );
        // not applicable; ignored
        standards.insert(IsoStandard::Iso9001, categories(&[("qms", 10.0)]));
        let ev = Evidence::IsoCompliance(IsoComplianceEvidence { standards });
        let s = IsoComplianceAssessor::new(40.0).score(&sys, &ev).unwrap();
        assert!((s.score.unwrap() - 205.0 / 3.0).abs() < 1e-9);
        let gaps: Vec<_> = s.findings.iter().filter(|f| f.code == "category_gap").collect();
        assert_eq!(gaps.len(), 2);
        assert!(gaps.iter().any(|g| g.severity == Severity::High));
        assert!(gaps.iter().any(|g| g.severity == Severity::Medium));
    }

    #[test]
    fn test_maturity_bands() {
        assert_eq!(maturity_label(95.0), "optimized");
        assert_eq!(maturity_label(75.0), "managed");
        assert_eq!(maturity_label(60.0), "defined");
        assert_eq!(maturity_label(40.0), "developing");
        assert_eq!(maturity_label(39.9), "initial");
    }
}
