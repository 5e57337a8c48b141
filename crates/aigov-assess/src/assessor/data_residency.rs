//! Data residency: where data lives, how sovereign the arrangement is, and
//! whether cross-border transfers are safeguarded.
//!
//! Approved regions are the system's operating jurisdictions. A location
//! violates residency when it is restricted or, with a non-empty approved
//! list, not approved. Region names compare case-insensitively.

use std::collections::BTreeSet;

use aigov_core::{AISystem, GovernanceError, GovernanceModule};

use super::{check_evidence, finish, weighted, ModuleAssessor};
use crate::evidence::{Evidence, SovereigntyLevel};
use crate::score::{Finding, ModuleScore, Severity};

#[derive(Debug, Clone)]
pub struct DataResidencyAssessor {
    floor: f64,
}

impl DataResidencyAssessor {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

fn sovereignty_score(level: SovereigntyLevel) -> f64 {
    match level {
        SovereigntyLevel::Absolute => 90.0,
        SovereigntyLevel::Strict => 85.0,
        SovereigntyLevel::Basic => 80.0,
        SovereigntyLevel::Unrestricted => 95.0,
    }
}

fn normalize<'a>(regions: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    regions
        .into_iter()
        .map(|r| r.trim().to_ascii_uppercase())
        .collect()
}

impl ModuleAssessor for DataResidencyAssessor {
    fn module(&self) -> GovernanceModule {
        GovernanceModule::DataResidency
    }

    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        check_evidence(self.module(), evidence)?;
        let Evidence::DataResidency(ev) = evidence else {
            return Err(GovernanceError::Validation("expected data residency evidence".into()));
        };
        let mut findings = Vec::new();

        let approved = normalize(&system.metadata.jurisdictions);
        let restricted = normalize(&ev.restricted_regions);
        let locations = ev.locations();

        let location = if locations.is_empty() {
            findings.push(Finding::new(
                "locations_undeclared",
                Severity::Medium,
                "no storage or processing locations declared",
            ));
            50.0
        } else {
            let mut compliant = 0usize;
            for loc in &locations {
                let reason = if restricted.contains(loc) {
                    Some("restricted")
                } else if !approved.is_empty() && !approved.contains(loc) {
                    Some("not an approved jurisdiction")
                } else {
                    None
                };
                match reason {
                    Some(reason) => findings.push(Finding::new(
                        "residency_violation",
                        Severity::High,
                        format!("{loc}: {reason}"),
                    )),
                    None => compliant += 1,
                }
            }
            compliant as f64 / locations.len() as f64 * 100.0
        };

        let sovereignty = sovereignty_score(ev.sovereignty);

        let transfers = if ev.transfers.is_empty() {
            100.0
        } else {
            let mut safeguarded = 0usize;
            for t in &ev.transfers {
                if t.safeguarded {
                    safeguarded += 1;
                } else {
                    findings.push(Finding::new(
                        "unsafeguarded_transfer",
                        Severity::High,
                        format!("{} -> {}", t.from, t.to),
                    ));
                }
            }
            safeguarded as f64 / ev.transfers.len() as f64 * 100.0
        };

        let policy = if system.metadata.handles_sensitive_data() {
            80.0
        } else {
            90.0
        };

        let raw = weighted(&[
            ("location", location, 0.30),
            ("sovereignty", sovereignty, 0.30),
            ("transfers", transfers, 0.25),
            ("policy", policy, 0.15),
        ]);
        finish(
            self.module(),
            self.floor,
            raw,
            &[
                ("location", location),
                ("sovereignty", sovereignty),
                ("transfers", transfers),
                ("policy", policy),
            ],
            findings,
            evidence,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessor::test_support::system;
    use crate::evidence::{CrossBorderTransfer, DataResidencyEvidence};
    use aigov_core::{DataCategory, DataSensitivity};

    #[test]
    fn test_all_locations_approved() {
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec!["eu".into()]),
            processing_regions: vec!["UK".into()],
            sovereignty: SovereigntyLevel::Strict,
            ..DataResidencyEvidence::default()
        });
        let s = DataResidencyAssessor::new(40.0).score(&sys, &ev).unwrap();
        let expected = 100.0 * 0.30 + 85.0 * 0.30 + 100.0 * 0.25 + 90.0 * 0.15;
        assert!((s.score.unwrap() - expected).abs() < 1e-9);
        assert!(s.findings.is_empty());
    }

    #[test]
    fn test_restricted_and_unapproved_locations() {
        let mut sys = system("payments", "rules", DataSensitivity::Low);
        sys.metadata.data_categories = vec![DataCategory::Financial];
        let ev = Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec!["EU".into(), "US".into()]),
            processing_regions: vec!["UK".into(), "CN".into()],
            restricted_regions: vec!["UK".into()],
            transfers: vec![
                CrossBorderTransfer { from: "EU".into(), to: "US".into(), safeguarded: true },
                CrossBorderTransfer { from: "EU".into(), to: "CN".into(), safeguarded: false },
            ],
            sovereignty: SovereigntyLevel::Basic,
        });
        let s = DataResidencyAssessor::new(40.0).score(&sys, &ev).unwrap();
        // 1 of 4 compliant (EU): 25; transfers 50; policy 80
        assert_eq!(s.components["location"], 25.0);
        assert_eq!(s.components["transfers"], 50.0);
        assert_eq!(s.components["policy"], 80.0);
        let violations = s.findings.iter().filter(|f| f.code == "residency_violation").count();
        assert_eq!(violations, 3);
        assert!(s.findings.iter().any(|f| f.code == "unsafeguarded_transfer"));
    }

    #[test]
    fn test_no_locations_scores_fifty() {
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec![]),
            ..DataResidencyEvidence::default()
        });
        let s = DataResidencyAssessor::new(40.0).score(&sys, &ev).unwrap();
        assert_eq!(s.components["location"], 50.0);
        assert_eq!(s.components["sovereignty"], 95.0);
    }

    #[test]
    fn test_no_approved_list_only_restricted_violates() {
        let mut sys = system("search", "rules", DataSensitivity::Low);
        sys.metadata.jurisdictions.clear();
        let ev = Evidence::DataResidency(DataResidencyEvidence {
            storage_regions: Some(vec!["BR".into(), "RU".into()]),
            restricted_regions: vec!["RU".into()],
            ..DataResidencyEvidence::default()
        });
        let s = DataResidencyAssessor::new(40.0).score(&sys, &ev).unwrap();
        assert_eq!(s.components["location"], 50.0);
    }
}
