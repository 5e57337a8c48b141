//! Data governance: quality, lineage, privacy and retention.

use aigov_core::{AISystem, GovernanceError, GovernanceModule};

use super::{check_evidence, finish, weighted, ModuleAssessor};
use crate::evidence::{Evidence, LineageFlags};
use crate::score::{Finding, ModuleScore, Severity};

/// Per-dimension thresholds below which a quality issue is reported.
const QUALITY_THRESHOLDS: [(&str, f64); 4] = [
    ("completeness", 95.0),
    ("accuracy", 90.0),
    ("consistency", 85.0),
    ("timeliness", 80.0),
];

#[derive(Debug, Clone)]
pub struct DataGovernanceAssessor {
    floor: f64,
}

impl DataGovernanceAssessor {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

fn lineage_score(flags: &LineageFlags) -> f64 {
    let mut score = 0.0;
    if flags.data_flow_documented {
        score += 40.0;
    }
    if flags.transformations_documented {
        score += 30.0;
    }
    if flags.dependencies_documented {
        score += 30.0;
    }
    score
}

impl ModuleAssessor for DataGovernanceAssessor {
    fn module(&self) -> GovernanceModule {
        GovernanceModule::DataGovernance
    }

    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        check_evidence(self.module(), evidence)?;
        let Evidence::DataGovernance(ev) = evidence else {
            return Err(GovernanceError::Validation("expected data governance evidence".into()));
        };
        let (Some(quality_metrics), Some(lineage_flags)) = (ev.quality, ev.lineage) else {
            return Err(GovernanceError::InsufficientEvidence {
                module: self.module(),
                missing: vec!["quality".into(), "lineage".into()],
            });
        };
        let mut findings = Vec::new();

        let dims = quality_metrics.dimensions();
        let quality =
            dims.iter().map(|(_, v)| v.unwrap_or(0.0)).sum::<f64>() / dims.len() as f64;
        for (name, threshold) in QUALITY_THRESHOLDS {
            let value = dims
                .iter()
                .find(|(d, _)| *d == name)
                .and_then(|(_, v)| *v)
                .unwrap_or(0.0);
            if value < threshold {
                findings.push(Finding::new(
                    format!("{name}_below_threshold"),
                    Severity::Low,
                    format!("{name} {value:.1} below {threshold:.0}"),
                ));
            }
        }

        let lineage = lineage_score(&lineage_flags);
        if lineage < 100.0 {
            findings.push(Finding::new(
                "lineage_incomplete",
                Severity::Medium,
                format!("lineage documentation {lineage:.0}% complete"),
            ));
        }

        let privacy = match ev.privacy_score {
            Some(p) => p,
            None => {
                let severity = if system.metadata.handles_personal_data() {
                    Severity::High
                } else {
                    Severity::Medium
                };
                findings.push(Finding::new(
                    "privacy_unassessed",
                    severity,
                    "no privacy assessment supplied",
                ));
                0.0
            }
        };

        let retention = if ev.retention_policy {
            85.0
        } else {
            findings.push(Finding::new(
                "retention_policy_missing",
                Severity::Medium,
                "no data retention policy",
            ));
            30.0
        };

        let raw = weighted(&[
            ("quality", quality, 0.30),
            ("lineage", lineage, 0.25),
            ("privacy", privacy, 0.25),
            ("retention", retention, 0.20),
        ]);
        finish(
            self.module(),
            self.floor,
            raw,
            &[
                ("quality", quality),
                ("lineage", lineage),
                ("privacy", privacy),
                ("retention", retention),
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
    use crate::evidence::{DataGovernanceEvidence, QualityMetrics};
    use aigov_core::{DataCategory, DataSensitivity};

    fn quality(v: f64) -> QualityMetrics {
        QualityMetrics {
            completeness: Some(v),
            accuracy: Some(v),
            consistency: Some(v),
            timeliness: Some(v),
            validity: Some(v),
            uniqueness: Some(v),
        }
    }

    #[test]
    fn test_full_marks_except_retention_cap() {
        let sys = system("search", "rules", DataSensitivity::Low);
        let ev = Evidence::DataGovernance(DataGovernanceEvidence {
            quality: Some(quality(100.0)),
            lineage: Some(LineageFlags {
                data_flow_documented: true,
                transformations_documented: true,
                dependencies_documented: true,
            }),
            privacy_score: Some(100.0),
            retention_policy: true,
        });
        let s = DataGovernanceAssessor::new(40.0).score(&sys, &ev).unwrap();
        assert!((s.score.unwrap() - 97.0).abs() < 1e-9);
        assert!(s.findings.is_empty());
    }

    #[test]
    fn test_partial_lineage_and_missing_privacy() {
        let mut sys = system("search", "rules", DataSensitivity::Low);
        sys.metadata.data_categories = vec![DataCategory::Personal];
        let ev = Evidence::DataGovernance(DataGovernanceEvidence {
            quality: Some(quality(80.0)),
            lineage: Some(LineageFlags {
                data_flow_documented: true,
                ..LineageFlags::default()
            }),
            privacy_score: None,
            retention_policy: false,
        });
        let s = DataGovernanceAssessor::new(30.0).score(&sys, &ev).unwrap();
        // 80*.3 + 40*.25 + 0*.25 + 30*.2 = 40
        assert!((s.score.unwrap() - 40.0).abs() < 1e-9);
        let privacy = s.findings.iter().find(|f| f.code == "privacy_unassessed").unwrap();
        assert_eq!(privacy.severity, Severity::High);
        assert!(s.findings.iter().any(|f| f.code == "completeness_below_threshold"));
        assert!(!s.has_critical_finding());
    }

    #[test]
    fn test_lineage_weights() {
        let flags = LineageFlags {
            data_flow_documented: false,
            transformations_documented: true,
            dependencies_documented: true,
        };
        assert_eq!(lineage_score(&flags), 60.0);
    }
}
