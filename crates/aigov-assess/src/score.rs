//! # Module Scores and Findings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use aigov_core::{EvidenceDigest, GovernanceModule};

/// Finding code attached when a module scores below its evidence floor.
pub const CRITICAL_FINDING: &str = "critical_finding";

/// Finding code attached when mandatory evidence is missing.
pub const INSUFFICIENT_EVIDENCE: &str = "insufficient_evidence";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Finding {
    pub fn new(code: impl Into<String>, severity: Severity, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            detail: detail.into(),
        }
    }
}

/// Result of scoring one governance module for one system in one run.
///
/// `score` is `None` when mandatory evidence was missing; such a score still
/// takes part in aggregation as 0 with the insufficient flag raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleScore {
    pub module: GovernanceModule,
    pub score: Option<f64>,
    /// Named sub-scores that produced `score`, each in [0,100].
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_digest: Option<EvidenceDigest>,
}

impl ModuleScore {
    /// A score for a module whose evidence lacked `missing` fields, or was
    /// never submitted at all (`missing` empty).
    pub fn insufficient(
        module: GovernanceModule,
        missing: &[String],
        evidence_digest: Option<EvidenceDigest>,
    ) -> Self {
        let detail = if missing.is_empty() {
            "no evidence submitted".to_string()
        } else {
            format!("missing: {}", missing.join(", "))
        };
        Self {
            module,
            score: None,
            components: BTreeMap::new(),
            findings: vec![Finding::new(INSUFFICIENT_EVIDENCE, Severity::High, detail)],
            evidence_digest,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.score.is_none()
    }

    /// The value used in aggregation: the score, or 0 when undefined or
    /// non-finite.
    pub fn effective_score(&self) -> f64 {
        match self.score {
            Some(s) if s.is_finite() => s.clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    pub fn has_critical_finding(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Critical)
    }

    pub fn worst_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_has_no_score_and_flags() {
        let s = ModuleScore::insufficient(
            GovernanceModule::Oversight,
            &["decisions_logged".to_string()],
            None,
        );
        assert!(s.is_insufficient());
        assert_eq!(s.effective_score(), 0.0);
        assert_eq!(s.findings[0].code, INSUFFICIENT_EVIDENCE);
        assert!(s.findings[0].detail.contains("decisions_logged"));
    }

    #[test]
    fn test_effective_score_clamps_non_finite() {
        let mut s = ModuleScore::insufficient(GovernanceModule::ModelRisk, &[], None);
        s.score = Some(f64::NAN);
        assert_eq!(s.effective_score(), 0.0);
        s.score = Some(140.0);
        assert_eq!(s.effective_score(), 100.0);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Info < Severity::Low);
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }
}
