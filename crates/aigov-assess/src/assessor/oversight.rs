//! Human oversight: monitoring intensity, audit cadence, decision
//! transparency and escalation readiness.

use serde::{Deserialize, Serialize};

use aigov_core::{AISystem, GovernanceError, GovernanceModule, InherentRisk};

use super::{check_evidence, finish, weighted, ModuleAssessor};
use crate::evidence::Evidence;
use crate::score::{Finding, ModuleScore, Severity};

const AUDIT_STALE_DAYS: u32 = 7;
const TRANSPARENCY_WARN: f64 = 50.0;

/// Required oversight intensity, derived from inherent risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OversightLevel {
    Basic,
    Enhanced,
    Comprehensive,
}

impl OversightLevel {
    pub fn for_risk(risk: InherentRisk) -> Self {
        match risk {
            InherentRisk::High | InherentRisk::Critical => Self::Comprehensive,
            InherentRisk::Medium => Self::Enhanced,
            InherentRisk::Low => Self::Basic,
        }
    }

    /// Monitoring component: more demanding regimes start lower.
    fn monitoring_score(self) -> f64 {
        match self {
            Self::Basic => 80.0,
            Self::Enhanced => 70.0,
            Self::Comprehensive => 60.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OversightAssessor {
    floor: f64,
}

impl OversightAssessor {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

impl ModuleAssessor for OversightAssessor {
    fn module(&self) -> GovernanceModule {
        GovernanceModule::Oversight
    }

    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        check_evidence(self.module(), evidence)?;
        let Evidence::Oversight(ev) = evidence else {
            return Err(GovernanceError::Validation("expected oversight evidence".into()));
        };
        let mut findings = Vec::new();

        let monitoring = OversightLevel::for_risk(system.inherent_risk).monitoring_score();

        let audit = match ev.days_since_last_audit {
            None => {
                findings.push(Finding::new(
                    "audit_absent",
                    Severity::High,
                    "no audit event recorded",
                ));
                0.0
            }
            Some(days) if days > AUDIT_STALE_DAYS => {
                findings.push(Finding::new(
                    "audit_stale",
                    Severity::Medium,
                    format!("last audit {days} days ago"),
                ));
                40.0
            }
            Some(_) => 90.0,
        };

        let logged = ev.decisions_logged.unwrap_or(0);
        let transparency = if logged == 0 {
            0.0
        } else {
            ev.decisions_explained as f64 / logged as f64 * 100.0
        };
        if transparency < TRANSPARENCY_WARN {
            findings.push(Finding::new(
                "low_transparency",
                Severity::Medium,
                format!("{} of {logged} decisions explained", ev.decisions_explained),
            ));
        }

        let escalation = if ev.escalation_procedure_documented {
            85.0
        } else {
            findings.push(Finding::new(
                "escalation_undocumented",
                Severity::Medium,
                "no documented escalation procedure",
            ));
            40.0
        };

        let raw = weighted(&[
            ("monitoring", monitoring, 0.30),
            ("audit", audit, 0.25),
            ("transparency", transparency, 0.25),
            ("escalation", escalation, 0.20),
        ]);
        finish(
            self.module(),
            self.floor,
            raw,
            &[
                ("monitoring", monitoring),
                ("audit", audit),
                ("transparency", transparency),
                ("escalation", escalation),
            ],
            findings,
            evidence,
        )
    }
}
