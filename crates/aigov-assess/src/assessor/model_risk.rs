//! Model risk: inherent-risk baseline, validation outcome and live
//! performance monitoring, equally weighted.

use aigov_core::{AISystem, GovernanceError, GovernanceModule, InherentRisk};

use super::{check_evidence, finish, ModuleAssessor};
use crate::evidence::{Evidence, LifecycleStage, PerformanceMetrics};
use crate::score::{Finding, ModuleScore, Severity};

const VALIDATION_PASS_MARK: f64 = 70.0;
const ACCURACY_ALERT: f64 = 0.8;
const PRECISION_ALERT: f64 = 0.7;
const DRIFT_ALERT: f64 = 0.3;
const MONITORED_SIGNALS: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct ModelRiskAssessor {
    floor: f64,
}

impl ModelRiskAssessor {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

fn baseline(risk: InherentRisk, stage: LifecycleStage) -> f64 {
    let base = match risk {
        InherentRisk::Low => 90.0,
        InherentRisk::Medium => 75.0,
        InherentRisk::High => 60.0,
        InherentRisk::Critical => 45.0,
    };
    let bonus = match stage {
        LifecycleStage::Production => 10.0,
        LifecycleStage::Validation => 5.0,
        _ => 0.0,
    };
    f64::min(base + bonus, 100.0)
}

fn monitoring(perf: Option<&PerformanceMetrics>, findings: &mut Vec<Finding>) -> f64 {
    let Some(perf) = perf else {
        findings.push(Finding::new(
            "monitoring_absent",
            Severity::Medium,
            "no performance metrics supplied",
        ));
        return 0.0;
    };

    let mut alerts = 0u32;
    if let Some(acc) = perf.accuracy.filter(|a| *a < ACCURACY_ALERT) {
        alerts += 1;
        findings.push(Finding::new(
            "accuracy_degraded",
            Severity::Medium,
            format!("accuracy {acc:.2} below {ACCURACY_ALERT}"),
        ));
    }
    if let Some(prec) = perf.precision.filter(|p| *p < PRECISION_ALERT) {
        alerts += 1;
        findings.push(Finding::new(
            "precision_degraded",
            Severity::Medium,
            format!("precision {prec:.2} below {PRECISION_ALERT}"),
        ));
    }
    if let Some(drift) = perf.data_drift.filter(|d| *d > DRIFT_ALERT) {
        alerts += 1;
        findings.push(Finding::new(
            "data_drift",
            Severity::Medium,
            format!("drift {drift:.2} above {DRIFT_ALERT}"),
        ));
    }
    f64::max(50.0, 100.0 - 50.0 * f64::from(alerts) / MONITORED_SIGNALS)
}

impl ModuleAssessor for ModelRiskAssessor {
    fn module(&self) -> GovernanceModule {
        GovernanceModule::ModelRisk
    }

    fn score(&self, system: &AISystem, evidence: &Evidence) -> Result<ModuleScore, GovernanceError> {
        check_evidence(self.module(), evidence)?;
        let Evidence::ModelRisk(ev) = evidence else {
            return Err(GovernanceError::Validation("expected model risk evidence".into()));
        };
        let validation_score = ev.validation_score.unwrap_or(0.0);

        let mut findings = Vec::new();
        let risk = baseline(system.inherent_risk, ev.lifecycle_stage);

        let pass_ratio = if ev.validations_performed == 0 {
            1.0
        } else {
            f64::from(ev.validations_passed) / f64::from(ev.validations_performed)
        };
        let validation = validation_score * pass_ratio;
        if validation_score < VALIDATION_PASS_MARK {
            findings.push(Finding::new(
                "validation_failed",
                Severity::High,
                format!("validation score {validation_score:.1} below {VALIDATION_PASS_MARK}"),
            ));
        }

        let monitoring = monitoring(ev.performance.as_ref(), &mut findings);

        let raw = (risk + validation + monitoring) / 3.0;
        finish(
            self.module(),
            self.floor,
            raw,
            &[("risk", risk), ("validation", validation), ("monitoring", monitoring)],
            findings,
            evidence,
        )
    }
}
