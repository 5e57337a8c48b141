//! # Evidence Payloads
//!
//! Evidence is a closed set of variants, one per governance module. The
//! serialized form is internally tagged by `module`:
//!
//! ```json
//! { "module": "model_risk", "validation_score": 86.0, "lifecycle_stage": "PRODUCTION" }
//! ```
//!
//! Two checks run at the boundary before any scoring:
//!
//! - [`Evidence::validate`] rejects malformed values (a percentage above
//!   100, more passed validations than performed). That is a plain
//!   `Validation` error and nothing is recorded.
//! - [`Evidence::missing_fields`] lists absent mandatory fields. Missing
//!   fields make the evidence insufficient: the module is recorded with an
//!   undefined score.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use aigov_core::{EvidenceDigest, GovernanceError, GovernanceModule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum Evidence {
    ModelRisk(ModelRiskEvidence),
    Oversight(OversightEvidence),
    DataGovernance(DataGovernanceEvidence),
    DataResidency(DataResidencyEvidence),
    IsoCompliance(IsoComplianceEvidence),
}

impl Evidence {
    /// The module this evidence belongs to.
    pub fn module(&self) -> GovernanceModule {
        match self {
            Self::ModelRisk(_) => GovernanceModule::ModelRisk,
            Self::Oversight(_) => GovernanceModule::Oversight,
            Self::DataGovernance(_) => GovernanceModule::DataGovernance,
            Self::DataResidency(_) => GovernanceModule::DataResidency,
            Self::IsoCompliance(_) => GovernanceModule::IsoCompliance,
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        match self {
            Self::ModelRisk(e) => e.validate(),
            Self::Oversight(e) => e.validate(),
            Self::DataGovernance(e) => e.validate(),
            Self::DataResidency(e) => e.validate(),
            Self::IsoCompliance(e) => e.validate(),
        }
    }

    pub fn missing_fields(&self) -> Vec<String> {
        let missing = match self {
            Self::ModelRisk(e) => e.missing_fields(),
            Self::Oversight(e) => e.missing_fields(),
            Self::DataGovernance(e) => e.missing_fields(),
            Self::DataResidency(e) => e.missing_fields(),
            Self::IsoCompliance(e) => e.missing_fields(),
        };
        missing.into_iter().map(str::to_string).collect()
    }

    pub fn digest(&self) -> Result<EvidenceDigest, GovernanceError> {
        EvidenceDigest::of(self)
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), GovernanceError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(GovernanceError::Validation(format!(
            "`{field}` must be in [0,100], got {value}"
        )))
    }
}

fn check_ratio(field: &str, value: f64) -> Result<(), GovernanceError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GovernanceError::Validation(format!(
            "`{field}` must be in [0,1], got {value}"
        )))
    }
}

// ─── Model risk ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    #[default]
    Development,
    Validation,
    Production,
    Monitoring,
    Retired,
}

/// Observed model performance. Accuracy and precision are fractions;
/// drift is a normalized drift statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceMetrics {
    pub accuracy: Option<f64>,
    pub precision: Option<f64>,
    pub data_drift: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ModelRiskEvidence {
    /// Outcome of the latest model validation, 0–100. Mandatory.
    pub validation_score: Option<f64>,
    pub validations_performed: u32,
    pub validations_passed: u32,
    pub lifecycle_stage: LifecycleStage,
    pub performance: Option<PerformanceMetrics>,
}

impl ModelRiskEvidence {
    fn validate(&self) -> Result<(), GovernanceError> {
        if let Some(v) = self.validation_score {
            check_percent("validation_score", v)?;
        }
        if self.validations_passed > self.validations_performed {
            return Err(GovernanceError::Validation(format!(
                "`validations_passed` ({}) exceeds `validations_performed` ({})",
                self.validations_passed, self.validations_performed
            )));
        }
        if let Some(p) = &self.performance {
            if let Some(v) = p.accuracy {
                check_ratio("performance.accuracy", v)?;
            }
            if let Some(v) = p.precision {
                check_ratio("performance.precision", v)?;
            }
            if let Some(v) = p.data_drift {
                check_ratio("performance.data_drift", v)?;
            }
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.validation_score.is_none() {
            missing.push("validation_score");
        }
        missing
    }
}

// ─── Oversight ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OversightEvidence {
    /// Automated decisions recorded in the decision log. Mandatory.
    pub decisions_logged: Option<u64>,
    pub decisions_explained: u64,
    /// `None` when no audit event has ever been recorded.
    pub days_since_last_audit: Option<u32>,
    pub escalation_procedure_documented: bool,
}

impl OversightEvidence {
    fn validate(&self) -> Result<(), GovernanceError> {
        if let Some(logged) = self.decisions_logged {
            if self.decisions_explained > logged {
                return Err(GovernanceError::Validation(format!(
                    "`decisions_explained` ({}) exceeds `decisions_logged` ({logged})",
                    self.decisions_explained
                )));
            }
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.decisions_logged.is_none() {
            missing.push("decisions_logged");
        }
        missing
    }
}

// ─── Data governance ────────────────────────────────────────────────

/// Data quality over six dimensions, each 0–100. All six are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct QualityMetrics {
    pub completeness: Option<f64>,
    pub accuracy: Option<f64>,
    pub consistency: Option<f64>,
    pub timeliness: Option<f64>,
    pub validity: Option<f64>,
    pub uniqueness: Option<f64>,
}

const QUALITY_FIELDS: [&str; 6] = [
    "quality.completeness",
    "quality.accuracy",
    "quality.consistency",
    "quality.timeliness",
    "quality.validity",
    "quality.uniqueness",
];

impl QualityMetrics {
    pub(crate) fn dimensions(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("completeness", self.completeness),
            ("accuracy", self.accuracy),
            ("consistency", self.consistency),
            ("timeliness", self.timeliness),
            ("validity", self.validity),
            ("uniqueness", self.uniqueness),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LineageFlags {
    pub data_flow_documented: bool,
    pub transformations_documented: bool,
    pub dependencies_documented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DataGovernanceEvidence {
    pub quality: Option<QualityMetrics>,
    pub lineage: Option<LineageFlags>,
    pub privacy_score: Option<f64>,
    pub retention_policy: bool,
}

impl DataGovernanceEvidence {
    fn validate(&self) -> Result<(), GovernanceError> {
        if let Some(q) = &self.quality {
            for (name, value) in q.dimensions() {
                if let Some(v) = value {
                    check_percent(&format!("quality.{name}"), v)?;
                }
            }
        }
        if let Some(v) = self.privacy_score {
            check_percent("privacy_score", v)?;
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match &self.quality {
            None => missing.push("quality"),
            Some(q) => missing.extend(
                q.dimensions()
                    .iter()
                    .zip(QUALITY_FIELDS)
                    .filter(|((_, value), _)| value.is_none())
                    .map(|(_, field)| field),
            ),
        }
        if self.lineage.is_none() {
            missing.push("lineage");
        }
        missing
    }
}

// ─── Data residency ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SovereigntyLevel {
    Absolute,
    Strict,
    Basic,
    /// No sovereignty constraints declared.
    #[default]
    #[serde(rename = "NONE")]
    Unrestricted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossBorderTransfer {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub safeguarded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DataResidencyEvidence {
    /// Regions where data is stored. Mandatory (may be empty).
    pub storage_regions: Option<Vec<String>>,
    pub processing_regions: Vec<String>,
    pub restricted_regions: Vec<String>,
    pub transfers: Vec<CrossBorderTransfer>,
    pub sovereignty: SovereigntyLevel,
}

impl DataResidencyEvidence {
    fn validate(&self) -> Result<(), GovernanceError> {
        let regions = self
            .storage_regions
            .iter()
            .flatten()
            .chain(&self.processing_regions)
            .chain(&self.restricted_regions);
        for region in regions {
            if region.trim().is_empty() {
                return Err(GovernanceError::Validation(
                    "region names must not be empty".to_string(),
                ));
            }
        }
        for t in &self.transfers {
            if t.from.trim().is_empty() || t.to.trim().is_empty() {
                return Err(GovernanceError::Validation(
                    "cross-border transfer endpoints must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.storage_regions.is_none() {
            missing.push("storage_regions");
        }
        missing
    }

    /// Distinct storage and processing locations, upper-cased.
    pub(crate) fn locations(&self) -> BTreeSet<String> {
        self.storage_regions
            .iter()
            .flatten()
            .chain(&self.processing_regions)
            .map(|r| r.trim().to_ascii_uppercase())
            .collect()
    }
}

// ─── ISO compliance ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IsoStandard {
    /// Framework for AI systems using machine learning.
    #[serde(rename = "ISO/IEC 23053")]
    Iec23053,
    /// AI management system.
    #[serde(rename = "ISO/IEC 23901")]
    Iec23901,
    /// AI risk management.
    #[serde(rename = "ISO/IEC 23094")]
    Iec23094,
    /// Information security management.
    #[serde(rename = "ISO/IEC 27001")]
    Iec27001,
    /// Quality management systems.
    #[serde(rename = "ISO 9001")]
    Iso9001,
}

impl IsoStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iec23053 => "ISO/IEC 23053",
            Self::Iec23901 => "ISO/IEC 23901",
            Self::Iec23094 => "ISO/IEC 23094",
            Self::Iec27001 => "ISO/IEC 27001",
            Self::Iso9001 => "ISO 9001",
        }
    }
}

impl std::fmt::Display for IsoStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct IsoComplianceEvidence {
    /// Category scores (0–100) per assessed standard. At least one standard
    /// is mandatory.
    pub standards: BTreeMap<IsoStandard, BTreeMap<String, f64>>,
}

impl IsoComplianceEvidence {
    fn validate(&self) -> Result<(), GovernanceError> {
        for (standard, categories) in &self.standards {
            if categories.is_empty() {
                return Err(GovernanceError::Validation(format!(
                    "{standard} has no category scores"
                )));
            }
            for (category, score) in categories {
                check_percent(&format!("{standard}.{category}"), *score)?;
            }
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        if self.standards.is_empty() {
            vec!["standards"]
        } else {
            Vec::new()
        }
    }
}
