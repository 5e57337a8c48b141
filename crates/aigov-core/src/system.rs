//! # AI System Record
//!
//! An [`AISystem`] is the unit of governance: an identity, descriptive
//! metadata and an active flag. Identity never changes after registration;
//! metadata changes only through [`AISystem::update_metadata`]. Systems are
//! deactivated, never deleted.
//!
//! The [`InherentRisk`] tier is derived from metadata alone and recomputed
//! whenever metadata changes. Assessors use it for baselines; registration
//! uses it to list the controls a system must evidence.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::identity::SystemId;
use crate::temporal::Timestamp;

// ─── Metadata enums ─────────────────────────────────────────────────

/// Sensitivity tier of the data an AI system consumes. Deserialization
/// goes through `FromStr`, so documents may use any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSensitivity {
    Low,
    Medium,
    High,
}

impl DataSensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for DataSensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSensitivity {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(GovernanceError::Validation(format!(
                "unknown data sensitivity: {s:?}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for DataSensitivity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Category of data processed by a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    Personal,
    Financial,
    Health,
    Biometric,
    Behavioral,
    Operational,
    Public,
}

impl FromStr for DataCategory {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "financial" => Ok(Self::Financial),
            "health" => Ok(Self::Health),
            "biometric" => Ok(Self::Biometric),
            "behavioral" => Ok(Self::Behavioral),
            "operational" => Ok(Self::Operational),
            "public" => Ok(Self::Public),
            _ => Err(GovernanceError::Validation(format!(
                "unknown data category: {s:?}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for DataCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl DataCategory {
    /// Categories that tighten residency policy and pull in information
    /// security standards.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Self::Personal | Self::Financial | Self::Health | Self::Biometric
        )
    }
}

/// Inherent risk tier derived from metadata at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InherentRisk {
    Low,
    Medium,
    High,
    Critical,
}

impl InherentRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for InherentRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const HIGH_RISK_USE_CASES: &[&str] = &["credit", "fraud", "compliance", "pricing", "regulatory"];

// Model types are matched word by word. Stems match any word they begin;
// abbreviations only match a whole word, so "xml-rules" is not "ml".
const COMPLEX_MODEL_STEMS: &[&str] = &["neural", "deep", "ensemble", "transformer"];
const COMPLEX_MODEL_ABBREVIATIONS: &[&str] = &["llm"];
const MACHINE_LEARNING_STEMS: &[&str] = &[
    "neural",
    "deep",
    "ensemble",
    "transformer",
    "forest",
    "boost",
    "xgboost",
    "regression",
    "classifier",
    "learning",
];
const MACHINE_LEARNING_ABBREVIATIONS: &[&str] = &["ml", "llm", "nn", "cnn", "rnn", "gbm"];

fn model_type_matches(model_type: &str, stems: &[&str], abbreviations: &[&str]) -> bool {
    model_type
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .any(|word| {
            abbreviations.contains(&word.as_str())
                || stems.iter().any(|stem| word.starts_with(stem))
        })
}

// ─── Metadata ───────────────────────────────────────────────────────

/// Descriptive metadata for an AI system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    pub name: String,
    pub use_case: String,
    pub model_type: String,
    pub data_sensitivity: DataSensitivity,
    /// Jurisdictions the system is approved to operate in. Doubles as the
    /// approved storage/processing region list for residency assessment.
    #[serde(default)]
    pub jurisdictions: Vec<String>,
    #[serde(default)]
    pub data_categories: Vec<DataCategory>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// The operator has declared a quality management system in scope.
    #[serde(default)]
    pub quality_management_declared: bool,
}

impl SystemMetadata {
    /// Boundary validation: required text fields must be non-blank.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        for (field, value) in [
            ("name", &self.name),
            ("use_case", &self.use_case),
            ("model_type", &self.model_type),
        ] {
            if value.trim().is_empty() {
                return Err(GovernanceError::Validation(format!(
                    "system metadata field `{field}` must not be empty"
                )));
            }
        }
        if self.jurisdictions.iter().any(|j| j.trim().is_empty()) {
            return Err(GovernanceError::Validation(
                "system metadata `jurisdictions` contains an empty entry".to_string(),
            ));
        }
        Ok(())
    }

    /// Additive risk points: high-risk use case 3, complex model 2,
    /// sensitivity HIGH 2 / MEDIUM 1, one per declared risk factor.
    pub fn risk_points(&self) -> u32 {
        let use_case = self.use_case.to_ascii_lowercase();
        let mut points = 0;
        if HIGH_RISK_USE_CASES.iter().any(|c| use_case.contains(c)) {
            points += 3;
        }
        if model_type_matches(&self.model_type, COMPLEX_MODEL_STEMS, COMPLEX_MODEL_ABBREVIATIONS) {
            points += 2;
        }
        points += match self.data_sensitivity {
            DataSensitivity::High => 2,
            DataSensitivity::Medium => 1,
            DataSensitivity::Low => 0,
        };
        points + self.risk_factors.len() as u32
    }

    pub fn inherent_risk(&self) -> InherentRisk {
        match self.risk_points() {
            p if p >= 5 => InherentRisk::Critical,
            p if p >= 3 => InherentRisk::High,
            p if p >= 1 => InherentRisk::Medium,
            _ => InherentRisk::Low,
        }
    }

    pub fn is_machine_learning(&self) -> bool {
        model_type_matches(
            &self.model_type,
            MACHINE_LEARNING_STEMS,
            MACHINE_LEARNING_ABBREVIATIONS,
        )
    }

    pub fn handles_sensitive_data(&self) -> bool {
        self.data_categories.iter().any(DataCategory::is_sensitive)
    }

    pub fn handles_personal_data(&self) -> bool {
        self.data_categories.contains(&DataCategory::Personal)
    }
}

/// Controls a system must evidence given its inherent risk tier.
pub fn governance_requirements(risk: InherentRisk) -> Vec<&'static str> {
    let mut reqs = vec!["model_documentation", "data_lineage", "performance_monitoring"];
    if risk >= InherentRisk::Medium {
        reqs.extend(["model_validation", "bias_testing", "drift_monitoring"]);
    }
    if risk >= InherentRisk::High {
        reqs.extend(["independent_validation", "explainability", "regulatory_review"]);
    }
    if risk >= InherentRisk::Critical {
        reqs.extend(["board_oversight", "continuous_monitoring", "incident_response"]);
    }
    reqs
}

// ─── AISystem ───────────────────────────────────────────────────────

/// A registered AI system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AISystem {
    id: SystemId,
    pub metadata: SystemMetadata,
    pub inherent_risk: InherentRisk,
    pub active: bool,
    pub registered_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AISystem {
    /// Build a new, active system record. Metadata is validated.
    pub fn new(
        id: SystemId,
        metadata: SystemMetadata,
        now: Timestamp,
    ) -> Result<Self, GovernanceError> {
        metadata.validate()?;
        Ok(Self {
            id,
            inherent_risk: metadata.inherent_risk(),
            metadata,
            active: true,
            registered_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Replace metadata. The inherent risk tier is recomputed.
    pub fn update_metadata(
        &mut self,
        metadata: SystemMetadata,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        metadata.validate()?;
        self.inherent_risk = metadata.inherent_risk();
        self.metadata = metadata;
        self.updated_at = now;
        Ok(())
    }

    pub fn deactivate(&mut self, now: Timestamp) {
        self.active = false;
        self.updated_at = now;
    }

    pub fn requirements(&self) -> Vec<&'static str> {
        governance_requirements(self.inherent_risk)
    }
}
