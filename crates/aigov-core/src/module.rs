//! # Governance Modules
//!
//! The five independent dimensions an AI system is assessed on. This is the
//! single definition; every `match` on it is exhaustive, so adding a sixth
//! module forces every assessor registry, weight map and report to be
//! updated at compile time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Number of governance modules.
pub const GOVERNANCE_MODULE_COUNT: usize = 5;

/// A governance dimension with its own assessor and evidence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceModule {
    /// Model validation, lifecycle and performance monitoring.
    ModelRisk,
    /// Human oversight: audit cadence, decision transparency, escalation.
    Oversight,
    /// Data quality, lineage, privacy and retention.
    DataGovernance,
    /// Where data is stored and processed, and cross-border transfers.
    DataResidency,
    /// Conformance to applicable ISO/IEC AI and management standards.
    IsoCompliance,
}

impl GovernanceModule {
    /// All modules in canonical order.
    pub fn all() -> &'static [GovernanceModule; GOVERNANCE_MODULE_COUNT] {
        &[
            Self::ModelRisk,
            Self::Oversight,
            Self::DataGovernance,
            Self::DataResidency,
            Self::IsoCompliance,
        ]
    }

    /// Snake-case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelRisk => "model_risk",
            Self::Oversight => "oversight",
            Self::DataGovernance => "data_governance",
            Self::DataResidency => "data_residency",
            Self::IsoCompliance => "iso_compliance",
        }
    }

    /// Human-readable name for reports and recommendations.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ModelRisk => "Model Risk",
            Self::Oversight => "Oversight",
            Self::DataGovernance => "Data Governance",
            Self::DataResidency => "Data Residency",
            Self::IsoCompliance => "ISO Compliance",
        }
    }
}

impl std::fmt::Display for GovernanceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovernanceModule {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GovernanceError::Validation(format!("unknown governance module: {s:?}")))
    }
}
