//! # Workflow Types
//!
//! The catalogue of governance processes. The type lives in the core crate
//! because configuration (dwell limits) is keyed on it; the state machine
//! itself is in `aigov-workflow`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowType {
    ComplianceAssessment,
    ModelValidation,
    Escalation,
    SystemRegistration,
    RiskAssessment,
    AuditReview,
    PolicyUpdate,
}

impl WorkflowType {
    pub fn all() -> &'static [WorkflowType] {
        &[
            Self::ComplianceAssessment,
            Self::ModelValidation,
            Self::Escalation,
            Self::SystemRegistration,
            Self::RiskAssessment,
            Self::AuditReview,
            Self::PolicyUpdate,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComplianceAssessment => "COMPLIANCE_ASSESSMENT",
            Self::ModelValidation => "MODEL_VALIDATION",
            Self::Escalation => "ESCALATION",
            Self::SystemRegistration => "SYSTEM_REGISTRATION",
            Self::RiskAssessment => "RISK_ASSESSMENT",
            Self::AuditReview => "AUDIT_REVIEW",
            Self::PolicyUpdate => "POLICY_UPDATE",
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GovernanceError::Validation(format!("unknown workflow type: {s:?}")))
    }
}
