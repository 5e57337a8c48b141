//! # Governance Level
//!
//! The discrete classification produced by aggregation. Variants are
//! declared in increasing severity, so the derived `Ord` gives
//! `MINIMAL < LOW < MODERATE < HIGH < CRITICAL`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernanceLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl GovernanceLevel {
    /// All levels, least severe first.
    pub fn all() -> &'static [GovernanceLevel] {
        &[
            Self::Minimal,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::Critical,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for GovernanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovernanceLevel {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GovernanceError::Validation(format!("unknown governance level: {s:?}")))
    }
}
