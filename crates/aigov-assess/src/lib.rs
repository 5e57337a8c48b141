//! # aigov-assess — Module Assessment and Score Aggregation
//!
//! Turns evidence into scores and scores into a governance level.
//!
//! ## Flow
//!
//! ```text
//! Evidence ──► ModuleAssessor (×5) ──► ModuleScore ─┐
//!                                                    ├──► ScoreAggregator ──► AssessmentResult
//!              config weights / bands / ceiling ────┘
//! ```
//!
//! - [`evidence`]: the closed set of evidence payloads, one per module.
//! - [`assessor`]: the [`ModuleAssessor`] capability and the five built-in
//!   assessors, collected in an [`AssessorSet`].
//! - [`aggregate`]: weighted aggregation with the insufficient-evidence
//!   ceiling and level classification.
//! - [`trend`]: movement of a module's score across runs.
//!
//! ## Crate Policy
//!
//! Everything here is pure computation. No I/O, no locks, no clock reads:
//! timestamps are passed in.

pub mod aggregate;
pub mod assessor;
pub mod evidence;
pub mod score;
pub mod trend;

pub use aggregate::{AssessmentResult, ScoreAggregator};
pub use assessor::{
    applicable_standards, AssessorSet, DataGovernanceAssessor, DataResidencyAssessor,
    IsoComplianceAssessor, ModelRiskAssessor, ModuleAssessor, OversightAssessor, OversightLevel,
};
pub use evidence::{
    CrossBorderTransfer, DataGovernanceEvidence, DataResidencyEvidence, Evidence,
    IsoComplianceEvidence, IsoStandard, LifecycleStage, LineageFlags, ModelRiskEvidence,
    OversightEvidence, PerformanceMetrics, QualityMetrics, SovereigntyLevel,
};
pub use score::{Finding, ModuleScore, Severity, CRITICAL_FINDING, INSUFFICIENT_EVIDENCE};
pub use trend::{score_trend, ScoreTrend};
