//! # aigov-service — Governance Service Facade
//!
//! The inbound interface of the governance core:
//!
//! ```text
//! register_system ─▶ SystemRegistry
//! submit_evidence ─▶ AssessorSet ─▶ registry (module score history)
//! run_assessment  ─▶ ScoreAggregator ─▶ registry (assessment history)
//! route_assessment ─▶ EscalationPolicy ─▶ WorkflowEngine::initiate(ESCALATION)
//! initiate_workflow / advance_workflow / archive_workflow ─▶ WorkflowEngine
//! list_overdue_workflows / dashboard ─▶ pull-based reports
//! ```
//!
//! ## Crate Policy
//!
//! - Assessment never starts a workflow on its own. Routing is an explicit
//!   call.
//! - Counters go through the `metrics` facade (see [`telemetry`]).

pub mod dashboard;
pub mod service;
pub mod telemetry;

pub use dashboard::{AssessmentSummary, DashboardSummary, RECENT_ASSESSMENTS};
pub use service::{GovernanceService, ServiceBuilder};
