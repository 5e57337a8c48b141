//! # aigov-core — Foundational Types for the AI Governance Core
//!
//! Every other crate in the workspace depends on `aigov-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `SystemId`, `WorkflowId`, `AssessmentId` and
//!    `ActorId` are distinct types. A workflow id cannot be passed where a
//!    system id is expected.
//!
//! 2. **Single `GovernanceModule` enum.** One definition of the five
//!    governance dimensions, exhaustive `match` everywhere.
//!
//! 3. **UTC-only timestamps behind a `Clock`.** Every timestamp in the core
//!    comes from an injected [`Clock`], so dwell-time calculations are
//!    deterministic under test.
//!
//! 4. **Validated configuration.** [`GovernanceConfig`] is loaded once,
//!    validated, and shared by `Arc` with every component. There is no
//!    process-wide mutable configuration.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `aigov-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod clock;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod level;
pub mod module;
pub mod store;
pub mod system;
pub mod temporal;
pub mod workflow;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfigError, DwellLimits, EscalationSettings, GovernanceConfig, LevelBand, ModuleWeights,
    CONFIG_ENV_VAR,
};
pub use digest::EvidenceDigest;
pub use error::{GovernanceError, GovernanceResult};
pub use identity::{ActorId, AssessmentId, SystemId, WorkflowId};
pub use level::GovernanceLevel;
pub use module::{GovernanceModule, GOVERNANCE_MODULE_COUNT};
pub use store::{KeyGuard, LockTable, MemoryStore};
pub use system::{
    governance_requirements, AISystem, DataCategory, DataSensitivity, InherentRisk,
    SystemMetadata,
};
pub use temporal::Timestamp;
pub use workflow::WorkflowType;
