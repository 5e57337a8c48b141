//! # aigov-registry — AI System Registry
//!
//! The canonical record of every registered AI system: identity, metadata,
//! active flag, and the append-only histories of module scores and
//! assessment results.
//!
//! Persistence goes through the [`SystemStore`] trait;
//! [`InMemorySystemStore`] is the process-local implementation.

pub mod registry;
pub mod store;

pub use registry::SystemRegistry;
pub use store::{InMemorySystemStore, RecordedScore, SystemRecord, SystemStore};
