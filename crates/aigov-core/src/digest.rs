//! # Evidence Digest
//!
//! SHA-256 over the RFC 8785 (JCS) canonical JSON encoding of an evidence
//! payload. Two payloads that differ only in key order or whitespace hash
//! identically, so an auditor holding the raw evidence can confirm it is the
//! input that produced a recorded score.
//!
//! This is a content identifier only. Nothing is signed or chained.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::GovernanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceDigest([u8; 32]);

impl EvidenceDigest {
    /// Digest the canonical JSON encoding of `value`.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, GovernanceError> {
        let canonical = serde_jcs::to_vec(value).map_err(|e| {
            GovernanceError::Validation(format!("evidence cannot be canonicalized: {e}"))
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(Self(hasher.finalize().into()))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for EvidenceDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}
