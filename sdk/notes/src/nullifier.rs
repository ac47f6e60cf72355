//! Nullifiers
//!
//! ```text
//! Nullifier = BLAKE3_derive_key("sable nullifier v1", secret || commitment)
//! ```
//!
//! Published once, at spend time. Only the secret holder can compute it, and
//! a given (commitment, secret) pair maps to exactly one nullifier, so the
//! ledger detects double spends by rejecting duplicates. That set lives on
//! the ledger; it is never mirrored here.

use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::commitment::Commitment;
use crate::note::NoteSecret;

/// Domain context for nullifiers. Changing this is a protocol break.
const NULLIFIER_CONTEXT: &str = "sable nullifier v1";

/// A nullifier (32 bytes) - unique tag revealed when a note is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(pub [u8; 32]);

impl Nullifier {
    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, NoteError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| NoteError::InvalidLength {
            field: "nullifier",
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Nullifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the nullifier for a note: N = H(secret || commitment)
pub fn nullify(secret: &NoteSecret, commitment: &Commitment) -> Nullifier {
    let mut hasher = blake3::Hasher::new_derive_key(NULLIFIER_CONTEXT);
    hasher.update(secret.as_bytes());
    hasher.update(commitment.as_bytes());
    Nullifier(*hasher.finalize().as_bytes())
}
