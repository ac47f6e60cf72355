//! Note Commitments
//!
//! ```text
//! Commitment = BLAKE3_derive_key("sable note commitment v1",
//!                                secret || amount_le || nonce)
//! ```
//!
//! Binding: distinct (secret, amount, nonce) tuples cannot collide short of
//! breaking the hash. Hiding: the inputs are unrecoverable from the digest.

use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::note::NoteSecret;

/// Domain context for note commitments. Changing this is a protocol break.
const COMMITMENT_CONTEXT: &str = "sable note commitment v1";

/// A note commitment (32 bytes) - the note's public on-ledger identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
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
            field: "commitment",
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Commit to a note: C = H(secret || amount || nonce)
///
/// Pure and deterministic. The nonce makes commitments unlinkable even for
/// repeated (secret, amount) pairs.
pub fn commit(secret: &NoteSecret, amount: u64, nonce: &[u8; 32]) -> Commitment {
    let mut hasher = blake3::Hasher::new_derive_key(COMMITMENT_CONTEXT);
    hasher.update(secret.as_bytes());
    hasher.update(&amount.to_le_bytes());
    hasher.update(nonce);
    Commitment(*hasher.finalize().as_bytes())
}
