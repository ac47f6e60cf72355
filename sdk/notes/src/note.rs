//! Note types and owner key material.
//!
//! ```text
//! Note = {
//!     amount: u64,        // value in the smallest unit
//!     nonce: [u8; 32],    // per-note randomness, kept encrypted
//! }
//! ```
//!
//! The owning `NoteSecret` never leaves the client; commitments, nullifiers
//! and sealed payloads are all pure functions of it.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::commitment::{Commitment, commit};
use crate::nullifier::{Nullifier, nullify};
use crate::sealed::{SealedNote, seal};

/// Domain context for the published secret hash. Changing this is a
/// protocol break.
const SECRET_HASH_CONTEXT: &str = "sable secret hash v1";

/// The 32-byte private material controlling a note.
///
/// Loss = loss of funds. Compromise = theft of funds. Discard after spend.
#[derive(Debug, Clone)]
pub struct NoteSecret {
    key: [u8; 32],
}

impl NoteSecret {
    /// Generate a fresh random secret
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        Self { key }
    }

    /// Create from raw bytes
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, NoteError> {
        let key: [u8; 32] = bytes.try_into().map_err(|_| NoteError::InvalidLength {
            field: "secret",
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self { key })
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Domain-separated hash of the secret, safe to publish.
    ///
    /// Carried in nullifier-create instructions so the validator can bind
    /// the derived address to the owner without learning the secret.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_derive_key(SECRET_HASH_CONTEXT);
        hasher.update(&self.key);
        *hasher.finalize().as_bytes()
    }
}

/// A note's private fields: what the owner must retain to spend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// The value held in this note
    pub amount: u64,
    /// Per-note randomness; embedded, encrypted, in the sealed payload
    pub nonce: [u8; 32],
}

impl Note {
    /// Create a new note with a random nonce
    pub fn new<R: RngCore + CryptoRng>(amount: u64, rng: &mut R) -> Self {
        let mut nonce = [0u8; 32];
        rng.fill_bytes(&mut nonce);
        Self { amount, nonce }
    }

    /// Create a note with an explicit nonce (recovery paths)
    pub fn with_nonce(amount: u64, nonce: [u8; 32]) -> Self {
        Self { amount, nonce }
    }

    /// The note's public on-ledger identity
    pub fn commitment(&self, secret: &NoteSecret) -> Commitment {
        commit(secret, self.amount, &self.nonce)
    }

    /// The tag revealed when this note is spent
    pub fn nullifier(&self, secret: &NoteSecret) -> Nullifier {
        nullify(secret, &self.commitment(secret))
    }

    /// The owner-only encrypted payload stored beside the commitment
    pub fn seal(&self, secret: &NoteSecret) -> SealedNote {
        seal(secret, self.amount, &self.nonce)
    }
}
