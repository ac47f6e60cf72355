//! Sable Stealth Addressing
//!
//! Unlinkable recipient identifiers over X25519 + ChaCha20-Poly1305.
//!
//! ```text
//! Flow:
//! 1. Sender generates ephemeral keypair (esk, epk)
//! 2. shared  = X25519(esk, recipient_spend_pk)   -- contributory-checked
//! 3. stealth = H(addr domain, shared || recipient_spend_pk)
//! 4. hint    = H(hint domain, epk)
//! 5. Payloads ride ChaCha20-Poly1305 under HKDF(shared), fresh nonce
//!
//! The recipient recomputes (stealth, hint) from (spend_sk, epk) to
//! recognize candidate payments; an observer without spend_sk sees
//! uncorrelated values across payments.
//! ```

use thiserror::Error;

pub mod address;
pub mod keys;
pub mod payload;

pub use address::{StealthAddress, generate_stealth_address, recover_stealth_address};
pub use keys::{SharedKey, StealthKeypair, derive_shared_secret};
pub use payload::{PAYLOAD_OVERHEAD, decrypt_payload, encrypt_payload};

/// Stealth addressing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StealthError {
    #[error("peer public key is weak (identity or low-order point)")]
    WeakPublicKey,

    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("payload encryption failed")]
    EncryptionFailed,

    #[error("payload decryption failed (bad key or mac)")]
    DecryptionFailed,
}
