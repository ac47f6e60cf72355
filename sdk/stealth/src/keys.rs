//! X25519 key material and shared-secret agreement.

use chacha20poly1305::aead::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::StealthError;

/// Domain context for shared-secret hashing. Changing this is a protocol
/// break.
const SHARED_SECRET_CONTEXT: &str = "sable shared secret v1";

/// An X25519 keypair used for stealth derivations.
///
/// NEVER expose this struct's internals.
#[derive(Clone)]
pub struct StealthKeypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl StealthKeypair {
    /// Generates a fresh random keypair.
    pub fn random() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Reconstructs a keypair from raw secret bytes (e.g., from a seed).
    pub fn from_bytes(seed: [u8; 32]) -> Self {
        let secret = StaticSecret::from(seed);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Returns the public key bytes (safe to share).
    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Runs the key agreement against a peer public key.
    pub fn diffie_hellman(&self, their_public: &[u8; 32]) -> Result<SharedKey, StealthError> {
        derive_shared_secret(&self.secret, their_public)
    }
}

/// A domain-separated 32-byte shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedKey([u8; 32]);

impl SharedKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// X25519 scalar multiplication followed by domain-separated hashing.
///
/// A non-contributory exchange (peer sent the identity or another low-order
/// point) is rejected before any derived value escapes; the raw DH output is
/// never used directly.
pub fn derive_shared_secret(
    my_secret: &StaticSecret,
    their_public: &[u8; 32],
) -> Result<SharedKey, StealthError> {
    let shared = my_secret.diffie_hellman(&PublicKey::from(*their_public));
    if !shared.was_contributory() {
        return Err(StealthError::WeakPublicKey);
    }

    let mut hasher = blake3::Hasher::new_derive_key(SHARED_SECRET_CONTEXT);
    hasher.update(shared.as_bytes());
    Ok(SharedKey(*hasher.finalize().as_bytes()))
}
