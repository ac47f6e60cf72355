//! Authenticated payload encryption.
//!
//! Wire form: `[nonce:12][tag:16][body]`. The nonce is always drawn fresh
//! from the OS generator inside [`encrypt_payload`]; callers never supply
//! one, so reuse under a key cannot happen.

use chacha20poly1305::{
    ChaCha20Poly1305,
    aead::{Aead, KeyInit, rand_core::{OsRng, RngCore}},
};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::StealthError;
use crate::keys::SharedKey;

/// HKDF label for payload keys.
const PAYLOAD_KEY_LABEL: &[u8] = b"sable-payload-v1";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Fixed ciphertext overhead (nonce + tag).
pub const PAYLOAD_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

fn derive_payload_key(shared: &SharedKey) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut key = [0u8; 32];
    hk.expand(PAYLOAD_KEY_LABEL, &mut key)
        .expect("HKDF expand failed");
    key
}

/// Encrypt a payload under a shared key.
///
/// Returns `[nonce:12][tag:16][body]`.
pub fn encrypt_payload(shared: &SharedKey, plaintext: &[u8]) -> Result<Vec<u8>, StealthError> {
    let key = derive_payload_key(shared);
    let cipher = ChaCha20Poly1305::new(&key.into());

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let encrypted = cipher
        .encrypt(&nonce.into(), plaintext)
        .map_err(|_| StealthError::EncryptionFailed)?;
    let split = encrypted.len() - TAG_LEN;
    let (body, tag) = encrypted.split_at(split);

    let mut out = Vec::with_capacity(PAYLOAD_OVERHEAD + body.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(tag);
    out.extend_from_slice(body);
    Ok(out)
}

/// Decrypt a `[nonce:12][tag:16][body]` payload under a shared key.
pub fn decrypt_payload(shared: &SharedKey, bytes: &[u8]) -> Result<Vec<u8>, StealthError> {
    if bytes.len() < PAYLOAD_OVERHEAD {
        return Err(StealthError::Truncated {
            expected: PAYLOAD_OVERHEAD,
            actual: bytes.len(),
        });
    }
    let nonce: [u8; NONCE_LEN] = bytes[..NONCE_LEN].try_into().expect("fixed slice");
    let tag = &bytes[NONCE_LEN..PAYLOAD_OVERHEAD];
    let body = &bytes[PAYLOAD_OVERHEAD..];

    let mut combined = Vec::with_capacity(body.len() + TAG_LEN);
    combined.extend_from_slice(body);
    combined.extend_from_slice(tag);

    let key = derive_payload_key(shared);
    let cipher = ChaCha20Poly1305::new(&key.into());
    cipher
        .decrypt(&nonce.into(), combined.as_slice())
        .map_err(|_| StealthError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StealthKeypair;

    fn shared_pair() -> (SharedKey, SharedKey) {
        let alice = StealthKeypair::random();
        let bob = StealthKeypair::random();
        (
            alice.diffie_hellman(&bob.public_bytes()).expect("contributory"),
            bob.diffie_hellman(&alice.public_bytes()).expect("contributory"),
        )
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let (tx, rx) = shared_pair();
        let msg = b"42 tokens, invoice #7";

        let wire = encrypt_payload(&tx, msg).expect("encrypt");
        assert_eq!(wire.len(), PAYLOAD_OVERHEAD + msg.len());

        let plain = decrypt_payload(&rx, &wire).expect("decrypt");
        assert_eq!(plain, msg);
    }

    #[test]
    fn nonce_is_fresh_per_call() {
        let (tx, _) = shared_pair();
        let a = encrypt_payload(&tx, b"same").expect("encrypt");
        let b = encrypt_payload(&tx, b"same").expect("encrypt");
        assert_ne!(a[..12], b[..12], "nonce repeated across calls");
        assert_ne!(a, b);
    }

    #[test]
    fn tampering_is_detected() {
        let (tx, rx) = shared_pair();
        let mut wire = encrypt_payload(&tx, b"payload").expect("encrypt");

        let last = wire.len() - 1;
        wire[last] ^= 0x01;
        assert_eq!(
            decrypt_payload(&rx, &wire),
            Err(StealthError::DecryptionFailed)
        );
    }

    #[test]
    fn wrong_key_fails() {
        let (tx, _) = shared_pair();
        let (other, _) = shared_pair();

        let wire = encrypt_payload(&tx, b"payload").expect("encrypt");
        assert_eq!(
            decrypt_payload(&other, &wire),
            Err(StealthError::DecryptionFailed)
        );
    }

    #[test]
    fn truncated_payload_rejected() {
        let (tx, rx) = shared_pair();
        let wire = encrypt_payload(&tx, b"").expect("encrypt");
        assert_eq!(wire.len(), PAYLOAD_OVERHEAD);

        assert_eq!(
            decrypt_payload(&rx, &wire[..PAYLOAD_OVERHEAD - 1]),
            Err(StealthError::Truncated {
                expected: PAYLOAD_OVERHEAD,
                actual: PAYLOAD_OVERHEAD - 1,
            })
        );
    }
}
