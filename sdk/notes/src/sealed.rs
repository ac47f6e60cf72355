//! Sealed note payloads
//!
//! The 64-byte blob stored on-ledger beside a commitment, recoverable only
//! by the owner:
//!
//! ```text
//! keystream = BLAKE3_derive_key("sable note keystream v1", secret), 64B XOF
//! plaintext = amount_le(8) || nonce(32) || zero_pad(24)
//! sealed    = keystream XOR plaintext
//! ```
//!
//! The keystream depends only on the owner secret, so per-note nonce
//! distinctness is what keeps two notes of one owner from leaking their
//! plaintext relation. `open` is the exact inverse of `seal` and cannot
//! fail on a 64-byte blob; use `try_open` when scanning candidate blobs.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::NoteError;
use crate::commitment::{Commitment, commit};
use crate::note::{Note, NoteSecret};

/// Domain context for the sealing keystream. Changing this is a protocol
/// break.
const KEYSTREAM_CONTEXT: &str = "sable note keystream v1";

/// Fixed size of a sealed note blob
pub const SEALED_NOTE_LEN: usize = 64;

/// An encrypted note payload (stored on-ledger)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealedNote(pub [u8; SEALED_NOTE_LEN]);

impl SealedNote {
    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; SEALED_NOTE_LEN] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, NoteError> {
        let arr: [u8; SEALED_NOTE_LEN] =
            bytes.try_into().map_err(|_| NoteError::InvalidLength {
                field: "sealed note",
                expected: SEALED_NOTE_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for SealedNote {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn keystream(secret: &NoteSecret) -> [u8; SEALED_NOTE_LEN] {
    let mut hasher = blake3::Hasher::new_derive_key(KEYSTREAM_CONTEXT);
    hasher.update(secret.as_bytes());
    let mut out = [0u8; SEALED_NOTE_LEN];
    hasher.finalize_xof().fill(&mut out);
    out
}

/// Seal a note's private fields under the owner secret
pub fn seal(secret: &NoteSecret, amount: u64, nonce: &[u8; 32]) -> SealedNote {
    let mut buf = [0u8; SEALED_NOTE_LEN];
    buf[..8].copy_from_slice(&amount.to_le_bytes());
    buf[8..40].copy_from_slice(nonce);
    // bytes 40..64 stay zero

    for (b, k) in buf.iter_mut().zip(keystream(secret)) {
        *b ^= k;
    }
    SealedNote(buf)
}

/// Recover a note's private fields. Exact inverse of [`seal`].
///
/// A wrong secret yields garbage fields rather than an error; the blob
/// carries no authenticator.
pub fn open(secret: &NoteSecret, sealed: &SealedNote) -> Note {
    let mut buf = sealed.0;
    for (b, k) in buf.iter_mut().zip(keystream(secret)) {
        *b ^= k;
    }

    let amount = u64::from_le_bytes(buf[..8].try_into().expect("fixed slice"));
    let nonce: [u8; 32] = buf[8..40].try_into().expect("fixed slice");
    Note { amount, nonce }
}

/// Scan-mode open: recompute the commitment from the recovered fields and
/// reject blobs that do not belong to `secret`.
pub fn try_open(
    secret: &NoteSecret,
    sealed: &SealedNote,
    expected_commitment: &Commitment,
) -> Option<Note> {
    let note = open(secret, sealed);
    if &commit(secret, note.amount, &note.nonce) == expected_commitment {
        Some(note)
    } else {
        None
    }
}

// serde only provides array impls up to 32 bytes, so the 64-byte blob
// serializes through its own visitor.
impl Serialize for SealedNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for SealedNote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SealedNoteVisitor;

        impl<'de> Visitor<'de> for SealedNoteVisitor {
            type Value = SealedNote;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{SEALED_NOTE_LEN} bytes")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                SealedNote::from_slice(v).map_err(|_| E::invalid_length(v.len(), &self))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut buf = [0u8; SEALED_NOTE_LEN];
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<u8>()?.is_some() {
                    return Err(de::Error::invalid_length(SEALED_NOTE_LEN + 1, &self));
                }
                Ok(SealedNote(buf))
            }
        }

        deserializer.deserialize_bytes(SealedNoteVisitor)
    }
}
