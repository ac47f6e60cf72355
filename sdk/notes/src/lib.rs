//! Sable Notes
//!
//! UTXO-style private value: a note is identified on-ledger by a public
//! commitment and spent by revealing a one-time nullifier.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Note lifecycle                        │
//! │                                                              │
//! │  secret, amount, nonce                                       │
//! │        │                                                     │
//! │        ├──► commit()  ──► Commitment  (public identity)      │
//! │        ├──► seal()    ──► SealedNote  (owner-only payload)   │
//! │        └──► nullify() ──► Nullifier   (published at spend)   │
//! │                                                              │
//! │  Duplicate nullifier on the ledger = double spend rejected.  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every derivation runs BLAKE3 under a distinct literal domain context, so
//! a commitment can never be confused with a nullifier or a keystream.
//! Changing any context string is a breaking protocol change.
//!
//! The ledger's nullifier set is the only authority on double spends; this
//! crate never tracks which nullifiers have been seen.

use thiserror::Error;

pub mod commitment;
pub mod note;
pub mod nullifier;
pub mod sealed;

pub use commitment::{Commitment, commit};
pub use note::{Note, NoteSecret};
pub use nullifier::{Nullifier, nullify};
pub use sealed::{SEALED_NOTE_LEN, SealedNote, open, seal, try_open};

/// Errors raised by fallible byte-level constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}
