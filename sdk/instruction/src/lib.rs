//! Sable instruction encoding
//!
//! Builds the byte buffers and ordered account lists the on-chain program
//! accepts. One leading tag byte selects the operation; fixed-width fields
//! follow in a declared order; variable fields carry an explicit length
//! prefix; some operations end with a TLV extension block.
//!
//! ```text
//! caller inputs ──► validate limits ──► FieldWriter ──► Instruction
//!                                                        ├─ data (bytes)
//!                                                        └─ accounts (ordered, role-typed)
//! ```
//!
//! The program parses accounts positionally, so account order is part of
//! the wire contract: a reordering is a silent protocol violation, not a
//! type error. Every builder validates its inputs fully before a single
//! byte is emitted; a partially valid buffer is never produced. External
//! rejections (duplicate nullifier, insufficient balance) happen on the
//! ledger and are surfaced by the transport, not modeled here.

use thiserror::Error;

use sable_extension::ExtensionError;

pub mod accounts;
pub mod builder;
pub mod config;
pub mod kind;
pub mod writer;

pub use accounts::{AccountMeta, AccountRole, SYSTEM_PROGRAM, role_table};
pub use builder::{
    BATCH_ITEM_LEN, Instruction, InstructionBuilder, MAX_BATCH_ITEMS, MAX_ROUTE_HOPS,
    MAX_SPLIT_OUTPUTS, SPLIT_OUTPUT_LEN, SPLIT_TOTAL_BPS, SplitOutput, TransferItem,
};
pub use config::ProtocolConfig;
pub use kind::{InstructionKind, RevealKind};
pub use writer::{FieldWriter, MAX_PAYLOAD_LEN};

/// Instruction building errors.
///
/// Every variant names the precondition that failed; no bytes are emitted
/// on any of these paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstructionError {
    #[error("batch is empty")]
    EmptyBatch,

    #[error("batch too large: max {max} items, got {actual}")]
    BatchTooLarge { max: usize, actual: usize },

    #[error("route has no hops")]
    EmptyRoute,

    #[error("too many hops: max {max}, got {actual}")]
    TooManyHops { max: usize, actual: usize },

    #[error("split has no outputs")]
    EmptySplit,

    #[error("too many split outputs: max {max}, got {actual}")]
    TooManySplitOutputs { max: usize, actual: usize },

    #[error("split shares sum to {0} basis points, expected exactly 10000")]
    SplitShareSum(u32),

    #[error("split outputs ({outputs}) and note accounts ({accounts}) must match")]
    SplitAccountMismatch { outputs: usize, accounts: usize },

    #[error("payload too large: max {max} bytes, got {actual}")]
    PayloadTooLarge { max: usize, actual: usize },

    #[error("unknown reveal kind code {0}")]
    UnknownRevealKind(u8),

    #[error(transparent)]
    Extension(#[from] ExtensionError),
}
