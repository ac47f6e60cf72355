//! Account references and per-operation ordering rules.
//!
//! The on-chain program reads its accounts positionally, so each operation
//! has a fixed, ordered, role-typed list. Composite (fee-collecting)
//! operations share a common prefix (fee payer then treasury) ahead of
//! their operation-specific accounts.

use serde::{Deserialize, Serialize};

use sable_pubkey::Pubkey;

use crate::kind::InstructionKind;

/// The system account, present wherever the program creates derived
/// addresses. Chain-defined, unlike the injected program/treasury ids.
pub const SYSTEM_PROGRAM: Pubkey = Pubkey::new([0u8; 32]);

/// One entry of an instruction's ordered account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account reference.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account reference.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// One slot of an operation's role template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRole {
    pub name: &'static str,
    pub is_signer: bool,
    pub is_writable: bool,
}

const fn signer_writable(name: &'static str) -> AccountRole {
    AccountRole {
        name,
        is_signer: true,
        is_writable: true,
    }
}

const fn signer(name: &'static str) -> AccountRole {
    AccountRole {
        name,
        is_signer: true,
        is_writable: false,
    }
}

const fn writable(name: &'static str) -> AccountRole {
    AccountRole {
        name,
        is_signer: false,
        is_writable: true,
    }
}

const fn readonly(name: &'static str) -> AccountRole {
    AccountRole {
        name,
        is_signer: false,
        is_writable: false,
    }
}

/// The fixed, ordered role template for an operation's account list.
///
/// For `Split`, the `note` slot repeats once per output between `nullifier`
/// and `system`.
pub fn role_table(kind: InstructionKind) -> &'static [AccountRole] {
    const NOTE_CREATE: &[AccountRole] = &[
        signer_writable("payer"),
        writable("note"),
        readonly("system"),
    ];
    const NULLIFIER_CHECK: &[AccountRole] = &[readonly("nullifier")];
    const NULLIFIER_CREATE: &[AccountRole] = &[
        signer_writable("payer"),
        writable("nullifier"),
        readonly("system"),
    ];
    const TRANSFER: &[AccountRole] = &[
        signer_writable("fee_payer"),
        writable("treasury"),
        writable("nullifier"),
        writable("note"),
        readonly("system"),
    ];
    const STEALTH_TRANSFER: &[AccountRole] = &[
        signer_writable("fee_payer"),
        writable("treasury"),
        writable("note"),
        readonly("system"),
    ];
    const BATCH_TRANSFER: &[AccountRole] = &[
        signer_writable("fee_payer"),
        writable("treasury"),
        readonly("system"),
    ];
    const ROUTED_TRANSFER: &[AccountRole] = &[
        signer_writable("fee_payer"),
        writable("treasury"),
        writable("relay"),
        readonly("system"),
    ];
    const SPLIT: &[AccountRole] = &[
        signer_writable("fee_payer"),
        writable("treasury"),
        writable("nullifier"),
        writable("note"),
        readonly("system"),
    ];
    const COMPLIANCE_REVEAL: &[AccountRole] = &[signer("authority"), readonly("auditor")];
    match kind {
        InstructionKind::NoteCreate => NOTE_CREATE,
        InstructionKind::NullifierCheck => NULLIFIER_CHECK,
        InstructionKind::NullifierCreate => NULLIFIER_CREATE,
        InstructionKind::Transfer => TRANSFER,
        InstructionKind::StealthTransfer => STEALTH_TRANSFER,
        InstructionKind::BatchTransfer => BATCH_TRANSFER,
        InstructionKind::RoutedTransfer => ROUTED_TRANSFER,
        InstructionKind::Split => SPLIT,
        InstructionKind::ComplianceReveal => COMPLIANCE_REVEAL,
    }
}
