//! Per-operation instruction builders.
//!
//! One `InstructionBuilder` per deployment, constructed from an injected
//! [`ProtocolConfig`]. Each method validates its inputs completely, then
//! assembles the data buffer through a [`FieldWriter`] and the account list
//! in the operation's fixed order.

use serde::{Deserialize, Serialize};

use sable_extension::{Extension, encode_extensions};
use sable_notes::{Commitment, Nullifier, SEALED_NOTE_LEN, SealedNote};
use sable_pubkey::Pubkey;
use sable_stealth::StealthAddress;

use crate::InstructionError;
use crate::accounts::{AccountMeta, SYSTEM_PROGRAM};
use crate::config::ProtocolConfig;
use crate::kind::{
    RevealKind, TAG_BATCH_TRANSFER, TAG_COMPLIANCE_REVEAL, TAG_NOTE_CREATE, TAG_NULLIFIER_CHECK,
    TAG_NULLIFIER_CREATE, TAG_ROUTED_TRANSFER, TAG_SPLIT, TAG_STEALTH_TRANSFER, TAG_TRANSFER,
};
use crate::writer::{FieldWriter, MAX_PAYLOAD_LEN};

/// Protocol limits. The program enforces the same bounds; failing here
/// saves a doomed round trip.
pub const MAX_BATCH_ITEMS: usize = 10;
pub const MAX_ROUTE_HOPS: usize = 5;
pub const MAX_SPLIT_OUTPUTS: usize = 10;

/// Split shares must sum to exactly this many basis points.
pub const SPLIT_TOTAL_BPS: u16 = 10_000;

/// Serialized size of one batch item: nullifier + commitment + sealed note.
pub const BATCH_ITEM_LEN: usize = 32 + 32 + SEALED_NOTE_LEN;

/// Serialized size of one split output: commitment + sealed note + share.
pub const SPLIT_OUTPUT_LEN: usize = 32 + SEALED_NOTE_LEN + 2;

/// A complete, validated unit ready for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// One spend-and-recreate entry of a batch transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferItem {
    pub nullifier: Nullifier,
    pub commitment: Commitment,
    pub sealed: SealedNote,
}

/// One output of a split, with its share in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutput {
    pub commitment: Commitment,
    pub sealed: SealedNote,
    pub share_bps: u16,
}

/// Builds instructions against one protocol deployment.
#[derive(Debug, Clone)]
pub struct InstructionBuilder {
    config: ProtocolConfig,
}

impl InstructionBuilder {
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    fn instruction(&self, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Instruction {
        Instruction {
            program_id: self.config.program_id,
            accounts,
            data,
        }
    }

    /// Register a new note.
    ///
    /// Layout: `[tag][commitment:32][sealed_note:64][extensions TLV]`
    pub fn note_create(
        &self,
        payer: Pubkey,
        note_address: Pubkey,
        commitment: &Commitment,
        sealed: &SealedNote,
        extensions: &[Extension],
    ) -> Result<Instruction, InstructionError> {
        let ext_block = encode_extensions(extensions)?;

        let mut w = FieldWriter::with_capacity(
            TAG_NOTE_CREATE,
            1 + 32 + SEALED_NOTE_LEN + ext_block.len(),
        );
        w.bytes32(commitment.as_bytes());
        w.raw(sealed.as_bytes());
        w.raw(&ext_block);

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(note_address, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Probe whether a nullifier has been published.
    ///
    /// Layout: `[tag][nullifier:32]`, exactly 33 bytes.
    pub fn nullifier_check(&self, nullifier_address: Pubkey, nullifier: &Nullifier) -> Instruction {
        let mut w = FieldWriter::with_capacity(TAG_NULLIFIER_CHECK, 33);
        w.bytes32(nullifier.as_bytes());

        let accounts = vec![AccountMeta::new_readonly(nullifier_address, false)];
        self.instruction(accounts, w.finish())
    }

    /// Publish a nullifier, spending its note.
    ///
    /// Layout: `[tag][note_commitment:32][nullifier:32][secret_hash:32][flags:1]`,
    /// exactly 98 bytes.
    pub fn nullifier_create(
        &self,
        payer: Pubkey,
        nullifier_address: Pubkey,
        note_commitment: &Commitment,
        nullifier: &Nullifier,
        secret_hash: &[u8; 32],
        flags: u8,
    ) -> Instruction {
        let mut w = FieldWriter::with_capacity(TAG_NULLIFIER_CREATE, 98);
        w.bytes32(note_commitment.as_bytes());
        w.bytes32(nullifier.as_bytes());
        w.bytes32(secret_hash);
        w.u8(flags);

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(nullifier_address, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        self.instruction(accounts, w.finish())
    }

    /// Spend one note and create its successor.
    ///
    /// Layout: `[tag][nullifier:32][new_commitment:32][sealed_note:64][extensions TLV]`
    pub fn transfer(
        &self,
        fee_payer: Pubkey,
        nullifier_address: Pubkey,
        note_address: Pubkey,
        nullifier: &Nullifier,
        new_commitment: &Commitment,
        sealed: &SealedNote,
        extensions: &[Extension],
    ) -> Result<Instruction, InstructionError> {
        let ext_block = encode_extensions(extensions)?;

        let mut w = FieldWriter::with_capacity(
            TAG_TRANSFER,
            1 + 32 + 32 + SEALED_NOTE_LEN + ext_block.len(),
        );
        w.bytes32(nullifier.as_bytes());
        w.bytes32(new_commitment.as_bytes());
        w.raw(sealed.as_bytes());
        w.raw(&ext_block);

        let accounts = vec![
            AccountMeta::new(fee_payer, true),
            AccountMeta::new(self.config.treasury, false),
            AccountMeta::new(nullifier_address, false),
            AccountMeta::new(note_address, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Pay to a one-time stealth identity.
    ///
    /// Layout: `[tag][stealth_pubkey:32][ephemeral_pub:32][scan_hint:32]
    /// [payload_len:le16][payload]`
    pub fn stealth_transfer(
        &self,
        fee_payer: Pubkey,
        note_address: Pubkey,
        address: &StealthAddress,
        ephemeral_pub: &[u8; 32],
        payload: &[u8],
    ) -> Result<Instruction, InstructionError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(InstructionError::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let mut w = FieldWriter::with_capacity(
            TAG_STEALTH_TRANSFER,
            1 + 32 + 32 + 32 + 2 + payload.len(),
        );
        w.bytes32(&address.stealth_pubkey);
        w.bytes32(ephemeral_pub);
        w.bytes32(&address.scan_hint);
        w.var_bytes(payload)?;

        let accounts = vec![
            AccountMeta::new(fee_payer, true),
            AccountMeta::new(self.config.treasury, false),
            AccountMeta::new(note_address, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Spend and recreate up to [`MAX_BATCH_ITEMS`] notes at once.
    ///
    /// Layout: `[tag][count:1]` + `count × (nullifier:32 || commitment:32 ||
    /// sealed_note:64)`
    pub fn batch_transfer(
        &self,
        fee_payer: Pubkey,
        items: &[TransferItem],
    ) -> Result<Instruction, InstructionError> {
        if items.is_empty() {
            return Err(InstructionError::EmptyBatch);
        }
        if items.len() > MAX_BATCH_ITEMS {
            return Err(InstructionError::BatchTooLarge {
                max: MAX_BATCH_ITEMS,
                actual: items.len(),
            });
        }

        let mut w =
            FieldWriter::with_capacity(TAG_BATCH_TRANSFER, 2 + items.len() * BATCH_ITEM_LEN);
        w.u8(items.len() as u8);
        for item in items {
            w.bytes32(item.nullifier.as_bytes());
            w.bytes32(item.commitment.as_bytes());
            w.raw(item.sealed.as_bytes());
        }

        let accounts = vec![
            AccountMeta::new(fee_payer, true),
            AccountMeta::new(self.config.treasury, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Relay a transfer through up to [`MAX_ROUTE_HOPS`] intermediaries.
    /// Each hop identifier is opaque to everyone but that hop.
    ///
    /// Layout: `[tag][hop_count:1][session_id:32][hops:32×n]
    /// [payload_len:le16][payload]`
    pub fn routed_transfer(
        &self,
        fee_payer: Pubkey,
        relay: Pubkey,
        session_id: &[u8; 32],
        hops: &[[u8; 32]],
        payload: &[u8],
    ) -> Result<Instruction, InstructionError> {
        if hops.is_empty() {
            return Err(InstructionError::EmptyRoute);
        }
        if hops.len() > MAX_ROUTE_HOPS {
            return Err(InstructionError::TooManyHops {
                max: MAX_ROUTE_HOPS,
                actual: hops.len(),
            });
        }
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(InstructionError::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let mut w = FieldWriter::with_capacity(
            TAG_ROUTED_TRANSFER,
            2 + 32 + hops.len() * 32 + 2 + payload.len(),
        );
        w.u8(hops.len() as u8);
        w.bytes32(session_id);
        for hop in hops {
            w.bytes32(hop);
        }
        w.var_bytes(payload)?;

        let accounts = vec![
            AccountMeta::new(fee_payer, true),
            AccountMeta::new(self.config.treasury, false),
            AccountMeta::new(relay, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
        ];
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Spend one note into up to [`MAX_SPLIT_OUTPUTS`] successors whose
    /// shares sum to exactly [`SPLIT_TOTAL_BPS`].
    ///
    /// Layout: `[tag][nullifier:32][count:1]` + `count × (commitment:32 ||
    /// sealed_note:64 || share_bps:le16)`. One note account per output, in
    /// output order.
    pub fn split(
        &self,
        fee_payer: Pubkey,
        nullifier_address: Pubkey,
        note_addresses: &[Pubkey],
        nullifier: &Nullifier,
        outputs: &[SplitOutput],
    ) -> Result<Instruction, InstructionError> {
        if outputs.is_empty() {
            return Err(InstructionError::EmptySplit);
        }
        if outputs.len() > MAX_SPLIT_OUTPUTS {
            return Err(InstructionError::TooManySplitOutputs {
                max: MAX_SPLIT_OUTPUTS,
                actual: outputs.len(),
            });
        }
        if note_addresses.len() != outputs.len() {
            return Err(InstructionError::SplitAccountMismatch {
                outputs: outputs.len(),
                accounts: note_addresses.len(),
            });
        }
        let total: u32 = outputs.iter().map(|o| o.share_bps as u32).sum();
        if total != SPLIT_TOTAL_BPS as u32 {
            return Err(InstructionError::SplitShareSum(total));
        }

        let mut w = FieldWriter::with_capacity(
            TAG_SPLIT,
            2 + 32 + outputs.len() * SPLIT_OUTPUT_LEN,
        );
        w.bytes32(nullifier.as_bytes());
        w.u8(outputs.len() as u8);
        for output in outputs {
            w.bytes32(output.commitment.as_bytes());
            w.raw(output.sealed.as_bytes());
            w.u16(output.share_bps);
        }

        let mut accounts = Vec::with_capacity(4 + note_addresses.len());
        accounts.push(AccountMeta::new(fee_payer, true));
        accounts.push(AccountMeta::new(self.config.treasury, false));
        accounts.push(AccountMeta::new(nullifier_address, false));
        for note_address in note_addresses {
            accounts.push(AccountMeta::new(*note_address, false));
        }
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        Ok(self.instruction(accounts, w.finish()))
    }

    /// Disclose a record to an auditor.
    ///
    /// Layout: `[tag][reveal_kind:1][record_id:32][disclosure_key:32]`
    pub fn compliance_reveal(
        &self,
        authority: Pubkey,
        auditor: Pubkey,
        kind: RevealKind,
        record_id: &[u8; 32],
        disclosure_key: &[u8; 32],
    ) -> Instruction {
        let mut w = FieldWriter::with_capacity(TAG_COMPLIANCE_REVEAL, 66);
        w.u8(kind.code());
        w.bytes32(record_id);
        w.bytes32(disclosure_key);

        let accounts = vec![
            AccountMeta::new_readonly(authority, true),
            AccountMeta::new_readonly(auditor, false),
        ];
        self.instruction(accounts, w.finish())
    }
}
