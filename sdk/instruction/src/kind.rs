//! Operation tag registry.
//!
//! One flat, unversioned byte-valued space. A new operation permanently
//! consumes an unused value; a retired value is never reused.

use serde::{Deserialize, Serialize};

use crate::InstructionError;

pub const TAG_NOTE_CREATE: u8 = 1;
pub const TAG_NULLIFIER_CHECK: u8 = 2;
pub const TAG_NULLIFIER_CREATE: u8 = 3;
pub const TAG_TRANSFER: u8 = 4;
pub const TAG_STEALTH_TRANSFER: u8 = 5;
pub const TAG_BATCH_TRANSFER: u8 = 6;
pub const TAG_ROUTED_TRANSFER: u8 = 7;
pub const TAG_SPLIT: u8 = 8;
pub const TAG_COMPLIANCE_REVEAL: u8 = 9;

/// The closed set of operations this encoder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionKind {
    NoteCreate,
    NullifierCheck,
    NullifierCreate,
    Transfer,
    StealthTransfer,
    BatchTransfer,
    RoutedTransfer,
    Split,
    ComplianceReveal,
}

impl InstructionKind {
    pub fn tag(self) -> u8 {
        match self {
            InstructionKind::NoteCreate => TAG_NOTE_CREATE,
            InstructionKind::NullifierCheck => TAG_NULLIFIER_CHECK,
            InstructionKind::NullifierCreate => TAG_NULLIFIER_CREATE,
            InstructionKind::Transfer => TAG_TRANSFER,
            InstructionKind::StealthTransfer => TAG_STEALTH_TRANSFER,
            InstructionKind::BatchTransfer => TAG_BATCH_TRANSFER,
            InstructionKind::RoutedTransfer => TAG_ROUTED_TRANSFER,
            InstructionKind::Split => TAG_SPLIT,
            InstructionKind::ComplianceReveal => TAG_COMPLIANCE_REVEAL,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_NOTE_CREATE => Some(InstructionKind::NoteCreate),
            TAG_NULLIFIER_CHECK => Some(InstructionKind::NullifierCheck),
            TAG_NULLIFIER_CREATE => Some(InstructionKind::NullifierCreate),
            TAG_TRANSFER => Some(InstructionKind::Transfer),
            TAG_STEALTH_TRANSFER => Some(InstructionKind::StealthTransfer),
            TAG_BATCH_TRANSFER => Some(InstructionKind::BatchTransfer),
            TAG_ROUTED_TRANSFER => Some(InstructionKind::RoutedTransfer),
            TAG_SPLIT => Some(InstructionKind::Split),
            TAG_COMPLIANCE_REVEAL => Some(InstructionKind::ComplianceReveal),
            _ => None,
        }
    }
}

/// What a compliance disclosure reveals to the auditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealKind {
    Full,
    AmountOnly,
    RecipientOnly,
    MetadataOnly,
}

impl RevealKind {
    pub fn code(self) -> u8 {
        match self {
            RevealKind::Full => 0,
            RevealKind::AmountOnly => 1,
            RevealKind::RecipientOnly => 2,
            RevealKind::MetadataOnly => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, InstructionError> {
        match code {
            0 => Ok(RevealKind::Full),
            1 => Ok(RevealKind::AmountOnly),
            2 => Ok(RevealKind::RecipientOnly),
            3 => Ok(RevealKind::MetadataOnly),
            other => Err(InstructionError::UnknownRevealKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InstructionKind; 9] = [
        InstructionKind::NoteCreate,
        InstructionKind::NullifierCheck,
        InstructionKind::NullifierCreate,
        InstructionKind::Transfer,
        InstructionKind::StealthTransfer,
        InstructionKind::BatchTransfer,
        InstructionKind::RoutedTransfer,
        InstructionKind::Split,
        InstructionKind::ComplianceReveal,
    ];

    #[test]
    fn tags_are_unique_and_roundtrip() {
        let mut seen = std::collections::HashSet::new();
        for kind in ALL {
            assert!(seen.insert(kind.tag()), "duplicate tag {}", kind.tag());
            assert_eq!(InstructionKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unassigned_tag_is_rejected() {
        assert_eq!(InstructionKind::from_tag(0), None);
        assert_eq!(InstructionKind::from_tag(200), None);
    }

    #[test]
    fn reveal_kind_roundtrip_and_range() {
        for code in 0..=3 {
            assert_eq!(RevealKind::from_code(code).expect("in range").code(), code);
        }
        assert_eq!(
            RevealKind::from_code(4),
            Err(InstructionError::UnknownRevealKind(4))
        );
    }
}
