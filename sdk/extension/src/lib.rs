//! Sable note extensions
//!
//! Zero or more typed behavioral attributes ride on a note as a TLV block:
//!
//! ```text
//! [count:1] then count records of [type:1][len:1][payload:len]
//! ```
//!
//! Every type has a fixed payload layout, so `len` is redundant on encode
//! and cross-checked on decode. Integers are little-endian. The type-code
//! registry is closed: encoding an unknown extension is unrepresentable and
//! decoding an unknown code fails instead of guessing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sable_pubkey::Pubkey;

/// Hard cap on records per block (the count prefix is one byte).
pub const MAX_EXTENSIONS: usize = 255;

/// Type-code registry. A retired code is never reused.
pub const TYPE_FEE: u8 = 1;
pub const TYPE_ROYALTY: u8 = 2;
pub const TYPE_INTEREST: u8 = 3;
pub const TYPE_VESTING: u8 = 4;
pub const TYPE_DELEGATION: u8 = 5;
pub const TYPE_SOULBOUND: u8 = 6;
pub const TYPE_METADATA: u8 = 7;

/// A per-note behavioral extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extension {
    /// Transfer fee routed to a collector, in basis points
    Fee { collector: Pubkey, bps: u16 },
    /// Creator royalty on each transfer, in basis points
    Royalty { recipient: Pubkey, bps: u16 },
    /// Interest accrual from a fixed start time
    Interest { rate_bps: u16, accrual_start: u64 },
    /// Linear vesting schedule (unix seconds)
    Vesting { start: u64, duration: u64 },
    /// Spend authority delegated until expiry (unix seconds)
    Delegation { delegate: Pubkey, expiry: u64 },
    /// Note is bound to its owner and refuses transfer
    Soulbound,
    /// Content-addressed off-ledger metadata
    Metadata { content_hash: [u8; 32] },
}

/// TLV codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("too many extensions: max {MAX_EXTENSIONS}, got {0}")]
    TooMany(usize),

    #[error("unknown extension type code {0}")]
    UnknownType(u8),

    #[error("truncated extension block: needed {needed} more bytes, {remaining} remain")]
    Truncated { needed: usize, remaining: usize },

    #[error("extension type {code} declares length {declared}, schema requires {expected}")]
    LengthMismatch {
        code: u8,
        declared: usize,
        expected: usize,
    },

    #[error("{0} trailing bytes after final extension record")]
    TrailingBytes(usize),
}

impl Extension {
    pub fn type_code(&self) -> u8 {
        match self {
            Extension::Fee { .. } => TYPE_FEE,
            Extension::Royalty { .. } => TYPE_ROYALTY,
            Extension::Interest { .. } => TYPE_INTEREST,
            Extension::Vesting { .. } => TYPE_VESTING,
            Extension::Delegation { .. } => TYPE_DELEGATION,
            Extension::Soulbound => TYPE_SOULBOUND,
            Extension::Metadata { .. } => TYPE_METADATA,
        }
    }

    /// Fixed payload length for a registered type code.
    pub fn payload_len_for(code: u8) -> Result<usize, ExtensionError> {
        match code {
            TYPE_FEE => Ok(34),
            TYPE_ROYALTY => Ok(34),
            TYPE_INTEREST => Ok(10),
            TYPE_VESTING => Ok(16),
            TYPE_DELEGATION => Ok(40),
            TYPE_SOULBOUND => Ok(0),
            TYPE_METADATA => Ok(32),
            other => Err(ExtensionError::UnknownType(other)),
        }
    }

    pub fn payload_len(&self) -> usize {
        Self::payload_len_for(self.type_code()).expect("registered code")
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        match self {
            Extension::Fee { collector, bps } => {
                out.extend_from_slice(collector.as_bytes());
                out.extend_from_slice(&bps.to_le_bytes());
            }
            Extension::Royalty { recipient, bps } => {
                out.extend_from_slice(recipient.as_bytes());
                out.extend_from_slice(&bps.to_le_bytes());
            }
            Extension::Interest {
                rate_bps,
                accrual_start,
            } => {
                out.extend_from_slice(&rate_bps.to_le_bytes());
                out.extend_from_slice(&accrual_start.to_le_bytes());
            }
            Extension::Vesting { start, duration } => {
                out.extend_from_slice(&start.to_le_bytes());
                out.extend_from_slice(&duration.to_le_bytes());
            }
            Extension::Delegation { delegate, expiry } => {
                out.extend_from_slice(delegate.as_bytes());
                out.extend_from_slice(&expiry.to_le_bytes());
            }
            Extension::Soulbound => {}
            Extension::Metadata { content_hash } => {
                out.extend_from_slice(content_hash);
            }
        }
    }

    fn read_payload(code: u8, payload: &[u8]) -> Result<Self, ExtensionError> {
        // Caller has already checked payload.len() against the schema.
        Ok(match code {
            TYPE_FEE => Extension::Fee {
                collector: Pubkey(payload[..32].try_into().expect("fixed slice")),
                bps: u16::from_le_bytes(payload[32..34].try_into().expect("fixed slice")),
            },
            TYPE_ROYALTY => Extension::Royalty {
                recipient: Pubkey(payload[..32].try_into().expect("fixed slice")),
                bps: u16::from_le_bytes(payload[32..34].try_into().expect("fixed slice")),
            },
            TYPE_INTEREST => Extension::Interest {
                rate_bps: u16::from_le_bytes(payload[..2].try_into().expect("fixed slice")),
                accrual_start: u64::from_le_bytes(payload[2..10].try_into().expect("fixed slice")),
            },
            TYPE_VESTING => Extension::Vesting {
                start: u64::from_le_bytes(payload[..8].try_into().expect("fixed slice")),
                duration: u64::from_le_bytes(payload[8..16].try_into().expect("fixed slice")),
            },
            TYPE_DELEGATION => Extension::Delegation {
                delegate: Pubkey(payload[..32].try_into().expect("fixed slice")),
                expiry: u64::from_le_bytes(payload[32..40].try_into().expect("fixed slice")),
            },
            TYPE_SOULBOUND => Extension::Soulbound,
            TYPE_METADATA => Extension::Metadata {
                content_hash: payload[..32].try_into().expect("fixed slice"),
            },
            other => return Err(ExtensionError::UnknownType(other)),
        })
    }
}

/// Encode a TLV block: `[count:1]` then one record per extension, in caller
/// order. Fails before emitting anything if the list exceeds the count
/// prefix.
pub fn encode_extensions(list: &[Extension]) -> Result<Vec<u8>, ExtensionError> {
    if list.len() > MAX_EXTENSIONS {
        return Err(ExtensionError::TooMany(list.len()));
    }

    let body: usize = list.iter().map(|e| 2 + e.payload_len()).sum();
    let mut out = Vec::with_capacity(1 + body);
    out.push(list.len() as u8);
    for ext in list {
        out.push(ext.type_code());
        out.push(ext.payload_len() as u8);
        ext.write_payload(&mut out);
    }
    Ok(out)
}

/// Decode a TLV block. Exact inverse of [`encode_extensions`]; order is
/// preserved. Fails on truncation, a declared length that overruns the
/// buffer or contradicts the type's schema, an unknown code, or trailing
/// bytes.
pub fn decode_extensions(bytes: &[u8]) -> Result<Vec<Extension>, ExtensionError> {
    if bytes.is_empty() {
        return Err(ExtensionError::Truncated {
            needed: 1,
            remaining: 0,
        });
    }
    let count = bytes[0] as usize;
    let mut offset = 1;
    let mut list = Vec::with_capacity(count);

    for _ in 0..count {
        if bytes.len() < offset + 2 {
            return Err(ExtensionError::Truncated {
                needed: offset + 2 - bytes.len(),
                remaining: bytes.len() - offset,
            });
        }
        let code = bytes[offset];
        let declared = bytes[offset + 1] as usize;
        offset += 2;

        let expected = Extension::payload_len_for(code)?;
        if declared != expected {
            return Err(ExtensionError::LengthMismatch {
                code,
                declared,
                expected,
            });
        }
        if bytes.len() < offset + declared {
            return Err(ExtensionError::Truncated {
                needed: offset + declared - bytes.len(),
                remaining: bytes.len() - offset,
            });
        }

        list.push(Extension::read_payload(code, &bytes[offset..offset + declared])?);
        offset += declared;
    }

    if offset != bytes.len() {
        return Err(ExtensionError::TrailingBytes(bytes.len() - offset));
    }
    Ok(list)
}
