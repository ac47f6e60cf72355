//! Stealth address derivation and recipient-side recovery.
//!
//! The scan hint lets a recipient (or an indexer acting for one) cheaply
//! shortlist candidate payments without trial-decrypting every note on the
//! ledger; only the holder of the spend secret can confirm a match.

use serde::{Deserialize, Serialize};

use crate::StealthError;
use crate::keys::{SharedKey, StealthKeypair};

/// Domain context for stealth identities. Changing this is a protocol break.
const STEALTH_ADDRESS_CONTEXT: &str = "sable stealth address v1";

/// Domain context for scan hints. Changing this is a protocol break.
const SCAN_HINT_CONTEXT: &str = "sable scan hint v1";

/// A one-time recipient identifier plus its recognizability hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthAddress {
    /// Unlinkable identifier the payment is addressed to
    pub stealth_pubkey: [u8; 32],
    /// Cheap recognition hint derived from the sender's ephemeral key
    pub scan_hint: [u8; 32],
}

fn stealth_from_parts(
    shared: &SharedKey,
    recipient_spend_pub: &[u8; 32],
    ephemeral_pub: &[u8; 32],
) -> StealthAddress {
    let mut hasher = blake3::Hasher::new_derive_key(STEALTH_ADDRESS_CONTEXT);
    hasher.update(shared.as_bytes());
    hasher.update(recipient_spend_pub);
    let stealth_pubkey = *hasher.finalize().as_bytes();

    let mut hasher = blake3::Hasher::new_derive_key(SCAN_HINT_CONTEXT);
    hasher.update(ephemeral_pub);
    let scan_hint = *hasher.finalize().as_bytes();

    StealthAddress {
        stealth_pubkey,
        scan_hint,
    }
}

/// Sender side: derive the one-time address for a payment.
///
/// `sender_ephemeral` must be freshly generated per payment; its public half
/// is published beside the payment so the recipient can recover the address.
pub fn generate_stealth_address(
    recipient_spend_pub: &[u8; 32],
    sender_ephemeral: &StealthKeypair,
) -> Result<StealthAddress, StealthError> {
    let shared = sender_ephemeral.diffie_hellman(recipient_spend_pub)?;
    Ok(stealth_from_parts(
        &shared,
        recipient_spend_pub,
        &sender_ephemeral.public_bytes(),
    ))
}

/// Recipient side: recompute the address a sender would have derived.
///
/// Equality with an on-ledger identity means the payment is ours.
pub fn recover_stealth_address(
    recipient: &StealthKeypair,
    sender_ephemeral_pub: &[u8; 32],
) -> Result<StealthAddress, StealthError> {
    let shared = recipient.diffie_hellman(sender_ephemeral_pub)?;
    Ok(stealth_from_parts(
        &shared,
        &recipient.public_bytes(),
        sender_ephemeral_pub,
    ))
}
