//! Injected protocol parameters.
//!
//! Deployment-specific addresses are constructor inputs, not module
//! constants, so pointing the SDK at another network never requires a
//! recompile.

use serde::{Deserialize, Serialize};

use sable_pubkey::Pubkey;

/// Addresses a deployment of the note program is reached at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// The note program's on-chain address
    pub program_id: Pubkey,
    /// Where fee-collecting operations route their fees
    pub treasury: Pubkey,
}

impl ProtocolConfig {
    pub fn new(program_id: Pubkey, treasury: Pubkey) -> Self {
        Self {
            program_id,
            treasury,
        }
    }
}
