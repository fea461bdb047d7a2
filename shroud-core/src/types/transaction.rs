//! Transaction types surfaced by the write protocol.

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// An executable request produced by a successful simulation.
///
/// Only [`pipeline::simulate`](crate::pipeline::simulate) hands these out
/// wrapped in a `ValidatedRequest`, so a request reaching a writer has
/// always been simulated first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRequest {
    /// Target contract
    pub to: Address,
    /// Account the simulation ran from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// ABI-encoded calldata
    pub input: Bytes,
    /// Gas estimate from the simulation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

/// Outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: B256,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Hash of that block
    pub block_hash: Option<B256>,
    /// Sender
    pub from: Address,
    /// Recipient contract
    pub to: Option<Address>,
    /// Gas consumed
    pub gas_used: u64,
    /// `true` if execution succeeded, `false` if it reverted
    pub status: bool,
}

impl TransactionReceipt {
    /// Returns true if the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        self.status
    }
}
