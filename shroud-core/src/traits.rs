//! Chain client capability traits.
//!
//! The clients in `shroud-registry` and `shroud-announcer` only talk to the
//! chain through these two traits. `shroud-rpc` implements them over
//! JSON-RPC; tests implement them in memory.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::Log;
use async_trait::async_trait;

use crate::call::ContractCall;
use crate::error::Result;
use crate::types::{PreparedRequest, TransactionReceipt};

// ═══════════════════════════════════════════════════════════════════════════════
// READ CAPABILITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Read access to a chain.
///
/// Absence is `Ok(None)`; chain client failures are `Err`.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Simulates a state-changing call.
    ///
    /// Returns the executable request if the call would succeed.
    async fn simulate(&self, call: &ContractCall) -> Result<Option<PreparedRequest>>;

    /// Executes a view call and returns its raw return data.
    async fn read(&self, call: &ContractCall) -> Result<Option<Bytes>>;

    /// Returns the current block height.
    async fn block_number(&self) -> Result<Option<u64>>;

    /// Returns logs emitted by `contract` in `[from_block, to_block]`, in chain order.
    async fn logs(&self, contract: Address, from_block: u64, to_block: u64) -> Result<Vec<Log>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITE CAPABILITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Write access to a chain.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Address of the signing identity, if one is configured.
    fn signer(&self) -> Option<Address>;

    /// Signs and submits a prepared request, returning the transaction hash.
    async fn submit(&self, request: PreparedRequest) -> Result<B256>;

    /// Blocks until the transaction is included and returns its receipt.
    async fn wait_for_inclusion(&self, tx_hash: B256) -> Result<TransactionReceipt>;
}

#[async_trait]
impl<T: ChainReader + ?Sized> ChainReader for Arc<T> {
    async fn simulate(&self, call: &ContractCall) -> Result<Option<PreparedRequest>> {
        (**self).simulate(call).await
    }

    async fn read(&self, call: &ContractCall) -> Result<Option<Bytes>> {
        (**self).read(call).await
    }

    async fn block_number(&self) -> Result<Option<u64>> {
        (**self).block_number().await
    }

    async fn logs(&self, contract: Address, from_block: u64, to_block: u64) -> Result<Vec<Log>> {
        (**self).logs(contract, from_block, to_block).await
    }
}

#[async_trait]
impl<T: ChainWriter + ?Sized> ChainWriter for Arc<T> {
    fn signer(&self) -> Option<Address> {
        (**self).signer()
    }

    async fn submit(&self, request: PreparedRequest) -> Result<B256> {
        (**self).submit(request).await
    }

    async fn wait_for_inclusion(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        (**self).wait_for_inclusion(tx_hash).await
    }
}
