//! Read capability over JSON-RPC.

use std::fmt;

use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use shroud_core::call::ContractCall;
use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::ChainReader;
use shroud_core::types::PreparedRequest;

/// [`ChainReader`] backed by an HTTP JSON-RPC endpoint.
///
/// Simulations run as `from` when a signing identity is known, so the node
/// sees the same `msg.sender` the submitted transaction will carry.
#[derive(Clone)]
pub struct RpcReader {
    provider: DynProvider,
    from: Option<Address>,
}

impl RpcReader {
    /// Connects to `rpc_url`. No request is made until first use.
    pub fn new(rpc_url: Url, from: Option<Address>) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self { provider, from }
    }

    /// Address simulations are run from.
    pub fn sender(&self) -> Option<Address> {
        self.from
    }

    fn request(&self, call: &ContractCall) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .to(call.target())
            .input(call.encode().into());
        if let Some(from) = self.from {
            tx = tx.from(from);
        }
        tx
    }
}

impl fmt::Debug for RpcReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcReader").field("from", &self.from).finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainReader for RpcReader {
    /// `eth_call` then `eth_estimateGas`. A revert surfaces as the node's
    /// error, unchanged.
    #[instrument(skip(self, call), fields(function = call.function()))]
    async fn simulate(&self, call: &ContractCall) -> Result<Option<PreparedRequest>> {
        let tx = self.request(call);

        self.provider.call(tx.clone()).await.map_err(ShroudError::chain)?;
        let gas_limit = self.provider.estimate_gas(tx).await.map_err(ShroudError::chain)?;
        debug!(gas_limit, "Simulation succeeded");

        Ok(Some(PreparedRequest {
            to: call.target(),
            from: self.from,
            input: call.encode(),
            gas_limit: Some(gas_limit),
        }))
    }

    #[instrument(skip(self, call), fields(function = call.function()))]
    async fn read(&self, call: &ContractCall) -> Result<Option<Bytes>> {
        let data = self
            .provider
            .call(self.request(call))
            .await
            .map_err(ShroudError::chain)?;

        if data.is_empty() {
            debug!("Call returned no data");
            return Ok(None);
        }
        Ok(Some(data))
    }

    async fn block_number(&self) -> Result<Option<u64>> {
        let block_number = self.provider.get_block_number().await.map_err(ShroudError::chain)?;
        Ok(Some(block_number))
    }

    #[instrument(skip(self))]
    async fn logs(&self, contract: Address, from_block: u64, to_block: u64) -> Result<Vec<Log>> {
        let filter = Filter::new()
            .address(contract)
            .from_block(from_block)
            .to_block(to_block);

        let logs = self.provider.get_logs(&filter).await.map_err(ShroudError::chain)?;
        debug!(count = logs.len(), "Fetched logs");
        Ok(logs)
    }
}
