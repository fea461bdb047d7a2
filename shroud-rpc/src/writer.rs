//! Write capability over JSON-RPC with a local signer.
//!
//! SECURITY: the private key lives only inside alloy's `PrivateKeySigner`,
//! wrapped in an `EthereumWallet`. It is never logged or serialised.

use std::fmt;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use shroud_core::error::{Result, ShroudError};
use shroud_core::traits::ChainWriter;
use shroud_core::types::{PreparedRequest, TransactionReceipt};

/// [`ChainWriter`] that signs locally and sends through an HTTP endpoint.
///
/// Without a signer the writer still connects, but [`ChainWriter::signer`]
/// reports `None` and the node refuses unsigned submissions.
#[derive(Clone)]
pub struct RpcWriter {
    provider: DynProvider,
    signer: Option<Address>,
}

impl RpcWriter {
    /// Connects to `rpc_url`, signing with `signer` when given.
    pub fn new(rpc_url: Url, signer: Option<PrivateKeySigner>) -> Self {
        let address = signer.as_ref().map(|signer| signer.address());
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(rpc_url)
                .erased(),
            None => ProviderBuilder::new().connect_http(rpc_url).erased(),
        };

        Self {
            provider,
            signer: address,
        }
    }

    fn transaction(&self, request: PreparedRequest) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .to(request.to)
            .input(request.input.into());
        if let Some(from) = request.from.or(self.signer) {
            tx = tx.from(from);
        }
        if let Some(gas_limit) = request.gas_limit {
            tx = tx.gas_limit(gas_limit);
        }
        tx
    }
}

impl fmt::Debug for RpcWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWriter")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainWriter for RpcWriter {
    fn signer(&self) -> Option<Address> {
        self.signer
    }

    #[instrument(skip(self, request), fields(to = %request.to))]
    async fn submit(&self, request: PreparedRequest) -> Result<B256> {
        let pending = self
            .provider
            .send_transaction(self.transaction(request))
            .await
            .map_err(ShroudError::chain)?;

        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Transaction sent");
        Ok(tx_hash)
    }

    /// Waits on alloy's pending-transaction watcher, which polls at the
    /// client's interval. There is no timeout.
    #[instrument(skip(self))]
    async fn wait_for_inclusion(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(ShroudError::chain)?;

        debug!(block_number = ?receipt.block_number(), "Receipt available");
        Ok(to_receipt(&receipt))
    }
}

fn to_receipt<R: ReceiptResponse>(receipt: &R) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: receipt.transaction_hash(),
        block_number: receipt.block_number(),
        block_hash: receipt.block_hash(),
        from: receipt.from(),
        to: receipt.to(),
        gas_used: receipt.gas_used(),
        status: receipt.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes};
    use std::str::FromStr;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn url() -> Url {
        Url::parse("http://localhost:8545").unwrap()
    }

    fn request(from: Option<Address>, gas_limit: Option<u64>) -> PreparedRequest {
        PreparedRequest {
            to: Address::repeat_byte(0x55),
            from,
            input: Bytes::from(vec![0xde, 0xad]),
            gas_limit,
        }
    }

    #[test]
    fn test_signer_address() {
        let signer = PrivateKeySigner::from_str(TEST_KEY).unwrap();
        let writer = RpcWriter::new(url(), Some(signer));

        assert_eq!(writer.signer(), Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")));
    }

    #[test]
    fn test_without_signer() {
        let writer = RpcWriter::new(url(), None);
        assert_eq!(writer.signer(), None);
    }

    #[test]
    fn test_transaction_carries_simulated_request() {
        let writer = RpcWriter::new(url(), None);
        let from = Address::repeat_byte(0x01);

        let tx = writer.transaction(request(Some(from), Some(60_000)));

        assert_eq!(tx.to, Some(Address::repeat_byte(0x55).into()));
        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.gas, Some(60_000));
        assert_eq!(tx.input.input().cloned(), Some(Bytes::from(vec![0xde, 0xad])));
    }

    #[test]
    fn test_transaction_defaults_sender_to_signer() {
        let signer = PrivateKeySigner::from_str(TEST_KEY).unwrap();
        let writer = RpcWriter::new(url(), Some(signer));

        let tx = writer.transaction(request(None, None));

        assert_eq!(tx.from, writer.signer());
        assert_eq!(tx.gas, None);
    }

    #[test]
    fn test_debug_redacts_signer_key() {
        let signer = PrivateKeySigner::from_str(TEST_KEY).unwrap();
        let writer = RpcWriter::new(url(), Some(signer));

        assert!(!format!("{writer:?}").contains("ac0974bec"));
    }
}
