//! Registry client.
//!
//! Registers and resolves stealth meta-addresses through the ERC-6538
//! registry contract.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolValue;
use tracing::{debug, info, instrument};

use shroud_core::call::ContractCall;
use shroud_core::config::ChainConfig;
use shroud_core::constants::is_zero_sentinel;
use shroud_core::error::{Result, ShroudError};
use shroud_core::pipeline;
use shroud_core::traits::{ChainReader, ChainWriter};
use shroud_core::types::{SchemeId, StealthMetaAddress, TransactionReceipt};

/// Parameters of [`RegistryClient::register_keys`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterKeysParams {
    /// Scheme the meta-address belongs to
    pub scheme_id: SchemeId,
    /// Meta-address to publish for the signer
    pub stealth_meta_address: StealthMetaAddress,
}

/// Parameters of [`RegistryClient::get_stealth_meta_address_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthMetaAddressQuery {
    /// Scheme to look up
    pub scheme_id: SchemeId,
    /// Receiver whose entry is read
    pub receiver: Address,
}

/// Client for the ERC-6538 registry.
///
/// Stateless: every call goes straight to the chain capabilities in its
/// [`ChainConfig`].
#[derive(Clone, Debug)]
pub struct RegistryClient<R, W> {
    config: ChainConfig<R, W>,
}

impl<R, W> RegistryClient<R, W>
where
    R: ChainReader,
    W: ChainWriter,
{
    /// Creates a client over the given configuration.
    pub fn new(config: ChainConfig<R, W>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChainConfig<R, W> {
        &self.config
    }

    /// Registry contract this client targets.
    pub fn registry(&self) -> Address {
        self.config.contracts.registry
    }

    /// Publishes the signer's stealth meta-address for a scheme.
    ///
    /// # Flow
    /// 1. Require a signing identity on the writer
    /// 2. Simulate `registerKeys(schemeId, metaAddress)`
    /// 3. Submit exactly one transaction
    /// 4. Wait for inclusion and return the receipt
    ///
    /// # Errors
    /// [`ShroudError::MissingSigningIdentity`] if the writer has no signer,
    /// whatever the simulation would have said, and
    /// [`ShroudError::SimulationFailure`] if simulation yields no request.
    /// In both cases nothing is submitted.
    #[instrument(skip(self, params), fields(scheme_id = %params.scheme_id, registry = %self.registry()))]
    pub async fn register_keys(&self, params: RegisterKeysParams) -> Result<TransactionReceipt> {
        let call = ContractCall::RegisterKeys {
            registry: self.registry(),
            scheme_id: params.scheme_id,
            stealth_meta_address: params.stealth_meta_address,
        };

        let signer = self
            .config
            .writer
            .signer()
            .ok_or(ShroudError::MissingSigningIdentity)?;
        debug!(%signer, "Registering keys");

        let validated = pipeline::simulate(&self.config.reader, &call).await?;

        let receipt = validated
            .submit(&self.config.writer)
            .await?
            .confirm(&self.config.writer)
            .await?;

        info!(tx_hash = %receipt.transaction_hash, success = receipt.is_success(), "Keys registered");
        Ok(receipt)
    }

    /// Reads the stealth meta-address a receiver registered for a scheme.
    ///
    /// Returns `None` when the registry has nothing for the pair: no return
    /// data or the all-zero 32-byte sentinel. Any other value, including an
    /// empty one, is returned byte for byte.
    #[instrument(skip(self, query), fields(scheme_id = %query.scheme_id, receiver = %query.receiver))]
    pub async fn get_stealth_meta_address_of(
        &self,
        query: StealthMetaAddressQuery,
    ) -> Result<Option<StealthMetaAddress>> {
        let call = ContractCall::StealthMetaAddressOf {
            registry: self.registry(),
            registrant: query.receiver,
            scheme_id: query.scheme_id,
        };

        let Some(data) = self.config.reader.read(&call).await? else {
            debug!("Registry returned no data");
            return Ok(None);
        };

        let value = decode_meta_address(&data)?;
        if is_zero_sentinel(&value) {
            debug!("No meta-address registered");
            return Ok(None);
        }

        Ok(Some(StealthMetaAddress::new(value)))
    }
}

/// Decodes `stealthMetaAddressOf` return data (a single ABI `bytes`).
fn decode_meta_address(data: &[u8]) -> Result<Bytes> {
    if is_zero_sentinel(data) {
        // Some clients hand back the bare sentinel word instead of ABI bytes.
        return Ok(Bytes::copy_from_slice(data));
    }
    <Bytes as SolValue>::abi_decode(data).map_err(|e| ShroudError::AbiDecode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shroud_core::config::ContractAddresses;
    use shroud_core::testing::{ChainEvent, MockChain, Step, TEST_SIGNER};
    use test_case::test_case;

    fn meta_address() -> StealthMetaAddress {
        // 33-byte spending key || 33-byte viewing key
        let mut bytes = vec![0x02; 33];
        bytes.extend_from_slice(&[0x03; 33]);
        StealthMetaAddress::new(bytes)
    }

    fn client(chain: &Arc<MockChain>) -> RegistryClient<Arc<MockChain>, Arc<MockChain>> {
        RegistryClient::new(ChainConfig::new(chain.clone(), chain.clone()))
    }

    fn params() -> RegisterKeysParams {
        RegisterKeysParams {
            scheme_id: SchemeId::SECP256K1,
            stealth_meta_address: meta_address(),
        }
    }

    #[tokio::test]
    async fn test_register_keys_returns_successful_receipt() {
        let chain = Arc::new(MockChain::new());

        let receipt = client(&chain).register_keys(params()).await.unwrap();

        assert!(receipt.is_success());
        assert_eq!(receipt.from, TEST_SIGNER);

        let submitted = chain.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].to, ContractAddresses::canonical().registry);
    }

    #[tokio::test]
    async fn test_register_keys_call_order() {
        let chain = Arc::new(MockChain::new());

        client(&chain).register_keys(params()).await.unwrap();

        let events = chain.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ChainEvent::Simulate(ContractCall::RegisterKeys { .. })));
        assert!(matches!(&events[1], ChainEvent::Submit(_)));
        assert!(matches!(&events[2], ChainEvent::WaitForInclusion(_)));
    }

    #[tokio::test]
    async fn test_register_keys_never_submits_without_simulation() {
        let chain = Arc::new(MockChain::new().with_simulation(false));

        let err = client(&chain).register_keys(params()).await.unwrap_err();

        assert!(matches!(err, ShroudError::SimulationFailure { function: "registerKeys" }));
        assert!(chain.submitted().is_empty());
    }

    #[test_case(true ; "simulation succeeds")]
    #[test_case(false ; "simulation fails")]
    #[tokio::test]
    async fn test_register_keys_requires_signer(simulation_succeeds: bool) {
        let chain = Arc::new(
            MockChain::new()
                .without_signer()
                .with_simulation(simulation_succeeds),
        );

        let err = client(&chain).register_keys(params()).await.unwrap_err();

        assert!(matches!(err, ShroudError::MissingSigningIdentity));
        assert!(err.is_pre_flight());
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_register_keys_without_signer_touches_no_chain() {
        let chain = Arc::new(MockChain::new().without_signer());

        client(&chain).register_keys(params()).await.unwrap_err();

        assert!(chain.events().is_empty());
    }

    #[test_case(Step::Simulate ; "simulate")]
    #[test_case(Step::Submit ; "submit")]
    #[test_case(Step::WaitForInclusion ; "wait for inclusion")]
    #[tokio::test]
    async fn test_register_keys_propagates_chain_errors(step: Step) {
        let chain = Arc::new(MockChain::new().failing_at(step));

        let err = client(&chain).register_keys(params()).await.unwrap_err();

        assert!(err.is_chain_error());
    }

    #[tokio::test]
    async fn test_reverted_registration_is_surfaced() {
        let chain = Arc::new(MockChain::new().with_receipt_status(false));

        let receipt = client(&chain).register_keys(params()).await.unwrap();

        assert!(!receipt.is_success());
    }

    #[tokio::test]
    async fn test_register_then_resolve() {
        let chain = Arc::new(MockChain::new());
        let client = client(&chain);

        client.register_keys(params()).await.unwrap();

        let resolved = client
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver: TEST_SIGNER,
            })
            .await
            .unwrap();

        assert_eq!(resolved, Some(meta_address()));
    }

    #[tokio::test]
    async fn test_resolve_reads_receiver_and_scheme() {
        let receiver = Address::repeat_byte(0x11);
        let chain = Arc::new(MockChain::new());

        client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId(2),
                receiver,
            })
            .await
            .unwrap();

        assert_eq!(
            chain.events(),
            vec![ChainEvent::Read(ContractCall::StealthMetaAddressOf {
                registry: ContractAddresses::canonical().registry,
                registrant: receiver,
                scheme_id: SchemeId(2),
            })]
        );
    }

    #[tokio::test]
    async fn test_resolve_zero_sentinel_is_absent() {
        let receiver = Address::repeat_byte(0x11);
        let chain = Arc::new(MockChain::new().with_registry_entry(
            receiver,
            1,
            Bytes::from(vec![0u8; 32]),
        ));

        let resolved = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver,
            })
            .await
            .unwrap();

        assert_eq!(resolved, None);
    }

    #[test_case(None ; "no return data")]
    #[test_case(Some(Bytes::from(vec![0u8; 32])) ; "bare sentinel word")]
    #[tokio::test]
    async fn test_resolve_absent_responses(response: Option<Bytes>) {
        let chain = Arc::new(MockChain::new().with_read_response(response));

        let resolved = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver: Address::repeat_byte(0x22),
            })
            .await
            .unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_resolve_empty_value_is_returned() {
        let receiver = Address::repeat_byte(0x66);
        let chain = Arc::new(MockChain::new().with_registry_entry(receiver, 1, Bytes::new()));

        let resolved = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver,
            })
            .await
            .unwrap();

        assert_eq!(resolved, Some(StealthMetaAddress::new(Bytes::new())));
    }

    #[tokio::test]
    async fn test_resolve_returns_exact_bytes() {
        // Non-zero 32-byte value must not be mistaken for the sentinel.
        let mut value = vec![0u8; 32];
        value[0] = 1;
        let receiver = Address::repeat_byte(0x33);
        let chain = Arc::new(MockChain::new().with_registry_entry(receiver, 1, Bytes::from(value.clone())));

        let resolved = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver,
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.as_bytes(), value.as_slice());
    }

    #[tokio::test]
    async fn test_resolve_malformed_return_data() {
        let chain = Arc::new(MockChain::new().with_read_response(Some(Bytes::from(vec![0xff; 7]))));

        let err = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver: Address::repeat_byte(0x44),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ShroudError::AbiDecode(_)));
    }

    #[tokio::test]
    async fn test_resolve_propagates_read_failure() {
        let chain = Arc::new(MockChain::new().failing_at(Step::Read));

        let err = client(&chain)
            .get_stealth_meta_address_of(StealthMetaAddressQuery {
                scheme_id: SchemeId::SECP256K1,
                receiver: Address::repeat_byte(0x55),
            })
            .await
            .unwrap_err();

        assert!(err.is_chain_error());
    }

    #[tokio::test]
    async fn test_custom_registry_address() {
        let registry = Address::repeat_byte(0x65);
        let chain = Arc::new(MockChain::new());
        let client = RegistryClient::new(
            ChainConfig::new(chain.clone(), chain.clone())
                .with_contracts(ContractAddresses::canonical().with_registry(registry)),
        );

        client.register_keys(params()).await.unwrap();

        assert_eq!(chain.submitted()[0].to, registry);
    }
}
