//! Injected configuration: contract addresses and chain capabilities.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::{ERC5564_ANNOUNCER_ADDRESS, ERC6538_REGISTRY_ADDRESS};

/// Addresses of the two stealth-address contracts on one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// ERC-5564 announcer
    pub announcer: Address,
    /// ERC-6538 registry
    pub registry: Address,
}

impl ContractAddresses {
    /// The canonical singleton deployments.
    pub const fn canonical() -> Self {
        Self {
            announcer: ERC5564_ANNOUNCER_ADDRESS,
            registry: ERC6538_REGISTRY_ADDRESS,
        }
    }

    /// Overrides the announcer address.
    pub fn with_announcer(mut self, announcer: Address) -> Self {
        self.announcer = announcer;
        self
    }

    /// Overrides the registry address.
    pub fn with_registry(mut self, registry: Address) -> Self {
        self.registry = registry;
        self
    }
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self::canonical()
    }
}

/// A read capability, a write capability, and the contracts they target.
#[derive(Clone, Debug)]
pub struct ChainConfig<R, W> {
    /// Read-capable chain client
    pub reader: R,
    /// Write-capable chain client
    pub writer: W,
    /// Contract deployments
    pub contracts: ContractAddresses,
}

impl<R, W> ChainConfig<R, W> {
    /// Bundles clients with the canonical contract deployments.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            contracts: ContractAddresses::canonical(),
        }
    }

    /// Replaces the contract deployments.
    pub fn with_contracts(mut self, contracts: ContractAddresses) -> Self {
        self.contracts = contracts;
        self
    }
}
