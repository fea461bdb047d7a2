//! Typed contract calls.
//!
//! Operations describe what they want from the chain as a [`ContractCall`];
//! chain client implementations only need [`ContractCall::target`] and
//! [`ContractCall::encode`] to execute it.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use crate::abi::{IERC5564Announcer, IERC6538Registry};
use crate::types::{SchemeId, StealthMetaAddress};

/// A call into the registry or announcer contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    /// `registerKeys(schemeId, stealthMetaAddress)` on the registry.
    RegisterKeys {
        /// Registry contract
        registry: Address,
        /// Scheme id
        scheme_id: SchemeId,
        /// Meta-address to publish
        stealth_meta_address: StealthMetaAddress,
    },

    /// `stealthMetaAddressOf(registrant, schemeId)` on the registry.
    StealthMetaAddressOf {
        /// Registry contract
        registry: Address,
        /// Receiver whose entry is read
        registrant: Address,
        /// Scheme id
        scheme_id: SchemeId,
    },

    /// `announce(schemeId, stealthAddress, ephemeralPubKey, metadata)` on the announcer.
    Announce {
        /// Announcer contract
        announcer: Address,
        /// Scheme id
        scheme_id: SchemeId,
        /// Stealth address being announced
        stealth_address: Address,
        /// Sender's ephemeral public key
        ephemeral_public_key: Bytes,
        /// Announcement metadata (view tag first)
        metadata: Bytes,
    },
}

impl ContractCall {
    /// Contract the call is addressed to.
    pub fn target(&self) -> Address {
        match self {
            ContractCall::RegisterKeys { registry, .. }
            | ContractCall::StealthMetaAddressOf { registry, .. } => *registry,
            ContractCall::Announce { announcer, .. } => *announcer,
        }
    }

    /// Solidity function name, for logs and errors.
    pub fn function(&self) -> &'static str {
        match self {
            ContractCall::RegisterKeys { .. } => "registerKeys",
            ContractCall::StealthMetaAddressOf { .. } => "stealthMetaAddressOf",
            ContractCall::Announce { .. } => "announce",
        }
    }

    /// ABI-encoded calldata, selector included.
    pub fn encode(&self) -> Bytes {
        let data = match self {
            ContractCall::RegisterKeys {
                scheme_id,
                stealth_meta_address,
                ..
            } => IERC6538Registry::registerKeysCall {
                schemeId: scheme_id.to_u256(),
                stealthMetaAddress: stealth_meta_address.to_bytes(),
            }
            .abi_encode(),
            ContractCall::StealthMetaAddressOf {
                registrant,
                scheme_id,
                ..
            } => IERC6538Registry::stealthMetaAddressOfCall {
                registrant: *registrant,
                schemeId: scheme_id.to_u256(),
            }
            .abi_encode(),
            ContractCall::Announce {
                scheme_id,
                stealth_address,
                ephemeral_public_key,
                metadata,
                ..
            } => IERC5564Announcer::announceCall {
                schemeId: scheme_id.to_u256(),
                stealthAddress: *stealth_address,
                ephemeralPubKey: ephemeral_public_key.clone(),
                metadata: metadata.clone(),
            }
            .abi_encode(),
        };
        Bytes::from(data)
    }
}
