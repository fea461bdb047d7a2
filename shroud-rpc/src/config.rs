//! RPC endpoint and signing configuration.
//!
//! Values come from the environment (after loading `.env`):
//!
//! ```bash
//! export SHROUD_RPC_URL="https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY"  # or ETH_RPC_URL
//! export SHROUD_PRIVATE_KEY="0x..."                                      # optional
//! export SHROUD_ANNOUNCER_ADDRESS="0x..."                                # optional override
//! export SHROUD_REGISTRY_ADDRESS="0x..."                                 # optional override
//! ```

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use url::Url;
use zeroize::Zeroizing;

use shroud_core::config::ContractAddresses;
use shroud_core::error::{Result, ShroudError};

/// Environment variable names.
pub mod env_vars {
    /// RPC endpoint (highest priority)
    pub const SHROUD_RPC_URL: &str = "SHROUD_RPC_URL";
    /// Conventional Ethereum RPC endpoint, used when `SHROUD_RPC_URL` is unset
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    /// Hex private key of the signing identity
    pub const SHROUD_PRIVATE_KEY: &str = "SHROUD_PRIVATE_KEY";
    /// Announcer contract override
    pub const SHROUD_ANNOUNCER_ADDRESS: &str = "SHROUD_ANNOUNCER_ADDRESS";
    /// Registry contract override
    pub const SHROUD_REGISTRY_ADDRESS: &str = "SHROUD_REGISTRY_ADDRESS";
}

/// Public Ethereum endpoint (rate limited, for testing only).
pub const PUBLIC_RPC_URL: &str = "https://eth.llamarpc.com";

/// Connection settings for [`crate::connect`].
#[derive(Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint
    pub rpc_url: Url,
    /// Contract deployments
    pub contracts: ContractAddresses,
    private_key: Option<Zeroizing<String>>,
}

impl RpcConfig {
    /// Read-only configuration for `rpc_url` with canonical contracts.
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            contracts: ContractAddresses::canonical(),
            private_key: None,
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// Priority for the endpoint: `SHROUD_RPC_URL`, `ETH_RPC_URL`, then
    /// [`PUBLIC_RPC_URL`]. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let rpc_url = match get(env_vars::SHROUD_RPC_URL) {
            Some(url) => {
                tracing::debug!("Using SHROUD_RPC_URL");
                url
            }
            None => match get(env_vars::ETH_RPC_URL) {
                Some(url) => {
                    tracing::debug!("Using ETH_RPC_URL");
                    url
                }
                None => {
                    tracing::warn!("No RPC URL configured, using public endpoint (rate limited)");
                    PUBLIC_RPC_URL.to_string()
                }
            },
        };

        let mut config = Self::new(parse_url(&rpc_url)?);

        if let Some(announcer) = get(env_vars::SHROUD_ANNOUNCER_ADDRESS) {
            config.contracts = config
                .contracts
                .with_announcer(parse_address(env_vars::SHROUD_ANNOUNCER_ADDRESS, &announcer)?);
        }
        if let Some(registry) = get(env_vars::SHROUD_REGISTRY_ADDRESS) {
            config.contracts = config
                .contracts
                .with_registry(parse_address(env_vars::SHROUD_REGISTRY_ADDRESS, &registry)?);
        }
        if let Some(key) = get(env_vars::SHROUD_PRIVATE_KEY) {
            config = config.with_private_key(key)?;
        }

        Ok(config)
    }

    /// Sets the signing identity. The key is validated immediately.
    pub fn with_private_key(mut self, key: impl Into<String>) -> Result<Self> {
        let key = Zeroizing::new(key.into());
        parse_signer(&key)?;
        self.private_key = Some(key);
        Ok(self)
    }

    /// Replaces the contract deployments.
    pub fn with_contracts(mut self, contracts: ContractAddresses) -> Self {
        self.contracts = contracts;
        self
    }

    /// Returns true if a signing identity is configured.
    pub fn has_signer(&self) -> bool {
        self.private_key.is_some()
    }

    /// Builds the configured signer, if any.
    pub fn signer(&self) -> Result<Option<PrivateKeySigner>> {
        self.private_key
            .as_deref()
            .map(|key| parse_signer(key))
            .transpose()
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcConfig")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("contracts", &self.contracts)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value.trim()).map_err(|e| ShroudError::ConfigError(format!("Invalid RPC URL: {e}")))
}

fn parse_address(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| ShroudError::ConfigError(format!("Invalid {name}: {e}")))
}

fn parse_signer(key: &str) -> Result<PrivateKeySigner> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    // Never echo the key or the parser's message, which may quote it.
    PrivateKeySigner::from_str(key)
        .map_err(|_| ShroudError::ConfigError("Invalid private key".into()))
}
