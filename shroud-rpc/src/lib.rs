//! # Shroud RPC
//!
//! JSON-RPC implementation of the Shroud chain capabilities.
//!
//! - [`RpcReader`]: `eth_call`, `eth_estimateGas`, `eth_blockNumber`, `eth_getLogs`
//! - [`RpcWriter`]: local signing, `eth_sendRawTransaction`, receipt polling
//! - [`RpcConfig`]: endpoint, signer, and contract overrides from the environment
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_registry::RegistryClient;
//! use shroud_rpc::{connect, RpcConfig};
//!
//! let config = connect(&RpcConfig::from_env()?)?;
//! let registry = RegistryClient::new(config);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
mod reader;
mod writer;

pub use config::RpcConfig;
pub use reader::RpcReader;
pub use writer::RpcWriter;

use shroud_core::config::ChainConfig;
use shroud_core::error::Result;

/// Builds both capabilities from one configuration.
///
/// Fails only if the configured private key does not parse.
pub fn connect(config: &RpcConfig) -> Result<ChainConfig<RpcReader, RpcWriter>> {
    let signer = config.signer()?;
    let sender = signer.as_ref().map(|signer| signer.address());

    tracing::info!(
        rpc_url = %config.rpc_url.host_str().unwrap_or("unknown"),
        signer = ?sender,
        "Connecting"
    );

    let reader = RpcReader::new(config.rpc_url.clone(), sender);
    let writer = RpcWriter::new(config.rpc_url.clone(), signer);

    Ok(ChainConfig::new(reader, writer).with_contracts(config.contracts))
}
