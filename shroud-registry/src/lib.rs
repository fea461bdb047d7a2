//! # Shroud Registry
//!
//! Client for the ERC-6538 stealth meta-address registry.
//!
//! - **register_keys**: Publishes the signer's meta-address for a scheme
//! - **get_stealth_meta_address_of**: Resolves a receiver's meta-address,
//!   mapping the registry's zero sentinel to `None`
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_core::{ChainConfig, SchemeId};
//! use shroud_registry::{RegistryClient, StealthMetaAddressQuery};
//!
//! let registry = RegistryClient::new(ChainConfig::new(reader, writer));
//!
//! let meta = registry
//!     .get_stealth_meta_address_of(StealthMetaAddressQuery {
//!         scheme_id: SchemeId::SECP256K1,
//!         receiver,
//!     })
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{RegisterKeysParams, RegistryClient, StealthMetaAddressQuery};
