//! # Shroud Core
//!
//! Core types, errors, and traits for the Shroud stealth-address client.
//!
//! This crate provides the foundational building blocks used by all other Shroud crates:
//!
//! - **Types**: Scheme ids, stealth meta-addresses, view tags, announcements, receipts
//! - **Errors**: One error enum covering every operation
//! - **ABI**: `sol!` bindings for the ERC-5564 announcer and ERC-6538 registry
//! - **Traits**: The read and write chain capabilities
//! - **Pipeline**: The simulate → submit → confirm write protocol
//!
//! ## Example
//!
//! ```rust
//! use shroud_core::{StealthMetaAddress, ViewTag};
//!
//! let meta = StealthMetaAddress::parse("0x02aabb").unwrap();
//! assert_eq!(meta.to_uri("eth"), "st:eth:0x02aabb");
//! assert_eq!(ViewTag(255).to_hex(), "0xff");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod abi;
pub mod call;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items at crate root
pub use call::ContractCall;
pub use config::{ChainConfig, ContractAddresses};
pub use constants::*;
pub use error::{BoxError, Result, ShroudError};
pub use traits::*;
pub use types::*;
