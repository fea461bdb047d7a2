//! # Shroud Announcer
//!
//! Client for the ERC-5564 announcer contract.
//!
//! - **announce_stealth_address**: Publishes an announcement whose metadata
//!   is the one-byte view tag
//! - **retrieve_announcements**: Fetches the announcements of the last
//!   100,000 blocks, in chain order
//! - **retrieve_announcements_between**: Same, over an explicit block range
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_announcer::AnnouncerClient;
//! use shroud_core::ChainConfig;
//!
//! let announcer = AnnouncerClient::new(ChainConfig::new(reader, writer));
//!
//! for announcement in announcer.retrieve_announcements().await? {
//!     println!("{} tag {:?}", announcement.stealth_address, announcement.view_tag);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{AnnounceParams, AnnouncerClient};
