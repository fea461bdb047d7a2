//! Domain types for Shroud.
//!
//! - [`SchemeId`]: Key-derivation scheme identifier
//! - [`StealthMetaAddress`]: Receiver's published key material
//! - [`ViewTag`]: One-byte scanning hint
//! - [`Announcement`]: Decoded announcer event
//! - [`PreparedRequest`] / [`TransactionReceipt`]: Write protocol outputs

mod address;
mod announcement;
mod transaction;
mod view_tag;

pub use address::*;
pub use announcement::*;
pub use transaction::*;
pub use view_tag::*;
