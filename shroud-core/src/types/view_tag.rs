//! View tags.
//!
//! A view tag is the one-byte hint senders publish in the announcement
//! metadata so receivers can skip non-matching announcements cheaply.

use std::fmt;

use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::VIEW_TAG_SIZE;
use crate::error::{Result, ShroudError};

/// A single-byte view tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewTag(pub u8);

impl ViewTag {
    /// Encodes the tag as the announcement metadata: exactly one byte.
    pub fn to_metadata(self) -> Bytes {
        Bytes::copy_from_slice(&[self.0])
    }

    /// Returns the tag as one byte of `0x`-prefixed hex (`0x00`..`0xff`).
    pub fn to_hex(self) -> String {
        format!("0x{:02x}", self.0)
    }

    /// Reads the tag from announcement metadata (its first byte).
    pub fn from_metadata(metadata: &[u8]) -> Option<Self> {
        metadata.first().copied().map(ViewTag)
    }
}

impl From<u8> for ViewTag {
    fn from(value: u8) -> Self {
        ViewTag(value)
    }
}

impl TryFrom<u64> for ViewTag {
    type Error = ShroudError;

    fn try_from(value: u64) -> Result<Self> {
        u8::try_from(value)
            .map(ViewTag)
            .map_err(|_| ShroudError::InvalidViewTag(value))
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const _: () = assert!(VIEW_TAG_SIZE == 1);
