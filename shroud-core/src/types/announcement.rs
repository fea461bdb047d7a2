//! Announcement types for the ERC-5564 announcer.
//!
//! Announcements are emitted on-chain by the announcer contract each time a
//! sender uses a stealth address. They are never mutated; this module only
//! decodes them from event logs.

use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::Log;
use serde::{Deserialize, Serialize};

use super::{SchemeId, ViewTag};
use crate::abi::IERC5564Announcer;
use crate::constants::ANNOUNCEMENT_WINDOW_BLOCKS;
use crate::error::{Result, ShroudError};

/// A decoded `Announcement` event.
///
/// # Event layout
/// ```text
/// Announcement(uint256 indexed schemeId, address indexed stealthAddress,
///              address indexed caller, bytes ephemeralPubKey, bytes metadata)
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Key-derivation scheme of the stealth address
    pub scheme_id: SchemeId,
    /// The stealth address that was used
    pub stealth_address: Address,
    /// Account that called `announce`
    pub caller: Address,
    /// Sender's ephemeral public key
    pub ephemeral_public_key: Bytes,
    /// Raw metadata; the first byte is the view tag
    pub metadata: Bytes,
    /// View tag, absent when the metadata is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<ViewTag>,
    /// Block the event was emitted in
    pub block_number: u64,
    /// Position of the log within its block
    pub log_index: u64,
    /// Transaction that emitted the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
}

impl Announcement {
    /// Decodes an announcer log.
    ///
    /// Returns [`ShroudError::AbiDecode`] if the log is not an `Announcement`
    /// event and [`ShroudError::InvalidAnnouncement`] if it was never mined.
    pub fn from_log(log: &Log) -> Result<Self> {
        let decoded = log
            .log_decode::<IERC5564Announcer::Announcement>()
            .map_err(|e| ShroudError::AbiDecode(e.to_string()))?;

        let block_number = log
            .block_number
            .ok_or_else(|| ShroudError::InvalidAnnouncement("log has no block number".into()))?;
        let log_index = log
            .log_index
            .ok_or_else(|| ShroudError::InvalidAnnouncement("log has no log index".into()))?;

        let event = decoded.inner.data;

        Ok(Self {
            scheme_id: SchemeId::from_u256(event.schemeId)?,
            stealth_address: event.stealthAddress,
            caller: event.caller,
            view_tag: ViewTag::from_metadata(&event.metadata),
            ephemeral_public_key: event.ephemeralPubKey,
            metadata: event.metadata,
            block_number,
            log_index,
            transaction_hash: log.transaction_hash,
        })
    }

    /// Position in chain log order: `(block_number, log_index)`.
    pub fn chain_position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// Inclusive block range scanned for announcements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementWindow {
    /// First block (inclusive)
    pub from_block: u64,
    /// Last block (inclusive)
    pub to_block: u64,
}

impl AnnouncementWindow {
    /// The fixed window of [`ANNOUNCEMENT_WINDOW_BLOCKS`] ending at `head`.
    ///
    /// Saturates at block 0 on chains younger than the window.
    pub fn ending_at(head: u64) -> Self {
        Self {
            from_block: head.saturating_sub(ANNOUNCEMENT_WINDOW_BLOCKS),
            to_block: head,
        }
    }

    /// A caller-chosen range. Rejects `from_block > to_block`.
    pub fn between(from_block: u64, to_block: u64) -> Result<Self> {
        if from_block > to_block {
            return Err(ShroudError::ConfigError(format!(
                "block range is reversed: {from_block} > {to_block}"
            )));
        }
        Ok(Self { from_block, to_block })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};
    use alloy::sol_types::SolEvent;
    use test_case::test_case;

    fn make_log(metadata: Vec<u8>, block_number: Option<u64>, log_index: Option<u64>) -> Log {
        let event = IERC5564Announcer::Announcement {
            schemeId: U256::from(1u64),
            stealthAddress: address!("00000000000000000000000000000000000000aa"),
            caller: address!("00000000000000000000000000000000000000bb"),
            ephemeralPubKey: Bytes::from(vec![0x02; 33]),
            metadata: Bytes::from(metadata),
        };
        Log {
            inner: alloy::primitives::Log {
                address: crate::constants::ERC5564_ANNOUNCER_ADDRESS,
                data: event.encode_log_data(),
            },
            block_number,
            log_index,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_announcement_log() {
        let ann = Announcement::from_log(&make_log(vec![0xff, 0x01], Some(42), Some(3))).unwrap();

        assert_eq!(ann.scheme_id, SchemeId::SECP256K1);
        assert_eq!(ann.stealth_address, address!("00000000000000000000000000000000000000aa"));
        assert_eq!(ann.caller, address!("00000000000000000000000000000000000000bb"));
        assert_eq!(ann.ephemeral_public_key.len(), 33);
        assert_eq!(ann.view_tag, Some(ViewTag(0xff)));
        assert_eq!(ann.chain_position(), (42, 3));
    }

    #[test]
    fn test_decode_empty_metadata_has_no_view_tag() {
        let ann = Announcement::from_log(&make_log(vec![], Some(1), Some(0))).unwrap();
        assert_eq!(ann.view_tag, None);
    }

    #[test]
    fn test_decode_unmined_log_is_invalid() {
        let result = Announcement::from_log(&make_log(vec![0x01], None, Some(0)));
        assert!(matches!(result, Err(ShroudError::InvalidAnnouncement(_))));

        let result = Announcement::from_log(&make_log(vec![0x01], Some(1), None));
        assert!(matches!(result, Err(ShroudError::InvalidAnnouncement(_))));
    }

    #[test]
    fn test_decode_foreign_log_is_abi_error() {
        let log = Log {
            inner: alloy::primitives::Log::new_unchecked(
                crate::constants::ERC5564_ANNOUNCER_ADDRESS,
                vec![B256::repeat_byte(0x11)],
                Bytes::new(),
            ),
            block_number: Some(1),
            log_index: Some(0),
            ..Default::default()
        };
        assert!(matches!(Announcement::from_log(&log), Err(ShroudError::AbiDecode(_))));
    }

    #[test_case(1_000_000, 900_000 ; "mainnet height")]
    #[test_case(100_000, 0 ; "exactly one window")]
    #[test_case(5, 0 ; "young chain saturates")]
    fn test_window_ending_at(head: u64, from: u64) {
        let window = AnnouncementWindow::ending_at(head);
        assert_eq!(window.from_block, from);
        assert_eq!(window.to_block, head);
        assert!(window.to_block - window.from_block <= ANNOUNCEMENT_WINDOW_BLOCKS);
    }

    #[test]
    fn test_window_between() {
        assert!(AnnouncementWindow::between(10, 20).is_ok());
        assert!(AnnouncementWindow::between(7, 7).is_ok());
        assert!(matches!(AnnouncementWindow::between(21, 20), Err(ShroudError::ConfigError(_))));
    }
}
