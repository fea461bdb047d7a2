//! Announcer client.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use shroud_core::call::ContractCall;
use shroud_core::config::ChainConfig;
use shroud_core::error::{Result, ShroudError};
use shroud_core::pipeline;
use shroud_core::traits::{ChainReader, ChainWriter};
use shroud_core::types::{Announcement, AnnouncementWindow, SchemeId, TransactionReceipt, ViewTag};

/// Parameters of [`AnnouncerClient::announce_stealth_address`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceParams {
    /// Scheme used to derive the stealth address
    pub scheme_id: SchemeId,
    /// The stealth address that was paid
    pub stealth_address: Address,
    /// Sender's ephemeral public key
    pub ephemeral_public_key: Bytes,
    /// View tag, published as the whole metadata
    pub view_tag: ViewTag,
}

/// Client for the ERC-5564 announcer.
#[derive(Clone, Debug)]
pub struct AnnouncerClient<R, W> {
    config: ChainConfig<R, W>,
}

impl<R, W> AnnouncerClient<R, W>
where
    R: ChainReader,
    W: ChainWriter,
{
    /// Creates a client over the given configuration.
    pub fn new(config: ChainConfig<R, W>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChainConfig<R, W> {
        &self.config
    }

    /// Announcer contract this client targets.
    pub fn announcer(&self) -> Address {
        self.config.contracts.announcer
    }

    /// Publishes an announcement for a stealth address.
    ///
    /// The metadata is exactly the view tag byte. Simulation gates
    /// submission; a writer without a signer is left to fail at submission.
    #[instrument(
        skip(self, params),
        fields(scheme_id = %params.scheme_id, stealth_address = %params.stealth_address)
    )]
    pub async fn announce_stealth_address(&self, params: AnnounceParams) -> Result<TransactionReceipt> {
        let call = ContractCall::Announce {
            announcer: self.announcer(),
            scheme_id: params.scheme_id,
            stealth_address: params.stealth_address,
            ephemeral_public_key: params.ephemeral_public_key,
            metadata: params.view_tag.to_metadata(),
        };
        debug!(view_tag = %params.view_tag, "Announcing stealth address");

        let receipt = pipeline::simulate(&self.config.reader, &call)
            .await?
            .submit(&self.config.writer)
            .await?
            .confirm(&self.config.writer)
            .await?;

        info!(tx_hash = %receipt.transaction_hash, success = receipt.is_success(), "Announcement published");
        Ok(receipt)
    }

    /// Returns the announcements of the most recent window of blocks.
    ///
    /// The window is the last 100,000 blocks up to and including the current
    /// head. A missing or zero head is an error, never an empty result.
    #[instrument(skip(self))]
    pub async fn retrieve_announcements(&self) -> Result<Vec<Announcement>> {
        let head = match self.config.reader.block_number().await? {
            Some(head) if head > 0 => head,
            _ => return Err(ShroudError::BlockNumberUnavailable),
        };

        self.scan(AnnouncementWindow::ending_at(head)).await
    }

    /// Returns the announcements emitted between two blocks, inclusive.
    ///
    /// Fails with [`ShroudError::ConfigError`] if `from_block > to_block`.
    #[instrument(skip(self))]
    pub async fn retrieve_announcements_between(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Announcement>> {
        self.scan(AnnouncementWindow::between(from_block, to_block)?).await
    }

    async fn scan(&self, window: AnnouncementWindow) -> Result<Vec<Announcement>> {
        debug!(from_block = window.from_block, to_block = window.to_block, "Fetching announcer logs");

        let logs = self
            .config
            .reader
            .logs(self.announcer(), window.from_block, window.to_block)
            .await?;

        let mut announcements = Vec::with_capacity(logs.len());
        for log in &logs {
            match Announcement::from_log(log) {
                Ok(announcement) => announcements.push(announcement),
                Err(ShroudError::AbiDecode(reason)) => {
                    warn!(
                        tx_hash = ?log.transaction_hash,
                        log_index = ?log.log_index,
                        %reason,
                        "Skipping undecodable announcer log"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        announcements.sort_by_key(Announcement::chain_position);

        info!(count = announcements.len(), "Retrieved announcements");
        Ok(announcements)
    }
}
