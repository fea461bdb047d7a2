//! The simulate → submit → confirm write protocol.
//!
//! Each stage returns a distinct type, so a transaction can only be
//! submitted from a [`ValidatedRequest`] (which only [`simulate`] builds),
//! and only confirmed from a [`SubmittedTransaction`].
//!
//! ```text
//! Idle → Simulating → { Simulated | SimulationFailed }
//!      → Submitting → Submitted → Confirming → { Confirmed | Rejected }
//! ```
//!
//! No stage is persisted and nothing is retried.

use std::fmt;

use alloy::primitives::B256;
use tracing::{debug, info, warn};

use crate::call::ContractCall;
use crate::error::{Result, ShroudError};
use crate::traits::{ChainReader, ChainWriter};
use crate::types::{PreparedRequest, TransactionReceipt};

/// States of a write operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStage {
    /// Not started
    Idle,
    /// Pre-flight simulation in flight
    Simulating,
    /// Simulation produced an executable request
    Simulated,
    /// Simulation produced nothing (terminal)
    SimulationFailed,
    /// Transaction being signed and sent
    Submitting,
    /// Transaction accepted by the node
    Submitted,
    /// Waiting for inclusion
    Confirming,
    /// Mined and succeeded (terminal)
    Confirmed,
    /// Mined and reverted (terminal)
    Rejected,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A request that passed simulation and may be submitted.
#[derive(Debug)]
pub struct ValidatedRequest {
    function: &'static str,
    request: PreparedRequest,
}

/// A submitted transaction awaiting inclusion.
#[derive(Debug)]
pub struct SubmittedTransaction {
    function: &'static str,
    tx_hash: B256,
}

/// Simulates `call` and returns a request that may be submitted.
///
/// Fails with [`ShroudError::SimulationFailure`] if the reader produced no
/// executable request; chain client errors propagate unchanged.
pub async fn simulate<R>(reader: &R, call: &ContractCall) -> Result<ValidatedRequest>
where
    R: ChainReader + ?Sized,
{
    let function = call.function();
    debug!(function, stage = %WriteStage::Simulating, target = %call.target());

    match reader.simulate(call).await? {
        Some(request) => {
            debug!(function, stage = %WriteStage::Simulated, gas_limit = ?request.gas_limit);
            Ok(ValidatedRequest { function, request })
        }
        None => {
            warn!(function, stage = %WriteStage::SimulationFailed, "Simulation produced no request");
            Err(ShroudError::SimulationFailure { function })
        }
    }
}

impl ValidatedRequest {
    /// The simulated request.
    pub fn request(&self) -> &PreparedRequest {
        &self.request
    }

    /// Signs and submits the request.
    pub async fn submit<W>(self, writer: &W) -> Result<SubmittedTransaction>
    where
        W: ChainWriter + ?Sized,
    {
        let function = self.function;
        debug!(function, stage = %WriteStage::Submitting);

        let tx_hash = writer.submit(self.request).await?;

        debug!(function, stage = %WriteStage::Submitted, %tx_hash);
        Ok(SubmittedTransaction { function, tx_hash })
    }
}

impl SubmittedTransaction {
    /// Hash of the submitted transaction.
    pub fn tx_hash(&self) -> B256 {
        self.tx_hash
    }

    /// Waits for inclusion and returns the receipt.
    ///
    /// A reverted receipt is still returned; the chain has recorded it.
    pub async fn confirm<W>(self, writer: &W) -> Result<TransactionReceipt>
    where
        W: ChainWriter + ?Sized,
    {
        let function = self.function;
        debug!(function, stage = %WriteStage::Confirming, tx_hash = %self.tx_hash);

        let receipt = writer.wait_for_inclusion(self.tx_hash).await?;

        if receipt.is_success() {
            info!(
                function,
                stage = %WriteStage::Confirmed,
                tx_hash = %receipt.transaction_hash,
                block_number = ?receipt.block_number,
                "Transaction confirmed"
            );
        } else {
            warn!(
                function,
                stage = %WriteStage::Rejected,
                tx_hash = %receipt.transaction_hash,
                block_number = ?receipt.block_number,
                "Transaction reverted"
            );
        }

        Ok(receipt)
    }
}
