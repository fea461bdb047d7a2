//! In-memory chain for tests.
//!
//! [`MockChain`] implements both [`ChainReader`] and [`ChainWriter`]. It
//! records every call in order and applies `registerKeys` / `announce`
//! submissions to a tiny in-memory registry and log list, so operations can
//! be exercised end to end without a node.

use std::collections::HashMap;

use alloy::primitives::{address, Address, Bytes, Log as PrimitiveLog, B256};
use alloy::rpc::types::Log;
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::abi::{IERC5564Announcer, IERC6538Registry};
use crate::call::ContractCall;
use crate::error::{Result, ShroudError};
use crate::traits::{ChainReader, ChainWriter};
use crate::types::{PreparedRequest, TransactionReceipt};

/// Signer address used by [`MockChain`] unless removed.
pub const TEST_SIGNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// A call observed by [`MockChain`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    /// `ChainReader::simulate`
    Simulate(ContractCall),
    /// `ChainReader::read`
    Read(ContractCall),
    /// `ChainReader::block_number`
    BlockNumber,
    /// `ChainReader::logs`
    Logs {
        /// Queried contract
        contract: Address,
        /// First block
        from_block: u64,
        /// Last block
        to_block: u64,
    },
    /// `ChainWriter::submit`
    Submit(PreparedRequest),
    /// `ChainWriter::wait_for_inclusion`
    WaitForInclusion(B256),
}

/// A capability method that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// `simulate`
    Simulate,
    /// `read`
    Read,
    /// `block_number`
    BlockNumber,
    /// `logs`
    Logs,
    /// `submit`
    Submit,
    /// `wait_for_inclusion`
    WaitForInclusion,
}

/// Error returned by a failing [`MockChain`] step.
#[derive(Debug, thiserror::Error)]
#[error("mock chain failure at {0:?}")]
pub struct MockFailure(pub Step);

#[derive(Debug)]
struct State {
    events: Vec<ChainEvent>,
    registry: HashMap<(Address, u64), Bytes>,
    logs: Vec<Log>,
    read_override: Option<Option<Bytes>>,
    tx_count: u8,
}

/// Recording in-memory chain.
#[derive(Debug)]
pub struct MockChain {
    state: Mutex<State>,
    signer: Option<Address>,
    simulation_succeeds: bool,
    receipt_status: bool,
    block_number: Option<u64>,
    failing: Option<Step>,
}

impl MockChain {
    /// A chain at block 1,000,000 with a signer and succeeding simulations.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                events: Vec::new(),
                registry: HashMap::new(),
                logs: Vec::new(),
                read_override: None,
                tx_count: 0,
            }),
            signer: Some(TEST_SIGNER),
            simulation_succeeds: true,
            receipt_status: true,
            block_number: Some(1_000_000),
            failing: None,
        }
    }

    /// Removes the signing identity.
    pub fn without_signer(mut self) -> Self {
        self.signer = None;
        self
    }

    /// Makes `simulate` return a request (`true`) or nothing (`false`).
    pub fn with_simulation(mut self, succeeds: bool) -> Self {
        self.simulation_succeeds = succeeds;
        self
    }

    /// Sets the status of every receipt.
    pub fn with_receipt_status(mut self, status: bool) -> Self {
        self.receipt_status = status;
        self
    }

    /// Sets the reported block height.
    pub fn with_block_number(mut self, block_number: Option<u64>) -> Self {
        self.block_number = block_number;
        self
    }

    /// Makes `step` fail with a [`ShroudError::Chain`].
    pub fn failing_at(mut self, step: Step) -> Self {
        self.failing = Some(step);
        self
    }

    /// Forces `read` to return exactly `response`.
    pub fn with_read_response(self, response: Option<Bytes>) -> Self {
        self.state.lock().read_override = Some(response);
        self
    }

    /// Seeds the registry entry for `(registrant, scheme_id)`.
    pub fn with_registry_entry(self, registrant: Address, scheme_id: u64, value: Bytes) -> Self {
        self.state.lock().registry.insert((registrant, scheme_id), value);
        self
    }

    /// Seeds raw logs, returned by `logs` in the given order.
    pub fn with_logs(self, logs: Vec<Log>) -> Self {
        self.state.lock().logs.extend(logs);
        self
    }

    /// Every call observed so far, in order.
    pub fn events(&self) -> Vec<ChainEvent> {
        self.state.lock().events.clone()
    }

    /// Requests passed to `submit`, in order.
    pub fn submitted(&self) -> Vec<PreparedRequest> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Submit(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Builds a mined announcer log, as a node would return it.
    pub fn announcement_log(
        announcer: Address,
        event: IERC5564Announcer::Announcement,
        block_number: u64,
        log_index: u64,
    ) -> Log {
        Log {
            inner: PrimitiveLog {
                address: announcer,
                data: event.encode_log_data(),
            },
            block_number: Some(block_number),
            log_index: Some(log_index),
            transaction_hash: Some(B256::with_last_byte(log_index as u8)),
            ..Default::default()
        }
    }

    fn record(&self, event: ChainEvent) {
        self.state.lock().events.push(event);
    }

    fn check(&self, step: Step) -> Result<()> {
        if self.failing == Some(step) {
            return Err(ShroudError::chain(MockFailure(step)));
        }
        Ok(())
    }

    fn apply(&self, request: &PreparedRequest, sender: Address) {
        let head = self.block_number.unwrap_or_default();
        let mut state = self.state.lock();

        if let Ok(call) = IERC6538Registry::registerKeysCall::abi_decode(&request.input) {
            let scheme_id = u64::try_from(call.schemeId).unwrap_or(u64::MAX);
            state.registry.insert((sender, scheme_id), call.stealthMetaAddress);
        } else if let Ok(call) = IERC5564Announcer::announceCall::abi_decode(&request.input) {
            let log_index = state
                .logs
                .iter()
                .filter(|log| log.block_number == Some(head))
                .count() as u64;
            let event = IERC5564Announcer::Announcement {
                schemeId: call.schemeId,
                stealthAddress: call.stealthAddress,
                caller: sender,
                ephemeralPubKey: call.ephemeralPubKey,
                metadata: call.metadata,
            };
            state
                .logs
                .push(Self::announcement_log(request.to, event, head, log_index));
        }
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn simulate(&self, call: &ContractCall) -> Result<Option<PreparedRequest>> {
        self.record(ChainEvent::Simulate(call.clone()));
        self.check(Step::Simulate)?;

        if !self.simulation_succeeds {
            return Ok(None);
        }

        Ok(Some(PreparedRequest {
            to: call.target(),
            from: self.signer,
            input: call.encode(),
            gas_limit: Some(60_000),
        }))
    }

    async fn read(&self, call: &ContractCall) -> Result<Option<Bytes>> {
        self.record(ChainEvent::Read(call.clone()));
        self.check(Step::Read)?;

        let state = self.state.lock();
        if let Some(response) = &state.read_override {
            return Ok(response.clone());
        }

        match call {
            ContractCall::StealthMetaAddressOf {
                registrant,
                scheme_id,
                ..
            } => {
                let value = state
                    .registry
                    .get(&(*registrant, scheme_id.0))
                    .cloned()
                    .unwrap_or_default();
                Ok(Some(Bytes::from(value.abi_encode())))
            }
            _ => Ok(None),
        }
    }

    async fn block_number(&self) -> Result<Option<u64>> {
        self.record(ChainEvent::BlockNumber);
        self.check(Step::BlockNumber)?;
        Ok(self.block_number)
    }

    async fn logs(&self, contract: Address, from_block: u64, to_block: u64) -> Result<Vec<Log>> {
        self.record(ChainEvent::Logs {
            contract,
            from_block,
            to_block,
        });
        self.check(Step::Logs)?;

        Ok(self
            .state
            .lock()
            .logs
            .iter()
            .filter(|log| log.address() == contract)
            .filter(|log| {
                log.block_number
                    .map_or(true, |block| (from_block..=to_block).contains(&block))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    fn signer(&self) -> Option<Address> {
        self.signer
    }

    async fn submit(&self, request: PreparedRequest) -> Result<B256> {
        self.record(ChainEvent::Submit(request.clone()));
        self.check(Step::Submit)?;

        // A node refuses to sign for an account it does not hold.
        let sender = self
            .signer
            .ok_or_else(|| ShroudError::chain(MockFailure(Step::Submit)))?;

        self.apply(&request, sender);

        let mut state = self.state.lock();
        state.tx_count = state.tx_count.wrapping_add(1);
        Ok(B256::with_last_byte(state.tx_count))
    }

    async fn wait_for_inclusion(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        self.record(ChainEvent::WaitForInclusion(tx_hash));
        self.check(Step::WaitForInclusion)?;

        Ok(TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: self.block_number,
            block_hash: Some(B256::repeat_byte(0xbb)),
            from: self.signer.unwrap_or_default(),
            to: None,
            gas_used: 50_000,
            status: self.receipt_status,
        })
    }
}
