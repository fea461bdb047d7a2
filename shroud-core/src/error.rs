//! Error types for Shroud.
//!
//! Every operation either returns its declared result or one of these
//! errors. Nothing is retried or recovered locally.

use thiserror::Error;

/// Result type alias using `ShroudError`.
pub type Result<T> = std::result::Result<T, ShroudError>;

/// Boxed error produced by a chain client implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all Shroud operations.
#[derive(Debug, Error)]
pub enum ShroudError {
    // ═══════════════════════════════════════════════════════════════════════════
    // WRITE PROTOCOL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Pre-flight simulation produced no executable request.
    #[error("Failed to simulate contract call `{function}`")]
    SimulationFailure {
        /// Contract function that was simulated.
        function: &'static str,
    },

    /// The write capability has no signing identity.
    #[error("Write client does not have a signing identity")]
    MissingSigningIdentity,

    // ═══════════════════════════════════════════════════════════════════════════
    // READ ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The current block height could not be obtained.
    #[error("Failed to get block number")]
    BlockNumberUnavailable,

    /// Return data or log data did not match the contract ABI.
    #[error("ABI decoding failed: {0}")]
    AbiDecode(String),

    /// An announcement log is structurally unusable.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CHAIN CLIENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Error raised by the underlying chain client (transport, revert, timeout).
    #[error("Chain client error: {0}")]
    Chain(#[source] BoxError),

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid stealth meta-address encoding.
    #[error("Invalid stealth meta-address: {0}")]
    InvalidMetaAddress(String),

    /// Invalid stealth address encoding.
    #[error("Invalid stealth address: {0}")]
    InvalidStealthAddress(String),

    /// View tag outside `0..=255`.
    #[error("Invalid view tag: {0} does not fit in one byte")]
    InvalidViewTag(u64),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ShroudError {
    /// Wraps any chain client error without altering it.
    pub fn chain(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ShroudError::Chain(Box::new(err))
    }

    /// Returns true if the failure happened before any transaction was submitted.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            ShroudError::SimulationFailure { .. } | ShroudError::MissingSigningIdentity
        )
    }

    /// Returns true if this error came from the chain client.
    pub fn is_chain_error(&self) -> bool {
        matches!(self, ShroudError::Chain(_))
    }
}
