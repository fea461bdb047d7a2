//! Protocol constants for Shroud.
//!
//! Contract addresses are the canonical ERC-5564 / ERC-6538 singleton
//! deployments. They are defaults only; callers inject their own through
//! [`ContractAddresses`](crate::config::ContractAddresses).

use alloy::primitives::{address, Address};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT DEPLOYMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonical ERC-5564 announcer (same address on every supported chain).
pub const ERC5564_ANNOUNCER_ADDRESS: Address = address!("55649E01B5Df198D18D95b5cc5051630cfD45564");

/// Canonical ERC-6538 registry (same address on every supported chain).
pub const ERC6538_REGISTRY_ADDRESS: Address = address!("6538E6bf4B0eBd30A8Ea093027Ac2422ce5d6538");

// ═══════════════════════════════════════════════════════════════════════════════
// SCHEME IDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Scheme id of the secp256k1 scheme with view tags (ERC-5564 scheme 1).
pub const SCHEME_ID_SECP256K1: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY SENTINEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of the zero sentinel that marks an unset registry entry.
pub const ZERO_SENTINEL_SIZE: usize = 32;

/// Returns true if `bytes` is the all-zero 32-byte sentinel.
pub fn is_zero_sentinel(bytes: &[u8]) -> bool {
    bytes.len() == ZERO_SENTINEL_SIZE && bytes.iter().all(|&b| b == 0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of blocks behind the chain head covered by an announcement scan.
pub const ANNOUNCEMENT_WINDOW_BLOCKS: u64 = 100_000;

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an encoded view tag in bytes.
pub const VIEW_TAG_SIZE: usize = 1;

/// Size of an Ethereum address in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Prefix of the ERC-5564 stealth meta-address URI (`st:<chain>:0x...`).
pub const META_ADDRESS_URI_PREFIX: &str = "st:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(is_zero_sentinel(&[0u8; 32]));
        assert!(!is_zero_sentinel(&[0u8; 31]));
        assert!(!is_zero_sentinel(&[0u8; 33]));
        assert!(!is_zero_sentinel(&[]));

        let mut almost = [0u8; 32];
        almost[31] = 1;
        assert!(!is_zero_sentinel(&almost));
    }

    #[test]
    fn test_canonical_addresses_are_vanity() {
        // Both singletons are mined to carry their ERC number at each end.
        let announcer = format!("{:x}", ERC5564_ANNOUNCER_ADDRESS);
        let registry = format!("{:x}", ERC6538_REGISTRY_ADDRESS);
        assert!(announcer.starts_with("5564") && announcer.ends_with("5564"));
        assert!(registry.starts_with("6538") && registry.ends_with("6538"));
    }
}
