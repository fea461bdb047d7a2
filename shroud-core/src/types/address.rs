//! Address types for Shroud.
//!
//! - [`SchemeId`]: Identifier of the key-derivation scheme
//! - [`StealthMetaAddress`]: The receiver's published key material
//! - [`parse_stealth_address`]: Parsing of one-time 20-byte stealth addresses

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::constants::{ETH_ADDRESS_SIZE, META_ADDRESS_URI_PREFIX, SCHEME_ID_SECP256K1};
use crate::error::{Result, ShroudError};

// ═══════════════════════════════════════════════════════════════════════════════
// SCHEME ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier of the stealth key-derivation scheme.
///
/// Not validated here; the contracts accept any value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeId(pub u64);

impl SchemeId {
    /// secp256k1 with view tags.
    pub const SECP256K1: SchemeId = SchemeId(SCHEME_ID_SECP256K1);

    /// Returns the `uint256` form used in contract calls.
    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows an on-chain `uint256` scheme id.
    pub fn from_u256(value: U256) -> Result<Self> {
        u64::try_from(value)
            .map(SchemeId)
            .map_err(|_| ShroudError::AbiDecode(format!("scheme id {value} exceeds u64")))
    }
}

impl From<u64> for SchemeId {
    fn from(value: u64) -> Self {
        SchemeId(value)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A receiver's stealth meta-address (spending and viewing public keys).
///
/// Opaque to this crate: the bytes are passed to the registry as-is and
/// returned exactly as read.
///
/// # Example
/// ```
/// use shroud_core::StealthMetaAddress;
///
/// let meta: StealthMetaAddress = "st:eth:0x02aabb".parse().unwrap();
/// assert_eq!(meta.as_bytes(), &[0x02, 0xaa, 0xbb]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StealthMetaAddress(Bytes);

impl StealthMetaAddress {
    /// Wraps raw meta-address bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the bytes as an ABI `bytes` value.
    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }

    /// Returns `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Formats as an ERC-5564 URI, e.g. `st:eth:0x...`.
    pub fn to_uri(&self, chain: &str) -> String {
        format!("{META_ADDRESS_URI_PREFIX}{chain}:{}", self.to_hex())
    }

    /// Parses hex (with or without `0x`) or an `st:<chain>:0x...` URI.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex_part = match s.strip_prefix(META_ADDRESS_URI_PREFIX) {
            Some(rest) => rest
                .split_once(':')
                .map(|(_, hex)| hex)
                .ok_or_else(|| ShroudError::InvalidMetaAddress("missing chain in URI".into()))?,
            None => s,
        };

        let hex_part = hex_part.strip_prefix("0x").unwrap_or(hex_part);
        if hex_part.is_empty() {
            return Err(ShroudError::InvalidMetaAddress("empty meta-address".into()));
        }

        Ok(Self(Bytes::from(hex::decode(hex_part)?)))
    }
}

impl FromStr for StealthMetaAddress {
    type Err = ShroudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Bytes> for StealthMetaAddress {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for StealthMetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StealthMetaAddress({})", self.to_hex())
    }
}

impl fmt::Display for StealthMetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses a 20-byte stealth address from hex (with or without `0x`).
///
/// Checksums are not enforced; mixed-case input is accepted as-is.
pub fn parse_stealth_address(s: &str) -> Result<Address> {
    let s = s.trim();
    let hex_part = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(hex_part)?;
    if bytes.len() != ETH_ADDRESS_SIZE {
        return Err(ShroudError::InvalidStealthAddress(format!(
            "expected {} bytes, got {}",
            ETH_ADDRESS_SIZE,
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const META_HEX: &str = "0x02a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9003";

    #[test]
    fn test_scheme_id_u256() {
        assert_eq!(SchemeId::SECP256K1.to_u256(), U256::from(1u64));
        assert_eq!(SchemeId::from_u256(U256::from(7u64)).unwrap(), SchemeId(7));
        assert!(SchemeId::from_u256(U256::MAX).is_err());
    }

    #[test_case(META_HEX ; "prefixed hex")]
    #[test_case(&META_HEX[2..] ; "bare hex")]
    #[test_case("st:eth:0x02a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9003" ; "uri")]
    fn test_meta_address_parse(input: &str) {
        let meta = StealthMetaAddress::parse(input).unwrap();
        assert_eq!(meta.to_hex(), META_HEX);
    }

    #[test]
    fn test_meta_address_uri() {
        let meta = StealthMetaAddress::parse(META_HEX).unwrap();
        assert_eq!(meta.to_uri("eth"), format!("st:eth:{META_HEX}"));
    }

    #[test_case("" ; "empty")]
    #[test_case("0x" ; "prefix only")]
    #[test_case("st:eth" ; "uri without hex")]
    #[test_case("0xzz" ; "not hex")]
    fn test_meta_address_rejects(input: &str) {
        assert!(StealthMetaAddress::parse(input).is_err());
    }

    #[test]
    fn test_meta_address_serde_is_hex() {
        let meta = StealthMetaAddress::new(vec![0xab, 0xcd]);
        assert_eq!(serde_json::to_string(&meta).unwrap(), "\"0xabcd\"");
    }

    #[test]
    fn test_parse_stealth_address() {
        let addr = parse_stealth_address("0x00000000000000000000000000000000000000aa").unwrap();
        assert_eq!(addr.as_slice()[19], 0xaa);

        assert!(matches!(
            parse_stealth_address("0xaabb"),
            Err(ShroudError::InvalidStealthAddress(_))
        ));
    }
}
