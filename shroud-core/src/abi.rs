//! Contract bindings for the ERC-5564 announcer and ERC-6538 registry.

use alloy::sol;

sol! {
    /// ERC-5564 stealth address announcer.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC5564Announcer {
        /// Emitted when something is sent to a stealth address.
        event Announcement(
            uint256 indexed schemeId,
            address indexed stealthAddress,
            address indexed caller,
            bytes ephemeralPubKey,
            bytes metadata
        );

        /// Emits an `Announcement` event.
        function announce(
            uint256 schemeId,
            address stealthAddress,
            bytes memory ephemeralPubKey,
            bytes memory metadata
        ) external;
    }
}

sol! {
    /// ERC-6538 stealth meta-address registry.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC6538Registry {
        /// Emitted when a registrant updates their stealth meta-address.
        event StealthMetaAddressSet(
            address indexed registrant,
            uint256 indexed schemeId,
            bytes stealthMetaAddress
        );

        /// Sets the caller's stealth meta-address for the given scheme.
        function registerKeys(uint256 schemeId, bytes calldata stealthMetaAddress) external;

        /// Maps a registrant and scheme id to their stealth meta-address.
        function stealthMetaAddressOf(address registrant, uint256 schemeId)
            external
            view
            returns (bytes memory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_function_selectors() {
        assert_eq!(
            IERC6538Registry::registerKeysCall::SIGNATURE,
            "registerKeys(uint256,bytes)"
        );
        assert_eq!(
            IERC6538Registry::stealthMetaAddressOfCall::SIGNATURE,
            "stealthMetaAddressOf(address,uint256)"
        );
        assert_eq!(
            IERC5564Announcer::announceCall::SIGNATURE,
            "announce(uint256,address,bytes,bytes)"
        );
    }

    #[test]
    fn test_announcement_event_signature() {
        assert_eq!(
            IERC5564Announcer::Announcement::SIGNATURE,
            "Announcement(uint256,address,address,bytes,bytes)"
        );
    }
}
