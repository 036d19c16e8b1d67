// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-family address validation. Pure string checks, no network I/O.

use alloy::primitives::Address;

use super::registry::ChainFamily;

/// Inclusive base58 length bounds for Solana account keys.
const SOLANA_ADDRESS_MIN_LEN: usize = 32;
const SOLANA_ADDRESS_MAX_LEN: usize = 44;

/// Whether `address` is well-formed for the given chain family.
pub fn validate(address: &str, family: ChainFamily) -> bool {
    match family {
        ChainFamily::Evm => is_valid_evm_address(address),
        ChainFamily::Solana => is_valid_solana_address(address),
    }
}

/// `0x` prefix plus 40 hex characters. Uniform-case addresses are accepted
/// as-is; mixed-case addresses must carry a valid EIP-55 checksum.
pub fn is_valid_evm_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(address, None).is_ok()
    } else {
        true
    }
}

/// Length-bounds check only: no base58 decode, no checksum. Some invalid
/// strings will pass; this is a cheap syntactic gate ahead of the RPC
/// round-trip, which is where a bad key ultimately fails.
pub fn is_valid_solana_address(address: &str) -> bool {
    (SOLANA_ADDRESS_MIN_LEN..=SOLANA_ADDRESS_MAX_LEN).contains(&address.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_checksummed_evm_addresses() {
        assert!(is_valid_evm_address(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        ));
        assert!(is_valid_evm_address(
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        ));
    }

    #[test]
    fn accepts_uniform_case_without_checksum() {
        assert!(is_valid_evm_address(
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        ));
        assert!(is_valid_evm_address(
            "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"
        ));
    }

    #[test]
    fn rejects_bad_checksum_and_malformed_input() {
        // First hex digit lower-cased: mixed case with a broken checksum.
        assert!(!is_valid_evm_address(
            "0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        ));
        // Wrong length.
        assert!(!is_valid_evm_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe"));
        // Missing prefix.
        assert!(!is_valid_evm_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        // Non-hex characters.
        assert!(!is_valid_evm_address(
            "0xZZZeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        ));
        assert!(!is_valid_evm_address(""));
    }

    #[test]
    fn solana_check_is_length_bounds_only() {
        // System program: 32 ones.
        assert!(is_valid_solana_address("11111111111111111111111111111111"));
        // Wrapped SOL mint.
        assert!(is_valid_solana_address(
            "So11111111111111111111111111111111111111112"
        ));

        assert!(!is_valid_solana_address("1111111111111111111111111111111")); // 31
        assert!(!is_valid_solana_address(&"1".repeat(45)));
        assert!(!is_valid_solana_address(""));

        // Documented weakness: length is the only gate, so a string of the
        // right length passes even when it is not valid base58.
        assert!(is_valid_solana_address(&"!".repeat(40)));
    }

    #[test]
    fn validate_dispatches_on_family() {
        assert!(validate(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            ChainFamily::Evm
        ));
        assert!(validate(
            "11111111111111111111111111111111",
            ChainFamily::Solana
        ));
        assert!(!validate("11111111111111111111111111111111", ChainFamily::Evm));
        assert!(!validate("too-short", ChainFamily::Solana));
    }
}
