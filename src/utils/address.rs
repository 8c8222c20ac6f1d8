// src/utils/address.rs
//! Wallet address helpers.
//!
//! Addresses travel through the system as hex strings exactly as the wallet
//! provider reported them. Comparison is always case-insensitive: the same
//! account may surface as lowercase hex from one provider and EIP-55
//! mixed-case from another.

/// Checks that a string has the shape of an Ethereum wallet address:
/// `0x` prefix followed by exactly 40 hex digits.
///
/// # Arguments
/// * `address` - Candidate address string
///
/// # Returns
/// `true` if the string is a well-formed address, `false` otherwise
pub fn is_wallet_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Compares two hex addresses for equality, ignoring case.
///
/// # Arguments
/// * `a` - First address
/// * `b` - Second address
///
/// # Returns
/// `true` if both refer to the same account
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_wallet_address() {
        assert!(is_wallet_address(
            "0x52908400098527886E0F7030069857D2E4169EE7"
        ));
        assert!(is_wallet_address(
            "0x52908400098527886e0f7030069857d2e4169ee7"
        ));

        // Missing prefix
        assert!(!is_wallet_address(
            "52908400098527886E0F7030069857D2E4169EE7"
        ));
        // Wrong length
        assert!(!is_wallet_address("0x5290840009852788"));
        // Non-hex characters
        assert!(!is_wallet_address(
            "0xZZ908400098527886E0F7030069857D2E4169EE7"
        ));
        assert!(!is_wallet_address(""));
    }

    #[test]
    fn test_addresses_match_is_case_insensitive() {
        assert!(addresses_match(
            "0x52908400098527886E0F7030069857D2E4169EE7",
            "0x52908400098527886e0f7030069857d2e4169ee7"
        ));
        assert!(!addresses_match(
            "0x52908400098527886e0f7030069857d2e4169ee7",
            "0x8617E340B3D01FA5F11F306F4090FD50E238070D"
        ));
    }
}
