// src/models/user.rs
//! User account data model.

use serde::{Deserialize, Serialize};

/// A registered user account as reported by the backend.
///
/// `wallet_bound` is authoritative: once it is true, `wallet_address` is the
/// only account the backend will accept for wallet-gated requests, and the
/// locally connected wallet must match it before such a request is issued.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    /// Backend-assigned user identifier
    pub id: u64,

    /// Display name chosen at registration
    #[serde(default)]
    pub name: Option<String>,

    /// Login email address
    pub email: String,

    /// Whether a wallet has been bound to this account (one-way)
    #[serde(default)]
    pub wallet_bound: bool,

    /// Bound wallet address, present once `wallet_bound` is true
    #[serde(default)]
    pub wallet_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_without_wallet_fields() {
        // A freshly registered account carries no wallet information yet.
        let user: User = serde_json::from_str(
            r#"{"id": 7, "name": "Alice", "email": "alice@example.com"}"#,
        )
        .unwrap();

        assert_eq!(user.id, 7);
        assert!(!user.wallet_bound);
        assert!(user.wallet_address.is_none());
    }

    #[test]
    fn test_user_deserializes_bound_wallet() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Alice",
                "email": "alice@example.com",
                "wallet_bound": true,
                "wallet_address": "0x52908400098527886E0F7030069857D2E4169EE7"
            }"#,
        )
        .unwrap();

        assert!(user.wallet_bound);
        assert_eq!(
            user.wallet_address.as_deref(),
            Some("0x52908400098527886E0F7030069857D2E4169EE7")
        );
    }
}
