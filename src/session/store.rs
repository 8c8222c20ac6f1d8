// src/session/store.rs
//! Process-wide session store.
//!
//! The single source of truth for authentication state: bearer token, user
//! record, and the currently connected wallet account. Feature services read
//! credentials from here on every call and never cache them.
//!
//! State invariants:
//! - `token` absent implies `user` absent
//! - `user.wallet_address` is authoritative once `wallet_bound` is true; the
//!   connected account must match it (case-insensitive) before any
//!   wallet-gated request is issued
//!
//! Sessions are process-lifetime only. `init` rehydrates nothing but the
//! wallet connection (silent account query plus the account-change
//! subscription); token and user always start empty.

use crate::api::types::{BindWalletRequest, ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::address::addresses_match;
use crate::wallet::{Subscription, WalletAdapter};
use std::sync::{Arc, Mutex};

/// Fixed prefix of the wallet-binding message. The connected address is
/// appended so the backend can check the signed message names the address
/// being bound.
const BIND_MESSAGE_PREFIX: &str = "Please sign this message to bind wallet ";

/// Mutable session state behind the store's mutex.
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    connected_wallet: Option<String>,
    loading: bool,
}

/// Immutable view of the session, consumed by the route guard and the CLI.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// True until the initial wallet-connection check has resolved
    pub loading: bool,
    /// Bearer token, present while authenticated
    pub token: Option<String>,
    /// Authenticated user record
    pub user: Option<User>,
    /// Currently connected wallet account
    pub connected_wallet: Option<String>,
}

/// Process-wide authentication and wallet-binding state.
///
/// Mutated only through its declared operations; constructed once at
/// application start and torn down on full teardown (dropping the store
/// cancels the account-change subscription).
pub struct SessionStore {
    api: ApiClient,
    wallet: WalletAdapter,
    state: Arc<Mutex<SessionState>>,
    accounts_subscription: Mutex<Option<Subscription>>,
}

impl SessionStore {
    /// Creates an empty store. Call [`SessionStore::init`] before use.
    pub fn new(api: ApiClient, wallet: WalletAdapter) -> Self {
        SessionStore {
            api,
            wallet,
            state: Arc::new(Mutex::new(SessionState {
                token: None,
                user: None,
                connected_wallet: None,
                loading: true,
            })),
            accounts_subscription: Mutex::new(None),
        }
    }

    /// Resolves the initial wallet-connection state.
    ///
    /// Silently queries already-authorized accounts (never prompting) and
    /// registers the account-change subscription. An emptied account list
    /// (wallet locked) clears the connected account so later wallet-gated
    /// calls fail fast instead of signing with a stale address. Token and
    /// user are never rehydrated.
    pub async fn init(&self) {
        let connected = match self.wallet.current_accounts().await {
            Ok(accounts) => accounts.into_iter().next(),
            Err(_) => None,
        };

        let weak = Arc::downgrade(&self.state);
        let subscription = self
            .wallet
            .on_accounts_changed(Box::new(move |accounts| {
                // The store may already be gone; updating through a dead
                // weak reference is a no-op.
                if let Some(state) = weak.upgrade() {
                    if let Ok(mut state) = state.lock() {
                        state.connected_wallet = accounts.first().cloned();
                    }
                }
            }))
            .ok();
        *self.accounts_subscription.lock().unwrap() = subscription;

        let mut state = self.state.lock().unwrap();
        state.connected_wallet = connected;
        state.loading = false;
        log::info!(
            "session initialized (wallet connected: {})",
            state.connected_wallet.is_some()
        );
    }

    /// Returns an immutable view of the current session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot {
            loading: state.loading,
            token: state.token.clone(),
            user: state.user.clone(),
            connected_wallet: state.connected_wallet.clone(),
        }
    }

    // ---- Authentication operations ----

    /// Registers a new account and enters the Authenticated state.
    ///
    /// # Errors
    /// `RegistrationRejected` with the backend's message (e.g. duplicate
    /// email) on rejection
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let auth = self
            .api
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| match e {
                Error::ValidationError(message) | Error::Conflict(message) => {
                    Error::RegistrationRejected(message)
                }
                other => other,
            })?;

        log::info!("registered user {}", auth.user.email);
        let mut state = self.state.lock().unwrap();
        state.token = Some(auth.token);
        state.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Logs in and enters the Authenticated state.
    ///
    /// # Errors
    /// `InvalidCredentials` if the backend rejects the email/password pair
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let auth = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| match e {
                Error::Unauthorized => Error::InvalidCredentials,
                other => other,
            })?;

        log::info!("logged in as {}", auth.user.email);
        let mut state = self.state.lock().unwrap();
        state.token = Some(auth.token);
        state.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Clears the session, returning to Anonymous.
    ///
    /// The wallet connection is left untouched; disconnecting is the wallet
    /// provider's business, not the session's.
    pub fn logout(&self) {
        let mut state = self.state.lock().unwrap();
        state.token = None;
        state.user = None;
        log::info!("logged out");
    }

    // ---- Wallet operations ----

    /// Connects the wallet (prompting if needed) and records the account.
    pub async fn connect_wallet(&self) -> Result<String> {
        let address = self.wallet.connect().await?;
        let mut state = self.state.lock().unwrap();
        state.connected_wallet = Some(address.clone());
        Ok(address)
    }

    /// Binds the connected wallet account to the authenticated user.
    ///
    /// Signs a fixed message containing the connected address and submits
    /// the address/signature/message triple. Binding is one-way; there is no
    /// unbind.
    ///
    /// # Errors
    /// - `NotAuthenticated` without a session
    /// - `AlreadyBound` if the user already has a bound wallet (checked
    ///   locally, no request is issued)
    /// - `WalletNotConnected` without a connected account
    /// - `UserRejected` / `SigningFailed` from the wallet prompt
    /// - `BindRejected` with the backend's message on rejection
    pub async fn bind_wallet(&self) -> Result<User> {
        let (token, address) = {
            let state = self.state.lock().unwrap();
            let token = state.token.clone().ok_or(Error::NotAuthenticated)?;
            let user = state.user.as_ref().ok_or(Error::NotAuthenticated)?;
            if user.wallet_bound {
                return Err(Error::AlreadyBound);
            }
            let address = state
                .connected_wallet
                .clone()
                .ok_or(Error::WalletNotConnected)?;
            (token, address)
        };

        let message = format!("{}{}", BIND_MESSAGE_PREFIX, address);
        let signature = self.wallet.sign_message(&address, &message).await?;

        let user = self
            .api
            .bind_wallet(
                &token,
                &BindWalletRequest {
                    wallet_address: address,
                    signature,
                    message,
                },
            )
            .await
            .map_err(|e| match e {
                Error::ValidationError(message) | Error::Conflict(message) => {
                    Error::BindRejected(message)
                }
                other => self.absorb_unauthorized(other),
            })?;

        log::info!(
            "wallet {} bound",
            user.wallet_address.as_deref().unwrap_or("?")
        );
        let mut state = self.state.lock().unwrap();
        state.user = Some(user.clone());
        Ok(user)
    }

    // ---- Supplemental profile operations ----

    /// Re-fetches the user record and refreshes the cached copy.
    pub async fn refresh_profile(&self) -> Result<User> {
        let token = self.bearer()?;
        let user = self
            .api
            .profile(&token)
            .await
            .map_err(|e| self.absorb_unauthorized(e))?;
        let mut state = self.state.lock().unwrap();
        state.user = Some(user.clone());
        Ok(user)
    }

    /// Changes the account password.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<String> {
        let token = self.bearer()?;
        self.api
            .change_password(
                &token,
                &ChangePasswordRequest {
                    old_password: old_password.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await
            .map_err(|e| self.absorb_unauthorized(e))
    }

    // ---- Credential gates for the feature services ----

    /// The shared API client.
    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The wallet adapter, for per-request signing.
    pub(crate) fn wallet(&self) -> &WalletAdapter {
        &self.wallet
    }

    /// Returns the bearer token or fails `NotAuthenticated`.
    pub(crate) fn bearer(&self) -> Result<String> {
        self.state
            .lock()
            .unwrap()
            .token
            .clone()
            .ok_or(Error::NotAuthenticated)
    }

    /// Gate for wallet-gated calls: requires a session, a connected account,
    /// and a case-insensitive match between the connected account and the
    /// bound wallet address. Violations fail fast; no request is issued.
    pub(crate) fn wallet_gate(&self) -> Result<(String, String)> {
        let state = self.state.lock().unwrap();
        let token = state.token.clone().ok_or(Error::NotAuthenticated)?;
        let user = state.user.as_ref().ok_or(Error::NotAuthenticated)?;
        let connected = state
            .connected_wallet
            .clone()
            .ok_or(Error::WalletNotConnected)?;

        let bound = user
            .wallet_address
            .as_deref()
            .filter(|_| user.wallet_bound)
            .unwrap_or("(no wallet bound)");
        if !addresses_match(&connected, bound) {
            return Err(Error::WalletMismatch {
                connected,
                bound: bound.to_string(),
            });
        }
        Ok((token, connected))
    }

    /// Forces logout on `Unauthorized` so a stale token cannot loop; the
    /// error itself is passed through unchanged.
    pub(crate) fn absorb_unauthorized(&self, err: Error) -> Error {
        if matches!(err, Error::Unauthorized) {
            log::warn!("token rejected by backend, clearing session");
            self.logout();
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::KeyWalletProvider;
    use crate::wallet::provider::WalletProvider;
    use mockito::{mock, Matcher};
    use std::sync::Arc;

    async fn store_with_provider() -> (SessionStore, Arc<KeyWalletProvider>) {
        let provider = Arc::new(KeyWalletProvider::random());
        let api = ApiClient::new(&mockito::server_url()).unwrap();
        let store = SessionStore::new(api, WalletAdapter::new(provider.clone()));
        store.init().await;
        (store, provider)
    }

    // The mock server is shared across tests; each test uses its own email
    // and bearer token so mock matching stays unambiguous.
    fn login_mock(email: &str, token: &str, user_json: &str) -> mockito::Mock {
        mock("POST", "/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": email,
                "password": "hunter22"
            })))
            .with_status(200)
            .with_body(format!(r#"{{"token": "{}", "user": {}}}"#, token, user_json))
            .create()
    }

    #[tokio::test]
    async fn test_login_bind_logout_ends_anonymous() {
        let (store, provider) = store_with_provider().await;
        let address = provider.accounts().await.unwrap()[0].clone();

        let _login = login_mock(
            "bindflow@example.com",
            "tok-bindflow",
            r#"{"id": 1, "name": "Alice", "email": "bindflow@example.com"}"#,
        );
        let _bind = mock("PUT", "/profile/wallet")
            .match_header("authorization", "Bearer tok-bindflow")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "wallet_address": address,
                "message": format!("Please sign this message to bind wallet {}", address)
            })))
            .with_status(200)
            .with_body(format!(
                r#"{{"user": {{
                    "id": 1,
                    "name": "Alice",
                    "email": "bindflow@example.com",
                    "wallet_bound": true,
                    "wallet_address": "{}"
                }}}}"#,
                address
            ))
            .create();

        store.login("bindflow@example.com", "hunter22").await.unwrap();
        let user = store.bind_wallet().await.unwrap();
        assert!(user.wallet_bound);

        store.logout();
        let snapshot = store.snapshot();
        assert!(snapshot.token.is_none());
        assert!(snapshot.user.is_none());
        // The wallet connection survives logout.
        assert!(snapshot.connected_wallet.is_some());
    }

    #[tokio::test]
    async fn test_bind_wallet_already_bound_issues_no_request() {
        let (store, provider) = store_with_provider().await;
        let address = provider.accounts().await.unwrap()[0].clone();

        let _login = login_mock(
            "bound@example.com",
            "tok-bound",
            &format!(
                r#"{{
                    "id": 2,
                    "name": "Bob",
                    "email": "bound@example.com",
                    "wallet_bound": true,
                    "wallet_address": "{}"
                }}"#,
                address
            ),
        );
        let bind = mock("PUT", "/profile/wallet")
            .match_header("authorization", "Bearer tok-bound")
            .expect(0)
            .create();

        store.login("bound@example.com", "hunter22").await.unwrap();
        let err = store.bind_wallet().await.unwrap_err();
        assert!(matches!(err, Error::AlreadyBound));
        bind.assert();
    }

    #[tokio::test]
    async fn test_bind_wallet_requires_authentication() {
        let (store, _provider) = store_with_provider().await;
        let err = store.bind_wallet().await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let (store, _provider) = store_with_provider().await;
        let _m = mock("POST", "/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "wrong@example.com",
                "password": "hunter22"
            })))
            .with_status(401)
            .with_body(r#"{"error": "Invalid email or password"}"#)
            .create();

        let err = store.login("wrong@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(store.snapshot().user.is_none());
    }

    #[tokio::test]
    async fn test_registration_rejected_carries_message() {
        let (store, _provider) = store_with_provider().await;
        let _m = mock("POST", "/register")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "email": "dup@example.com"
            })))
            .with_status(400)
            .with_body(r#"{"error": "Email already registered"}"#)
            .create();

        let err = store
            .register("Dup", "dup@example.com", "hunter22")
            .await
            .unwrap_err();
        match err {
            Error::RegistrationRejected(message) => {
                assert_eq!(message, "Email already registered")
            }
            other => panic!("expected RegistrationRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wallet_gate_is_case_insensitive() {
        let (store, provider) = store_with_provider().await;
        let address = provider.accounts().await.unwrap()[0].clone();
        // The backend stored the same account in a different hex case.
        let bound = address.to_uppercase().replacen("0X", "0x", 1);

        let _login = login_mock(
            "case@example.com",
            "tok-case",
            &format!(
                r#"{{
                    "id": 3,
                    "name": "Cara",
                    "email": "case@example.com",
                    "wallet_bound": true,
                    "wallet_address": "{}"
                }}"#,
                bound
            ),
        );
        store.login("case@example.com", "hunter22").await.unwrap();

        let (_, connected) = store.wallet_gate().unwrap();
        assert_eq!(connected, address);
    }

    #[tokio::test]
    async fn test_wallet_gate_rejects_different_account() {
        let (store, _provider) = store_with_provider().await;

        let _login = login_mock(
            "mismatch@example.com",
            "tok-mismatch",
            r#"{
                "id": 4,
                "name": "Dave",
                "email": "mismatch@example.com",
                "wallet_bound": true,
                "wallet_address": "0x8617E340B3D01FA5F11F306F4090FD50E238070D"
            }"#,
        );
        store.login("mismatch@example.com", "hunter22").await.unwrap();

        let err = store.wallet_gate().unwrap_err();
        assert!(matches!(err, Error::WalletMismatch { .. }));
    }

    #[tokio::test]
    async fn test_locking_wallet_clears_connection() {
        let (store, provider) = store_with_provider().await;
        assert!(store.snapshot().connected_wallet.is_some());

        let _login = login_mock(
            "locked@example.com",
            "tok-locked",
            r#"{"id": 5, "name": "Eve", "email": "locked@example.com"}"#,
        );
        store.login("locked@example.com", "hunter22").await.unwrap();

        // Simulate the user locking the wallet: the account list empties and
        // the subscription clears the connected account.
        provider.set_accounts(vec![]);
        assert!(store.snapshot().connected_wallet.is_none());

        let err = store.wallet_gate().unwrap_err();
        assert!(matches!(err, Error::WalletNotConnected));
    }

    #[tokio::test]
    async fn test_unauthorized_forces_logout() {
        let (store, _provider) = store_with_provider().await;
        let _login = login_mock(
            "stale@example.com",
            "tok-stale",
            r#"{"id": 6, "name": "Fay", "email": "stale@example.com"}"#,
        );
        let _profile = mock("GET", "/profile")
            .match_header("authorization", "Bearer tok-stale")
            .with_status(401)
            .with_body(r#"{"error": "Token expired"}"#)
            .create();

        store.login("stale@example.com", "hunter22").await.unwrap();
        let err = store.refresh_profile().await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        assert!(store.snapshot().user.is_none());
        assert!(store.snapshot().token.is_none());
    }
}
