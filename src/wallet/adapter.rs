// src/wallet/adapter.rs
//! Thin adapter over an injected wallet provider.
//!
//! This is the only wallet surface the session store and the feature
//! services see. It adds nothing beyond capability checks: when the host has
//! no provider every operation fails fast with `WalletUnavailable`, mirroring
//! a browser without the wallet extension installed.

use crate::error::{Error, Result};
use crate::wallet::provider::{AccountsCallback, Subscription, WalletProvider};
use std::sync::Arc;

/// Adapter over an optional wallet provider.
#[derive(Clone)]
pub struct WalletAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl WalletAdapter {
    /// Wraps a concrete provider.
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        WalletAdapter {
            provider: Some(provider),
        }
    }

    /// Adapter for a host without any wallet provider.
    pub fn unavailable() -> Self {
        WalletAdapter { provider: None }
    }

    /// Whether a wallet provider is present.
    pub fn is_available(&self) -> bool {
        self.provider
            .as_ref()
            .map(|p| p.is_available())
            .unwrap_or(false)
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>> {
        self.provider.as_ref().ok_or(Error::WalletUnavailable)
    }

    /// Requests account access and returns the first (primary) account.
    ///
    /// # Errors
    /// `WalletUnavailable` without a provider, `UserRejected` if the prompt
    /// is dismissed or no account is granted
    pub async fn connect(&self) -> Result<String> {
        let accounts = self.provider()?.request_accounts().await?;
        accounts.into_iter().next().ok_or(Error::UserRejected)
    }

    /// Returns already-authorized accounts without prompting.
    ///
    /// Used at startup to silently restore the wallet connection.
    pub async fn current_accounts(&self) -> Result<Vec<String>> {
        self.provider()?.accounts().await
    }

    /// Requests a personal signature over the literal message string.
    pub async fn sign_message(&self, address: &str, message: &str) -> Result<String> {
        self.provider()?.personal_sign(address, message).await
    }

    /// Subscribes to account changes. The returned handle unregisters the
    /// callback on drop.
    pub fn on_accounts_changed(&self, callback: AccountsCallback) -> Result<Subscription> {
        Ok(self.provider()?.subscribe_accounts_changed(callback))
    }
}
