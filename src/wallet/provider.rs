// src/wallet/provider.rs
//! Wallet provider trait and the key-backed in-process implementation.
//!
//! A provider owns accounts and can produce EIP-191 personal signatures over
//! literal message strings, matching the `personal_sign` capability of a
//! browser wallet. Account changes (switch, lock, unlock) are delivered to
//! subscribers at most once per change, and subscriptions unregister
//! themselves on drop so remounting consumers never accumulate duplicate
//! handlers.

use crate::error::{Error, Result};
use crate::utils::address::addresses_match;
use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new active-account list after a change.
pub type AccountsCallback = Box<dyn Fn(&[String]) + Send + Sync>;

type SubscriberMap = HashMap<u64, AccountsCallback>;

/// Handle for an account-change subscription.
///
/// Unsubscribes on [`Subscription::unsubscribe`] or on drop; after that the
/// callback is never invoked again.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<SubscriberMap>>,
}

impl Subscription {
    /// Explicitly cancels the subscription. Equivalent to dropping it.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            if let Ok(mut map) = subscribers.lock() {
                map.remove(&self.id);
            }
        }
    }
}

/// Capability surface of a wallet provider.
///
/// All failures surface immediately to the caller; providers never retry,
/// queue, or batch.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the host exposes this provider at all.
    fn is_available(&self) -> bool;

    /// Requests account access, possibly prompting the user.
    ///
    /// # Errors
    /// `UserRejected` if the user dismisses the prompt
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Returns already-authorized accounts without prompting.
    async fn accounts(&self) -> Result<Vec<String>>;

    /// Produces an EIP-191 personal signature over the literal message
    /// string, hex-encoded with a `0x` prefix.
    ///
    /// # Errors
    /// `SigningFailed` if the address is unknown or signing fails,
    /// `UserRejected` if the user dismisses the prompt
    async fn personal_sign(&self, address: &str, message: &str) -> Result<String>;

    /// Registers an account-change callback.
    ///
    /// The callback receives the full new account list (possibly empty, e.g.
    /// when the wallet is locked) at most once per change.
    fn subscribe_accounts_changed(&self, callback: AccountsCallback) -> Subscription;
}

/// In-process wallet provider backed by local secp256k1 keys.
///
/// Stands in for the browser wallet extension: it holds one [`LocalWallet`]
/// per account and an active-account list behind a mutex. `set_accounts`
/// models user-driven account switches and wallet locking and notifies
/// subscribers exactly once per actual change.
pub struct KeyWalletProvider {
    keys: Vec<LocalWallet>,
    accounts: Mutex<Vec<String>>,
    subscribers: Arc<Mutex<SubscriberMap>>,
    next_subscriber_id: AtomicU64,
}

impl KeyWalletProvider {
    /// Creates a provider over the given keys, all initially active.
    pub fn new(keys: Vec<LocalWallet>) -> Self {
        let accounts = keys.iter().map(Self::address_of).collect();
        KeyWalletProvider {
            keys,
            accounts: Mutex::new(accounts),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    /// Creates a provider from a hex-encoded private key.
    ///
    /// # Errors
    /// `ValidationError` if the key does not parse
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let wallet = LocalWallet::from_str(private_key.trim_start_matches("0x"))
            .map_err(|e| Error::ValidationError(format!("invalid wallet private key: {}", e)))?;
        Ok(Self::new(vec![wallet]))
    }

    /// Creates a provider with a single freshly generated key.
    pub fn random() -> Self {
        Self::new(vec![LocalWallet::new(&mut rand::thread_rng())])
    }

    fn address_of(wallet: &LocalWallet) -> String {
        format!("0x{:x}", wallet.address())
    }

    /// Replaces the active-account list, modeling an account switch or a
    /// wallet lock (empty list). Subscribers are notified only when the list
    /// actually changed.
    pub fn set_accounts(&self, accounts: Vec<String>) {
        {
            let mut current = self.accounts.lock().unwrap();
            if *current == accounts {
                return;
            }
            *current = accounts.clone();
        }
        log::debug!("wallet accounts changed: {:?}", accounts);
        let subscribers = self.subscribers.lock().unwrap();
        for callback in subscribers.values() {
            callback(&accounts);
        }
    }

    fn key_for(&self, address: &str) -> Option<&LocalWallet> {
        self.keys
            .iter()
            .find(|k| addresses_match(&Self::address_of(k), address))
    }
}

#[async_trait]
impl WalletProvider for KeyWalletProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        let accounts = self.accounts.lock().unwrap().clone();
        if accounts.is_empty() {
            // A locked wallet refuses the access prompt.
            return Err(Error::UserRejected);
        }
        Ok(accounts)
    }

    async fn accounts(&self) -> Result<Vec<String>> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn personal_sign(&self, address: &str, message: &str) -> Result<String> {
        let active = self.accounts.lock().unwrap().clone();
        if !active.iter().any(|a| addresses_match(a, address)) {
            return Err(Error::SigningFailed(format!(
                "account {} is not active",
                address
            )));
        }
        let wallet = self
            .key_for(address)
            .ok_or_else(|| Error::SigningFailed(format!("unknown account {}", address)))?;
        let signature = wallet
            .sign_message(message)
            .await
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        Ok(format!("0x{}", signature))
    }

    fn subscribe_accounts_changed(&self, callback: AccountsCallback) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().insert(id, callback);
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }
}
