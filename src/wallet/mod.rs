// src/wallet/mod.rs
//! Wallet capability layer.
//!
//! The host wallet is modeled as an injectable [`provider::WalletProvider`]
//! trait so every consumer (and every test) can substitute a fake signer.
//! [`adapter::WalletAdapter`] is the narrow surface the rest of the crate
//! talks to.

pub mod adapter;
pub mod provider;

pub use adapter::WalletAdapter;
pub use provider::{KeyWalletProvider, Subscription, WalletProvider};
