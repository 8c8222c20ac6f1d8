// src/session/mod.rs
//! Session lifecycle: authentication state, wallet binding, and the guard
//! that gates protected operations on it.
//!
//! The lifecycle is a one-way ladder re-entered only through logout:
//! Anonymous -> Authenticated (register/login) -> Authenticated+WalletBound
//! (bind_wallet) -> Anonymous (logout, from any authenticated state).

pub mod guard;
pub mod store;

pub use guard::{evaluate, GuardDecision};
pub use store::{SessionSnapshot, SessionStore};
