// src/error.rs
//! Error taxonomy for the DID client.
//!
//! Failures fall into three groups:
//! - Local precondition failures (missing session, missing or mismatched
//!   wallet) that are detected before any network round trip
//! - Wallet provider failures (unavailable, rejected prompt, signing error)
//! - Remote failures, normalized from HTTP status codes by the API client
//!
//! Precondition variants are always raised without issuing a request; remote
//! variants carry the backend's error message where one was returned.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes surfaced by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// No session token is present; the caller must log in first.
    #[error("not authenticated")]
    NotAuthenticated,

    /// No wallet account is connected.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// The connected wallet account differs from the account bound to the
    /// user record. Raised before the request is issued so the client never
    /// acts under the wrong on-chain identity.
    #[error("connected wallet {connected} does not match bound wallet {bound}")]
    WalletMismatch { connected: String, bound: String },

    /// The account already has a bound wallet; binding is one-way.
    #[error("a wallet is already bound to this account")]
    AlreadyBound,

    /// The host exposes no wallet provider.
    #[error("no wallet provider available")]
    WalletUnavailable,

    /// The user dismissed the wallet prompt.
    #[error("wallet request rejected by user")]
    UserRejected,

    /// The wallet provider failed to produce a signature.
    #[error("message signing failed: {0}")]
    SigningFailed(String),

    /// The backend refused the registration (e.g. duplicate email).
    #[error("registration rejected: {0}")]
    RegistrationRejected(String),

    /// Login credentials were not accepted.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The backend refused the wallet binding (e.g. address bound elsewhere).
    #[error("wallet binding rejected: {0}")]
    BindRejected(String),

    /// Missing or expired bearer token (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated but not permitted (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// The requested resource does not exist (HTTP 404).
    #[error("not found")]
    NotFound,

    /// The request conflicts with current server state, e.g. revoking an
    /// already-revoked authorization (HTTP 409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend rejected the request as malformed (HTTP 400).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Transport-level failure, including timeouts.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Backend-side failure (HTTP 5xx).
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },
}

impl Error {
    /// Returns true for failures detected locally, before any request was
    /// issued.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NotAuthenticated
                | Error::WalletNotConnected
                | Error::WalletMismatch { .. }
                | Error::AlreadyBound
        )
    }
}
