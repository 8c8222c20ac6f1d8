// src/models/authorization.rs
//! Data-authorization entities.
//!
//! An authorization grants another wallet address time-limited read access to
//! one category of the owner's data. The full lifecycle (activation, expiry,
//! revocation) is managed server-side; the client only displays what the
//! backend reports and re-fetches after every mutating call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categories of user data that can be authorized or stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Identity information
    Identity,
    /// Personal profile
    Profile,
    /// Credential documents
    Credentials,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Identity => "identity",
            DataType::Profile => "profile",
            DataType::Credentials => "credentials",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(DataType::Identity),
            "profile" => Ok(DataType::Profile),
            "credentials" => Ok(DataType::Credentials),
            other => Err(format!("unknown data type: {}", other)),
        }
    }
}

/// Authorization lifecycle state, owned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    /// Access is currently granted
    Active,
    /// Access was revoked explicitly or lapsed on expiry
    Revoked,
}

/// A data-access grant as reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Authorization {
    /// Backend-assigned identifier
    pub id: u64,

    /// Category of data covered by the grant
    pub data_type: DataType,

    /// Wallet address the data was shared with
    pub authorized_address: String,

    /// Current lifecycle state
    pub status: AuthorizationStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp computed by the backend from the requested duration
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Set once the grant has been revoked
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Action recorded in an authorization's audit timeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineAction {
    Created,
    Revoked,
}

/// One append-only audit entry for an authorization.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimelineLog {
    /// Backend-assigned log identifier
    pub id: u64,

    /// What happened
    pub action: TimelineAction,

    /// When it happened
    pub timestamp: DateTime<Utc>,
}
