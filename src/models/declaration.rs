// src/models/declaration.rs
//! Signed declaration entities.
//!
//! A declaration is a statement signed server-side on behalf of the user.
//! Once created it is immutable; verification is a separate read-only call
//! keyed by the declaration's signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable signed declaration as reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Declaration {
    /// Backend-assigned identifier
    pub id: u64,

    /// Declared statement text
    pub content: String,

    /// Server-produced signature over the content; also the verification key
    pub signature: String,

    /// Server path of the generated QR code image, if any
    #[serde(default)]
    pub qr_code_path: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Optional expiry timestamp
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of verifying a declaration signature.
///
/// An unknown or invalid signature is a *successful* verification call with
/// `is_valid == false` and no `details`; it must never surface as an error.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationResult {
    /// Whether the signature matches a known, unexpired declaration
    #[serde(rename = "isValid")]
    pub is_valid: bool,

    /// Human-readable verdict from the backend
    pub message: String,

    /// Declaration details, present only on success
    #[serde(default)]
    pub details: Option<VerificationDetails>,
}

/// Declaration details returned alongside a positive verification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationDetails {
    /// Declared statement text
    pub content: String,

    /// The verified signature
    pub signature: String,

    /// When the declaration was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
