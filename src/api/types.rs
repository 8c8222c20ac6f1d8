// src/api/types.rs
//! Request and response payloads for the backend REST API.
//!
//! Field names follow the backend's wire contract exactly; request structs
//! exist only as serialization shapes and carry no behavior.

use crate::models::authorization::{Authorization, DataType, TimelineLog};
use crate::models::declaration::Declaration;
use crate::models::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on any non-success status
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Request payload for account registration
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request payload for login
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login operations
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Request payload for binding a wallet to the account
#[derive(Serialize, Deserialize, Debug)]
pub struct BindWalletRequest {
    pub wallet_address: String,
    pub signature: String,
    pub message: String,
}

/// Response wrapping an updated user record
#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub user: User,
}

/// Request payload for a password change
#[derive(Serialize, Deserialize, Debug)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response for the authorization list
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthorizationListResponse {
    pub authorizations: Vec<Authorization>,
}

/// Request payload for creating an authorization
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateAuthorizationRequest {
    pub data_type: DataType,
    pub authorized_address: String,
    pub duration_minutes: u32,
}

/// Response for authorization creation
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateAuthorizationResponse {
    pub message: String,
    pub authorization: Authorization,
}

/// Response carrying only a confirmation message
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for an authorization's audit timeline
#[derive(Serialize, Deserialize, Debug)]
pub struct TimelineResponse {
    pub logs: Vec<TimelineLog>,
}

/// Response carrying stored or authorized data content
#[derive(Serialize, Deserialize, Debug)]
pub struct DataContentResponse {
    pub data_content: serde_json::Value,
}

/// Request payload for storing user data
#[derive(Serialize, Deserialize, Debug)]
pub struct StoreUserDataRequest {
    pub data_content: serde_json::Value,
}

/// Request payload for creating a declaration
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateDeclarationRequest {
    pub content: String,
}

/// Response wrapping a created declaration
#[derive(Serialize, Deserialize, Debug)]
pub struct DeclarationResponse {
    pub declaration: Declaration,
}

/// Response for an encrypted file upload
#[derive(Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    /// Content hash of the encrypted file, used as the decryption key handle
    #[serde(default)]
    pub hash: Option<String>,
    /// Some backend versions return the ciphertext instead of a hash
    #[serde(default)]
    pub encrypted_data: Option<String>,
}

/// Request payload for decrypting a stored file
#[derive(Serialize, Deserialize, Debug)]
pub struct DecryptRequest {
    pub hash: String,
}

/// Response for a decrypt operation
#[derive(Serialize, Deserialize, Debug)]
pub struct DecryptResponse {
    /// Base64-encoded plaintext file content
    pub file_content: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// One entry of the per-user activity log
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserLog {
    pub id: u64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for the per-user activity log
#[derive(Serialize, Deserialize, Debug)]
pub struct UserLogsResponse {
    pub logs: Vec<UserLog>,
}

/// The signature/message/address triple attached to wallet-gated requests.
///
/// The message must be byte-for-byte the string that was signed or the
/// backend rejects the request as unauthorized.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub address: String,
    pub message: String,
    pub signature: String,
}
