// src/api/client.rs
//! Authenticated API client for the DID backend.
//!
//! Wraps a shared `reqwest::Client` and exposes one method per backend
//! endpoint. Every call is a single fire-and-parse round trip: no retries,
//! no caching, no request deduplication. Consistency after a mutation is the
//! caller's responsibility and is achieved by explicit re-fetch.
//!
//! Responsibilities:
//! - Attach the bearer token to every call except register/login
//! - Attach the signature/message/address triple to wallet-gated requests
//! - Normalize non-success responses into the crate error taxonomy
//!
//! Parameter validation (session present, wallet match) happens upstream in
//! the session store; methods here assume already-validated input.

use crate::api::types::*;
use crate::error::{Error, Result};
use crate::models::authorization::{Authorization, DataType, TimelineLog};
use crate::models::declaration::{Declaration, VerificationResult};
use crate::models::user::User;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Bounded timeout on every request so a stalled backend surfaces as
/// `NetworkError` instead of an indefinite loading state.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the DID backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend API, with or without a trailing slash
    ///
    /// # Errors
    /// Returns `NetworkError` if the underlying HTTP client cannot be built
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Normalizes a response into the parsed success payload or an error
    /// variant derived from the HTTP status and the backend's error body.
    async fn parse<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        log::debug!("request failed with {}: {}", status, message);

        Err(match status.as_u16() {
            400 => Error::ValidationError(message),
            401 => Error::Unauthorized,
            403 => Error::Forbidden,
            404 => Error::NotFound,
            409 => Error::Conflict(message),
            code => Error::ServerError {
                status: code,
                message,
            },
        })
    }

    // ---- Authentication ----

    /// Registers a new account. No bearer token is attached.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(request)
            .send()
            .await?;
        self.parse(response).await
    }

    /// Logs in with email and password. No bearer token is attached.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(request)
            .send()
            .await?;
        self.parse(response).await
    }

    /// Binds a wallet address to the account.
    ///
    /// The message field must be byte-for-byte the string that produced the
    /// signature.
    pub async fn bind_wallet(&self, token: &str, request: &BindWalletRequest) -> Result<User> {
        let response = self
            .http
            .put(self.url("/profile/wallet"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let body: UserResponse = self.parse(response).await?;
        Ok(body.user)
    }

    /// Fetches the current user record.
    pub async fn profile(&self, token: &str) -> Result<User> {
        let response = self
            .http
            .get(self.url("/profile"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: UserResponse = self.parse(response).await?;
        Ok(body.user)
    }

    /// Changes the account password.
    pub async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<String> {
        let response = self
            .http
            .put(self.url("/profile/password"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let body: MessageResponse = self.parse(response).await?;
        Ok(body.message)
    }

    /// Fetches the per-user activity log.
    pub async fn user_logs(&self, token: &str) -> Result<Vec<UserLog>> {
        let response = self
            .http
            .get(self.url("/profile/logs"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: UserLogsResponse = self.parse(response).await?;
        Ok(body.logs)
    }

    // ---- Authorizations ----

    /// Lists the user's data authorizations.
    pub async fn list_authorizations(&self, token: &str) -> Result<Vec<Authorization>> {
        let response = self
            .http
            .get(self.url("/authorizations"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: AuthorizationListResponse = self.parse(response).await?;
        Ok(body.authorizations)
    }

    /// Creates a data authorization with a server-computed expiry.
    pub async fn create_authorization(
        &self,
        token: &str,
        request: &CreateAuthorizationRequest,
    ) -> Result<CreateAuthorizationResponse> {
        let response = self
            .http
            .post(self.url("/authorizations"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        self.parse(response).await
    }

    /// Revokes an authorization by id.
    ///
    /// Revoking an already-revoked authorization fails with `Conflict`.
    pub async fn revoke_authorization(&self, token: &str, id: u64) -> Result<String> {
        let response = self
            .http
            .post(self.url(&format!("/authorizations/{}/revoke", id)))
            .bearer_auth(token)
            .send()
            .await?;
        let body: MessageResponse = self.parse(response).await?;
        Ok(body.message)
    }

    /// Fetches the append-only audit timeline for an authorization.
    pub async fn authorization_timeline(&self, token: &str, id: u64) -> Result<Vec<TimelineLog>> {
        let response = self
            .http
            .get(self.url(&format!("/authorizations/{}/timeline", id)))
            .bearer_auth(token)
            .send()
            .await?;
        let body: TimelineResponse = self.parse(response).await?;
        Ok(body.logs)
    }

    // ---- Data access ----

    /// Fetches data shared with the connected wallet (wallet-gated).
    ///
    /// Attaches the signature triple as request headers alongside the bearer
    /// token; the backend verifies the signature against the address before
    /// releasing the data.
    pub async fn fetch_authorized_data(
        &self,
        token: &str,
        data_type: DataType,
        signed: &SignedRequest,
    ) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(self.url(&format!("/authorized-data/{}", data_type)))
            .bearer_auth(token)
            .header("X-Wallet-Signature", &signed.signature)
            .header("X-Message", &signed.message)
            .header("X-Wallet-Address", &signed.address)
            .send()
            .await?;
        let body: DataContentResponse = self.parse(response).await?;
        Ok(body.data_content)
    }

    /// Fetches the user's own stored data for one category.
    pub async fn get_user_data(&self, token: &str, data_type: DataType) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(self.url(&format!("/user-data/{}", data_type)))
            .bearer_auth(token)
            .send()
            .await?;
        let body: DataContentResponse = self.parse(response).await?;
        Ok(body.data_content)
    }

    /// Stores the user's own data for one category.
    pub async fn put_user_data(
        &self,
        token: &str,
        data_type: DataType,
        data_content: serde_json::Value,
    ) -> Result<String> {
        let response = self
            .http
            .put(self.url(&format!("/user-data/{}", data_type)))
            .bearer_auth(token)
            .json(&StoreUserDataRequest { data_content })
            .send()
            .await?;
        let body: MessageResponse = self.parse(response).await?;
        Ok(body.message)
    }

    /// Uploads a file for server-side encryption and storage (multipart).
    pub async fn upload_user_file(
        &self,
        token: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("/user-data/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        self.parse(response).await
    }

    /// Decrypts a stored file by its content hash.
    pub async fn decrypt_user_file(&self, token: &str, hash: &str) -> Result<DecryptResponse> {
        let response = self
            .http
            .post(self.url("/user-data/decrypt"))
            .bearer_auth(token)
            .json(&DecryptRequest {
                hash: hash.to_string(),
            })
            .send()
            .await?;
        self.parse(response).await
    }

    // ---- Declarations ----

    /// Creates an immutable signed declaration.
    pub async fn create_declaration(&self, token: &str, content: &str) -> Result<Declaration> {
        let response = self
            .http
            .post(self.url("/declarations"))
            .bearer_auth(token)
            .json(&CreateDeclarationRequest {
                content: content.to_string(),
            })
            .send()
            .await?;
        let body: DeclarationResponse = self.parse(response).await?;
        Ok(body.declaration)
    }

    /// Verifies a declaration by its signature.
    ///
    /// An unknown signature is a successful call reporting `is_valid=false`,
    /// not an error.
    pub async fn verify_declaration(
        &self,
        token: &str,
        signature: &str,
    ) -> Result<VerificationResult> {
        let response = self
            .http
            .get(self.url(&format!("/declarations/{}/verify", signature)))
            .bearer_auth(token)
            .send()
            .await?;
        self.parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::authorization::AuthorizationStatus;
    use mockito::mock;

    fn client() -> ApiClient {
        ApiClient::new(&mockito::server_url()).unwrap()
    }

    // The mock server is shared across tests, so every mock is pinned to a
    // per-test bearer token (or request body) to keep matches unambiguous.

    #[tokio::test]
    async fn test_status_code_mapping() {
        let _unauthorized = mock("GET", "/authorizations")
            .match_header("authorization", "Bearer tok-status-401")
            .with_status(401)
            .with_body(r#"{"error": "Token expired"}"#)
            .create();
        let err = client()
            .list_authorizations("tok-status-401")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        let _not_found = mock("GET", "/authorizations/99/timeline")
            .match_header("authorization", "Bearer tok-status-404")
            .with_status(404)
            .with_body(r#"{"error": "Authorization not found"}"#)
            .create();
        let err = client()
            .authorization_timeline("tok-status-404", 99)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));

        let _server_error = mock("GET", "/profile/logs")
            .match_header("authorization", "Bearer tok-status-500")
            .with_status(500)
            .with_body(r#"{"error": "Internal server error"}"#)
            .create();
        let err = client().user_logs("tok-status-500").await.unwrap_err();
        assert!(matches!(err, Error::ServerError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_validation_error_carries_backend_message() {
        let _m = mock("POST", "/register")
            .with_status(400)
            .with_body(r#"{"error": "Email already registered"}"#)
            .create();

        let err = client()
            .register(&RegisterRequest {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();

        match err {
            Error::ValidationError(message) => assert_eq!(message, "Email already registered"),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_parses_token_and_user() {
        let _m = mock("POST", "/login")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "email": "alice@example.com",
                "password": "hunter22"
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "token": "tok-1",
                    "user": {"id": 1, "name": "Alice", "email": "alice@example.com"}
                }"#,
            )
            .create();

        let auth = client()
            .login(&LoginRequest {
                email: "alice@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();

        assert_eq!(auth.token, "tok-1");
        assert_eq!(auth.user.email, "alice@example.com");
        assert!(!auth.user.wallet_bound);
    }

    #[tokio::test]
    async fn test_revoke_conflict_on_second_call() {
        let _m = mock("POST", "/authorizations/5/revoke")
            .match_header("authorization", "Bearer tok-revoke-conflict")
            .with_status(409)
            .with_body(r#"{"error": "Authorization already revoked"}"#)
            .create();

        let err = client()
            .revoke_authorization("tok-revoke-conflict", 5)
            .await
            .unwrap_err();
        match err {
            Error::Conflict(message) => assert_eq!(message, "Authorization already revoked"),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authorized_data_sends_signature_headers() {
        let _m = mock("GET", "/authorized-data/identity")
            .match_header("authorization", "Bearer tok-adata-client")
            .match_header("x-wallet-signature", "0xsig")
            .match_header("x-message", "Request access to identity data")
            .match_header(
                "x-wallet-address",
                "0x52908400098527886e0f7030069857d2e4169ee7",
            )
            .with_status(200)
            .with_body(r#"{"data_content": {"name": "Alice"}}"#)
            .create();

        let data = client()
            .fetch_authorized_data(
                "tok-adata-client",
                DataType::Identity,
                &SignedRequest {
                    address: "0x52908400098527886e0f7030069857d2e4169ee7".into(),
                    message: "Request access to identity data".into(),
                    signature: "0xsig".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(data["name"], "Alice");
    }

    #[tokio::test]
    async fn test_create_authorization_returns_server_expiry() {
        let _m = mock("POST", "/authorizations")
            .match_header("authorization", "Bearer tok-create-client")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "data_type": "profile",
                "authorized_address": "0x8617E340B3D01FA5F11F306F4090FD50E238070D",
                "duration_minutes": 60
            })))
            .with_status(201)
            .with_body(
                r#"{
                    "message": "Authorization created",
                    "authorization": {
                        "id": 3,
                        "data_type": "profile",
                        "authorized_address": "0x8617E340B3D01FA5F11F306F4090FD50E238070D",
                        "status": "active",
                        "created_at": "2026-05-01T10:00:00Z",
                        "expires_at": "2026-05-01T11:00:00Z"
                    }
                }"#,
            )
            .create();

        let created = client()
            .create_authorization(
                "tok-create-client",
                &CreateAuthorizationRequest {
                    data_type: DataType::Profile,
                    authorized_address: "0x8617E340B3D01FA5F11F306F4090FD50E238070D".into(),
                    duration_minutes: 60,
                },
            )
            .await
            .unwrap();

        let auth = created.authorization;
        assert_eq!(auth.status, AuthorizationStatus::Active);
        // The expiry is taken verbatim from the backend.
        assert_eq!(
            auth.expires_at.unwrap() - auth.created_at,
            chrono::Duration::minutes(60)
        );
    }

    #[tokio::test]
    async fn test_verify_unknown_signature_is_not_an_error() {
        let _m = mock("GET", "/declarations/0xdeadbeef/verify")
            .with_status(200)
            .with_body(r#"{"isValid": false, "message": "Unknown signature"}"#)
            .create();

        let result = client()
            .verify_declaration("tok-verify-client", "0xdeadbeef")
            .await
            .unwrap();
        assert!(!result.is_valid);
        assert!(result.details.is_none());
    }

    #[tokio::test]
    async fn test_error_body_fallback_to_status_reason() {
        let _m = mock("GET", "/user-data/profile")
            .match_header("authorization", "Bearer tok-fallback-client")
            .with_status(502)
            .with_body("bad gateway")
            .create();

        let err = client()
            .get_user_data("tok-fallback-client", DataType::Profile)
            .await
            .unwrap_err();
        match err {
            Error::ServerError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected ServerError, got {:?}", other),
        }
    }
}
