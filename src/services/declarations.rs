// src/services/declarations.rs
//! Declaration creation and verification.
//!
//! Declarations are signed and stored server-side and immutable once
//! created. Verification is keyed by the declaration's signature; a negative
//! verdict is a successful call, not an error.

use crate::error::{Error, Result};
use crate::models::declaration::{Declaration, VerificationResult};
use crate::session::SessionStore;
use std::sync::Arc;

/// Declaration operations.
pub struct DeclarationService {
    session: Arc<SessionStore>,
}

impl DeclarationService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        DeclarationService { session }
    }

    /// Creates an immutable signed declaration from the given content.
    pub async fn create(&self, content: &str) -> Result<Declaration> {
        if content.trim().is_empty() {
            return Err(Error::ValidationError(
                "declaration content must not be empty".to_string(),
            ));
        }
        let token = self.session.bearer()?;
        let declaration = self
            .session
            .api()
            .create_declaration(&token, content)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))?;
        log::info!("declaration {} created", declaration.id);
        Ok(declaration)
    }

    /// Verifies a declaration signature.
    ///
    /// Returns `Ok` with `is_valid == false` (and no details) for unknown or
    /// invalid signatures; callers render a failure state, they never catch.
    pub async fn verify(&self, signature: &str) -> Result<VerificationResult> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .verify_declaration(&token, signature)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::wallet::{KeyWalletProvider, WalletAdapter};
    use mockito::{mock, Matcher};

    async fn session(email: &str, token: &str) -> Arc<SessionStore> {
        let api = ApiClient::new(&mockito::server_url()).unwrap();
        let store = Arc::new(SessionStore::new(
            api,
            WalletAdapter::new(Arc::new(KeyWalletProvider::random())),
        ));
        store.init().await;

        let _login = mock("POST", "/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": email,
                "password": "hunter22"
            })))
            .with_status(200)
            .with_body(format!(
                r#"{{"token": "{}", "user": {{"id": 1, "name": "Alice", "email": "{}"}}}}"#,
                token, email
            ))
            .create();
        store.login(email, "hunter22").await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_declaration() {
        let store = session("decl-create@example.com", "tok-decl-create").await;
        let service = DeclarationService::new(store);

        let _m = mock("POST", "/declarations")
            .match_header("authorization", "Bearer tok-decl-create")
            .match_body(Matcher::Json(serde_json::json!({
                "content": "I am over 18"
            })))
            .with_status(201)
            .with_body(
                r#"{"declaration": {
                    "id": 9,
                    "content": "I am over 18",
                    "signature": "0xsig-decl-create",
                    "qr_code_path": "/static/qr/9.png",
                    "created_at": "2026-05-01T10:00:00Z"
                }}"#,
            )
            .create();

        let declaration = service.create("I am over 18").await.unwrap();
        assert_eq!(declaration.id, 9);
        assert_eq!(declaration.signature, "0xsig-decl-create");
        assert!(declaration.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_content_locally() {
        let store = session("decl-empty@example.com", "tok-decl-empty").await;
        let service = DeclarationService::new(store);

        let create = mock("POST", "/declarations")
            .match_header("authorization", "Bearer tok-decl-empty")
            .expect(0)
            .create();

        let err = service.create("   ").await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        create.assert();
    }

    #[tokio::test]
    async fn test_verify_unknown_signature_renders_failure_state() {
        let store = session("decl-verify@example.com", "tok-decl-verify").await;
        let service = DeclarationService::new(store);

        let _m = mock("GET", "/declarations/0xunknown-sig/verify")
            .match_header("authorization", "Bearer tok-decl-verify")
            .with_status(200)
            .with_body(r#"{"isValid": false, "message": "Unknown signature"}"#)
            .create();

        let result = service.verify("0xunknown-sig").await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.message, "Unknown signature");
        assert!(result.details.is_none());
    }
}
