// src/services/data_vault.rs
//! Personal data storage and authorized-data access.
//!
//! Covers the user's own data categories (read/write), the encrypted file
//! vault (multipart upload, decrypt-and-download), and reading data another
//! user shared with the connected wallet. The authorized-data fetch signs a
//! fresh access message per request; the exact signed string travels in the
//! `X-Message` header so the backend can re-verify it byte for byte.

use crate::api::types::{SignedRequest, UploadResponse};
use crate::error::{Error, Result};
use crate::models::authorization::DataType;
use crate::session::SessionStore;
use std::sync::Arc;

/// A decrypted file returned by the vault.
#[derive(Debug)]
pub struct DecryptedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Data storage and retrieval operations.
pub struct DataVaultService {
    session: Arc<SessionStore>,
}

impl DataVaultService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        DataVaultService { session }
    }

    fn access_message(data_type: DataType) -> String {
        format!("Request access to {} data", data_type)
    }

    /// Reads the user's own stored data for one category.
    pub async fn user_data(&self, data_type: DataType) -> Result<serde_json::Value> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .get_user_data(&token, data_type)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }

    /// Stores the user's own data for one category.
    pub async fn store_user_data(
        &self,
        data_type: DataType,
        data_content: serde_json::Value,
    ) -> Result<String> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .put_user_data(&token, data_type, data_content)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }

    /// Reads data another user authorized for the connected wallet.
    ///
    /// Wallet-gated: the connected account must match the bound wallet, and
    /// the request carries a fresh personal signature over the access
    /// message for this data type.
    pub async fn fetch_authorized_data(&self, data_type: DataType) -> Result<serde_json::Value> {
        let (token, address) = self.session.wallet_gate()?;
        let message = Self::access_message(data_type);
        let signature = self.session.wallet().sign_message(&address, &message).await?;

        self.session
            .api()
            .fetch_authorized_data(
                &token,
                data_type,
                &SignedRequest {
                    address,
                    message,
                    signature,
                },
            )
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }

    /// Uploads a file for server-side encryption; returns the upload result
    /// carrying the content hash (or ciphertext, depending on backend
    /// version).
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let token = self.session.bearer()?;
        let response = self
            .session
            .api()
            .upload_user_file(&token, filename, bytes)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))?;
        log::info!(
            "file {} uploaded (hash: {})",
            filename,
            response.hash.as_deref().unwrap_or("-")
        );
        Ok(response)
    }

    /// Decrypts a stored file by its content hash and decodes the payload.
    pub async fn decrypt(&self, hash: &str) -> Result<DecryptedFile> {
        let token = self.session.bearer()?;
        let response = self
            .session
            .api()
            .decrypt_user_file(&token, hash)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))?;

        let bytes = base64::decode(&response.file_content).map_err(|e| {
            Error::ValidationError(format!("backend returned invalid base64 file content: {}", e))
        })?;
        Ok(DecryptedFile {
            filename: response
                .filename
                .unwrap_or_else(|| "decrypted_file".to_string()),
            bytes,
        })
    }
}
