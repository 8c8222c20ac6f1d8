// src/services/authorizations.rs
//! Data-authorization management.
//!
//! All operations here are wallet-gated: the session store's gate verifies
//! the connected account against the bound wallet before any request goes
//! out. Lifecycle state lives server-side, so mutating operations finish by
//! re-fetching the authorization list instead of patching local copies.

use crate::api::types::CreateAuthorizationRequest;
use crate::error::{Error, Result};
use crate::models::authorization::{Authorization, DataType, TimelineLog};
use crate::session::SessionStore;
use crate::utils::address::is_wallet_address;
use std::sync::Arc;

/// Result of a mutating authorization operation: the backend's confirmation
/// message plus the re-fetched list reflecting the new server state.
#[derive(Debug)]
pub struct AuthorizationChange {
    pub message: String,
    pub authorizations: Vec<Authorization>,
}

/// Authorization CRUD operations.
pub struct AuthorizationService {
    session: Arc<SessionStore>,
}

impl AuthorizationService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        AuthorizationService { session }
    }

    /// Lists the user's authorizations.
    pub async fn list(&self) -> Result<Vec<Authorization>> {
        let (token, _) = self.session.wallet_gate()?;
        self.session
            .api()
            .list_authorizations(&token)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }

    /// Grants a wallet address access to one data category for a bounded
    /// duration. The expiry is computed server-side from `duration_minutes`.
    ///
    /// # Errors
    /// `ValidationError` if the target address is malformed (checked locally)
    pub async fn create(
        &self,
        data_type: DataType,
        authorized_address: &str,
        duration_minutes: u32,
    ) -> Result<AuthorizationChange> {
        if !is_wallet_address(authorized_address) {
            return Err(Error::ValidationError(format!(
                "invalid authorized address: {}",
                authorized_address
            )));
        }

        let (token, _) = self.session.wallet_gate()?;
        let created = self
            .session
            .api()
            .create_authorization(
                &token,
                &CreateAuthorizationRequest {
                    data_type,
                    authorized_address: authorized_address.to_string(),
                    duration_minutes,
                },
            )
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))?;
        log::info!(
            "authorization {} created for {}",
            created.authorization.id,
            created.authorization.authorized_address
        );

        let authorizations = self.session.api().list_authorizations(&token).await?;
        Ok(AuthorizationChange {
            message: created.message,
            authorizations,
        })
    }

    /// Revokes an authorization.
    ///
    /// # Errors
    /// `Conflict` if the authorization was already revoked
    pub async fn revoke(&self, id: u64) -> Result<AuthorizationChange> {
        let (token, _) = self.session.wallet_gate()?;
        let message = self
            .session
            .api()
            .revoke_authorization(&token, id)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))?;
        log::info!("authorization {} revoked", id);

        let authorizations = self.session.api().list_authorizations(&token).await?;
        Ok(AuthorizationChange {
            message,
            authorizations,
        })
    }

    /// Fetches the append-only audit timeline of one authorization.
    pub async fn timeline(&self, id: u64) -> Result<Vec<TimelineLog>> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .authorization_timeline(&token, id)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }
}
