// src/services/audit.rs
//! Audit views: per-authorization timelines and the per-user activity log.
//! Both are append-only, backend-owned, and read-only from here.

use crate::api::types::UserLog;
use crate::error::Result;
use crate::models::authorization::TimelineLog;
use crate::session::SessionStore;
use std::sync::Arc;

/// Read-only audit queries.
pub struct AuditService {
    session: Arc<SessionStore>,
}

impl AuditService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        AuditService { session }
    }

    /// Fetches the audit timeline of one authorization.
    pub async fn authorization_timeline(&self, id: u64) -> Result<Vec<TimelineLog>> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .authorization_timeline(&token, id)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }

    /// Fetches the user's own activity log.
    pub async fn user_logs(&self) -> Result<Vec<UserLog>> {
        let token = self.session.bearer()?;
        self.session
            .api()
            .user_logs(&token)
            .await
            .map_err(|e| self.session.absorb_unauthorized(e))
    }
}
