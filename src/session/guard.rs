// src/session/guard.rs
//! Route guard: a pure state-to-render decision.
//!
//! Callers decide how to present each outcome (inline prompt, modal,
//! navigation); the guard itself has no side effects and never partially
//! admits protected content.

use crate::session::store::SessionSnapshot;

/// Outcome of evaluating the session against a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The initial session check is still in flight; show a loading state.
    Loading,
    /// No authenticated user; block the content and offer login/register.
    RequireAuth,
    /// Authenticated; render the protected content.
    Allow,
}

/// Decides whether protected content may render for the given session.
pub fn evaluate(snapshot: &SessionSnapshot) -> GuardDecision {
    if snapshot.loading {
        GuardDecision::Loading
    } else if snapshot.user.is_none() {
        GuardDecision::RequireAuth
    } else {
        GuardDecision::Allow
    }
}
