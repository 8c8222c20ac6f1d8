// src/services/mod.rs
//! Feature operations built on the session store, the wallet adapter, and
//! the API client. Each service performs the local precondition checks,
//! issues the remote call, and keeps caller-facing state consistent by
//! explicit re-fetch after every mutation.

pub mod audit;
pub mod authorizations;
pub mod data_vault;
pub mod declarations;

pub use audit::AuditService;
pub use authorizations::{AuthorizationChange, AuthorizationService};
pub use data_vault::{DataVaultService, DecryptedFile};
pub use declarations::DeclarationService;
