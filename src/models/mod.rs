// src/models/mod.rs
//! Wire data model shared between the API client and the services.
//!
//! Every entity here is owned by the backend; the client holds transient,
//! re-fetchable copies and never mutates entity state locally.

pub mod authorization;
pub mod declaration;
pub mod user;
