// src/api/mod.rs
//! Authenticated HTTP client for the DID backend.

pub mod client;
pub mod types;

pub use client::ApiClient;
