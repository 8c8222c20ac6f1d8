// src/config.rs
//! Environment configuration.
//!
//! Everything is read from process environment variables (populated from a
//! `.env` file by `dotenv` in `main`):
//! - `DID_API_URL`: Base URL of the backend API
//! - `WALLET_PRIVATE_KEY`: (Optional) hex private key backing the local wallet provider
//! - `DID_EMAIL` / `DID_PASSWORD`: (Optional) login credentials for the CLI

use std::env;

/// Default backend base URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:5002/api/v1/auth";

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the backend API
    pub api_base_url: String,
    /// Private key backing the wallet provider; absent models a host
    /// without a wallet
    pub wallet_private_key: Option<String>,
    /// CLI login email
    pub email: Option<String>,
    /// CLI login password
    pub password: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to the local
    /// development API URL.
    pub fn from_env() -> Self {
        AppConfig {
            api_base_url: env::var("DID_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok(),
            email: env::var("DID_EMAIL").ok(),
            password: env::var("DID_PASSWORD").ok(),
        }
    }
}
