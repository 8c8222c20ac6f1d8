// src/main.rs

//! # DID Data-Authorization Client - Main Entry Point
//!
//! Command-line client for the decentralized-identity data-authorization
//! platform. Wires the core components together and dispatches one
//! subcommand per run:
//! 1. **Wallet Layer**: key-backed wallet provider behind the adapter
//! 2. **Session Layer**: process-wide session store and route guard
//! 3. **API Layer**: authenticated HTTP client for the backend REST API
//! 4. **Feature Layer**: authorizations, declarations, data vault, audit
//!
//! ## Environment Variables
//! - `DID_API_URL`: Backend API base URL (default: http://localhost:5002/api/v1/auth)
//! - `WALLET_PRIVATE_KEY`: (Optional) hex private key for the wallet provider
//! - `DID_EMAIL` / `DID_PASSWORD`: (Optional) credentials used to log in

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::models::authorization::DataType;
use crate::services::{AuditService, AuthorizationService, DataVaultService, DeclarationService};
use crate::session::{evaluate, GuardDecision, SessionStore};
use crate::wallet::{KeyWalletProvider, WalletAdapter};
use anyhow::{bail, Context};
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod api; // Backend REST client
mod config; // Environment configuration
mod error; // Error taxonomy
mod models; // Wire data structures
mod services; // Feature operations
mod session; // Session store and route guard
mod utils; // Helper functions
mod wallet; // Wallet capability layer

fn print_usage() {
    println!("Usage: did-client <command> [args]");
    println!("Commands:");
    println!("  status                                 Show session and wallet state");
    println!("  register <name> <email> <password>     Create an account");
    println!("  bind-wallet                            Bind the connected wallet to the account");
    println!("  authorizations                         List data authorizations");
    println!("  authorize <data_type> <address> <min>  Grant data access for <min> minutes");
    println!("  revoke <id>                            Revoke an authorization");
    println!("  timeline <id>                          Show an authorization's audit timeline");
    println!("  declare <content>                      Create a signed declaration");
    println!("  verify <signature>                     Verify a declaration signature");
    println!("  data-get <data_type>                   Read own stored data");
    println!("  data-put <data_type> <json>            Store own data");
    println!("  authorized-data <data_type>            Read data shared with this wallet");
    println!("  upload <path>                          Encrypt and store a file");
    println!("  decrypt <hash>                         Decrypt a stored file");
    println!("  logs                                   Show the account activity log");
    println!("Data types: identity, profile, credentials");
}

/// Logs in with the configured credentials, then enforces the route guard
/// the way protected views do.
async fn ensure_authenticated(session: &SessionStore, config: &AppConfig) -> anyhow::Result<()> {
    if let (Some(email), Some(password)) = (&config.email, &config.password) {
        session.login(email, password).await?;
    }
    match evaluate(&session.snapshot()) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::RequireAuth => {
            bail!("login required: set DID_EMAIL and DID_PASSWORD (or run `register`)")
        }
        GuardDecision::Loading => bail!("session not initialized"),
    }
}

fn parse_data_type(arg: &str) -> anyhow::Result<DataType> {
    arg.parse::<DataType>().map_err(|e| anyhow::anyhow!(e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    // Initialize the core components
    let api = ApiClient::new(&config.api_base_url)?;
    let wallet_adapter = match &config.wallet_private_key {
        Some(key) => WalletAdapter::new(Arc::new(KeyWalletProvider::from_private_key(key)?)),
        None => WalletAdapter::unavailable(),
    };
    let session = Arc::new(SessionStore::new(api, wallet_adapter));
    session.init().await;

    let authorizations = AuthorizationService::new(session.clone());
    let declarations = DeclarationService::new(session.clone());
    let vault = DataVaultService::new(session.clone());
    let audit = AuditService::new(session.clone());

    match args[0].as_str() {
        "status" => {
            if let (Some(email), Some(password)) = (&config.email, &config.password) {
                session.login(email, password).await?;
            }
            let snapshot = session.snapshot();
            println!("guard:     {:?}", evaluate(&snapshot));
            match &snapshot.user {
                Some(user) => {
                    println!(
                        "user:      {} <{}>",
                        user.name.as_deref().unwrap_or("-"),
                        user.email
                    );
                    println!(
                        "bound:     {}",
                        user.wallet_address
                            .as_deref()
                            .unwrap_or("(no wallet bound)")
                    );
                }
                None => println!("user:      (anonymous)"),
            }
            println!(
                "connected: {}",
                snapshot.connected_wallet.as_deref().unwrap_or("(no wallet)")
            );
        }
        "register" => {
            let [name, email, password] = match args.get(1..4) {
                Some([a, b, c]) => [a, b, c],
                _ => bail!("usage: register <name> <email> <password>"),
            };
            let user = session.register(name, email, password).await?;
            println!("registered {} (id {})", user.email, user.id);
        }
        "bind-wallet" => {
            ensure_authenticated(&session, &config).await?;
            let address = session.connect_wallet().await?;
            println!("connected wallet {}", address);
            let user = session.bind_wallet().await?;
            println!(
                "wallet bound: {}",
                user.wallet_address.as_deref().unwrap_or("?")
            );
        }
        "authorizations" => {
            ensure_authenticated(&session, &config).await?;
            for auth in authorizations.list().await? {
                println!(
                    "#{} {} -> {} [{:?}] expires {}",
                    auth.id,
                    auth.data_type,
                    auth.authorized_address,
                    auth.status,
                    auth.expires_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string())
                );
            }
        }
        "authorize" => {
            ensure_authenticated(&session, &config).await?;
            let [data_type, address, minutes] = match args.get(1..4) {
                Some([a, b, c]) => [a, b, c],
                _ => bail!("usage: authorize <data_type> <address> <duration_minutes>"),
            };
            let change = authorizations
                .create(
                    parse_data_type(data_type)?,
                    address,
                    minutes.parse::<u32>().context("invalid duration")?,
                )
                .await?;
            println!(
                "{} ({} authorizations)",
                change.message,
                change.authorizations.len()
            );
        }
        "revoke" => {
            ensure_authenticated(&session, &config).await?;
            let id = args
                .get(1)
                .context("usage: revoke <id>")?
                .parse::<u64>()
                .context("invalid authorization id")?;
            let change = authorizations.revoke(id).await?;
            println!("{}", change.message);
        }
        "timeline" => {
            ensure_authenticated(&session, &config).await?;
            let id = args
                .get(1)
                .context("usage: timeline <id>")?
                .parse::<u64>()
                .context("invalid authorization id")?;
            for log in authorizations.timeline(id).await? {
                println!("{} {:?}", log.timestamp.to_rfc3339(), log.action);
            }
        }
        "declare" => {
            ensure_authenticated(&session, &config).await?;
            let content = args.get(1).context("usage: declare <content>")?;
            let declaration = declarations.create(content).await?;
            println!("declaration #{}", declaration.id);
            println!("signature: {}", declaration.signature);
            if let Some(qr) = &declaration.qr_code_path {
                println!("qr code:   {}", qr);
            }
        }
        "verify" => {
            ensure_authenticated(&session, &config).await?;
            let signature = args.get(1).context("usage: verify <signature>")?;
            let result = declarations.verify(signature).await?;
            if result.is_valid {
                println!("valid: {}", result.message);
                if let Some(details) = result.details {
                    println!("content: {}", details.content);
                }
            } else {
                println!("invalid: {}", result.message);
            }
        }
        "data-get" => {
            ensure_authenticated(&session, &config).await?;
            let data_type = parse_data_type(args.get(1).context("usage: data-get <data_type>")?)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&vault.user_data(data_type).await?)?
            );
        }
        "data-put" => {
            ensure_authenticated(&session, &config).await?;
            let [data_type, json] = match args.get(1..3) {
                Some([a, b]) => [a, b],
                _ => bail!("usage: data-put <data_type> <json>"),
            };
            let content: serde_json::Value =
                serde_json::from_str(json).context("invalid JSON content")?;
            let message = vault
                .store_user_data(parse_data_type(data_type)?, content)
                .await?;
            println!("{}", message);
        }
        "authorized-data" => {
            ensure_authenticated(&session, &config).await?;
            let data_type =
                parse_data_type(args.get(1).context("usage: authorized-data <data_type>")?)?;
            let data = vault.fetch_authorized_data(data_type).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        "upload" => {
            ensure_authenticated(&session, &config).await?;
            let path = args.get(1).context("usage: upload <path>")?;
            let bytes = tokio::fs::read(path).await.context("cannot read file")?;
            let filename = Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .context("invalid file name")?;
            let response = vault.upload(filename, bytes).await?;
            match response.hash {
                Some(hash) => println!("stored, hash: {}", hash),
                None => println!(
                    "stored: {}",
                    response.encrypted_data.as_deref().unwrap_or("(no handle)")
                ),
            }
        }
        "decrypt" => {
            ensure_authenticated(&session, &config).await?;
            let hash = args.get(1).context("usage: decrypt <hash>")?;
            let file = vault.decrypt(hash).await?;
            tokio::fs::write(&file.filename, &file.bytes)
                .await
                .context("cannot write decrypted file")?;
            println!("decrypted to {}", file.filename);
        }
        "logs" => {
            ensure_authenticated(&session, &config).await?;
            for log in audit.user_logs().await? {
                println!("{} {}", log.timestamp.to_rfc3339(), log.action);
            }
        }
        other => {
            println!("unknown command: {}", other);
            print_usage();
        }
    }

    Ok(())
}
