//! HTTP server for Folio.
//!
//! This crate exposes the page and user services as a JSON API using axum:
//! - `GET/POST /pages`, `GET/PUT/PATCH/DELETE /pages/{*route}`
//! - `GET /users`, `GET /users/{username}`
//!
//! All routes live under a configurable prefix (`/api` by default).
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         pages_dir: PathBuf::from("user/pages"),
//!         users_dir: PathBuf::from("user/accounts"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (folio-server)
//!                      │
//!                      ├─► /pages handlers ──► PageService ──► FsPageStore
//!                      │
//!                      └─► /users handlers ──► UserService ──► FsAccountStore
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use folio_site::{PageService, ResourceFilter, UserService};
use folio_storage_fs::{FsAccountStore, FsPageStore};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path prefix for every route (`""` mounts at the root).
    pub prefix: String,
    /// Page tree root directory.
    pub pages_dir: PathBuf,
    /// Field whitelist for page records.
    pub page_fields: Vec<String>,
    /// User account directory.
    pub users_dir: PathBuf,
    /// Field whitelist for user records.
    pub user_fields: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7070,
            prefix: "/api".to_owned(),
            pages_dir: PathBuf::from("user/pages"),
            page_fields: Vec::new(),
            users_dir: PathBuf::from("user/accounts"),
            user_fields: Vec::new(),
        }
    }
}

/// Build the router for `config` without binding a socket.
#[must_use]
pub fn build_app(config: &ServerConfig) -> axum::Router {
    let pages = PageService::new(
        Arc::new(FsPageStore::new(config.pages_dir.clone())),
        ResourceFilter::new(config.page_fields.clone()),
    );
    let users = UserService::new(
        Arc::new(FsAccountStore::new(config.users_dir.clone())),
        ResourceFilter::new(config.user_fields.clone()),
    );

    app::create_router(Arc::new(AppState { pages, users }), &config.prefix)
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(&config);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        prefix = %config.prefix,
        pages_dir = %config.pages_dir.display(),
        users_dir = %config.users_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded Folio config.
#[must_use]
pub fn server_config_from_config(config: &folio_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        prefix: config.server.prefix.clone(),
        pages_dir: config.pages_resolved.dir.clone(),
        page_fields: config.pages_resolved.fields.clone(),
        users_dir: config.users_resolved.dir.clone(),
        user_fields: config.users_resolved.fields.clone(),
    }
}
