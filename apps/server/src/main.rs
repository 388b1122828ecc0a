//! Resto POS server binary.
//!
//! Loads configuration from the environment, opens (and migrates) the
//! SQLite database, seeds a default admin on first run, and serves the
//! HTTP API until SIGINT/SIGTERM.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use resto_core::Role;
use resto_db::{Database, DbConfig, NewUser};
use resto_server::auth::{hash_password, JwtManager};
use resto_server::{app, AppState, ServerConfig};

/// First-run credentials. Printed loudly so nobody ships them.
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Resto POS server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(config.database_path.as_str())).await?;
    info!("Database ready");

    bootstrap_admin(&db).await?;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
    let state = AppState::new(db, jwt);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Seeds the default admin account when the user table is empty, so a
/// fresh install can log in at all.
async fn bootstrap_admin(db: &Database) -> anyhow::Result<()> {
    if db.users().count().await? > 0 {
        return Ok(());
    }

    let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| anyhow::anyhow!("failed to hash bootstrap password: {e}"))?;

    db.users()
        .insert(NewUser {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password_hash,
            role: Role::Admin,
            display_name: Some("Administrator".to_string()),
        })
        .await?;

    warn!(
        username = DEFAULT_ADMIN_USERNAME,
        "Created default admin account with the default password - change it immediately"
    );
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
