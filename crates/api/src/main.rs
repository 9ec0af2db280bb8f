use std::net::SocketAddr;
use std::sync::Arc;

use estoque_core::roles::Role;
use estoque_db::models::user::CreateUser;
use estoque_db::repositories::UserRepo;
use estoque_db::{MemoryStore, RecordStore, RemoteStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estoque_api::auth::password::hash_password;
use estoque_api::config::{ServerConfig, StoreBackend};
use estoque_api::prefs::FilePrefsStore;
use estoque_api::router::build_app_router;
use estoque_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estoque_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Record store ---
    let store: Arc<dyn RecordStore> = match &config.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory record store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Remote { base_url, auth } => {
            let remote = RemoteStore::new(base_url.clone());
            if let Some(credentials) = auth {
                remote
                    .auth_with_password(&credentials.username, &credentials.password)
                    .await
                    .expect("Failed to authenticate with the record store");
                tracing::info!(%base_url, "Authenticated with remote record store");
            } else {
                tracing::info!(%base_url, "Using remote record store");
            }
            Arc::new(remote)
        }
    };

    bootstrap_admin(store.as_ref()).await;

    // --- Preferences ---
    let prefs = Arc::new(FilePrefsStore::new(config.prefs_path.clone()));
    tracing::info!(path = %config.prefs_path.display(), "Preferences file configured");

    // --- App state and router ---
    let state = AppState::new(store, prefs, Arc::new(config.clone()));
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Create the initial admin account when `ADMIN_USERNAME` and
/// `ADMIN_PASSWORD` are set and no such user exists yet. Without it a
/// fresh memory-backed deployment has no way to log in.
async fn bootstrap_admin(store: &dyn RecordStore) {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    let existing = UserRepo::find_by_username(store, &username)
        .await
        .expect("Failed to query users during admin bootstrap");
    if existing.is_some() {
        tracing::debug!(%username, "Admin account already present, skipping bootstrap");
        return;
    }

    let password_hash = hash_password(&password).expect("Failed to hash admin password");
    UserRepo::create(
        store,
        &CreateUser {
            username: username.clone(),
            role: Role::Admin,
            empresas: Vec::new(),
            password_hash,
        },
    )
    .await
    .expect("Failed to create admin account");
    tracing::info!(%username, "Bootstrapped admin account");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
