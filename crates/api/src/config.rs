use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Which record-store backend to run against.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// In-process store, empty at startup. For development and tests.
    Memory,
    /// Remote PocketBase-compatible store.
    Remote {
        /// Base URL, e.g. `http://127.0.0.1:8090`.
        base_url: String,
        /// Service account for the store, when it requires authentication.
        auth: Option<StoreCredentials>,
    },
}

#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub username: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Record-store backend selection.
    pub store: StoreBackend,
    /// Where the preferences file lives (default: `estoque-prefs.json`).
    pub prefs_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORE_BACKEND`        | `memory`                   |
    /// | `STORE_URL`            | -- (required when remote)  |
    /// | `STORE_USERNAME`       | -- (optional)              |
    /// | `STORE_PASSWORD`       | -- (optional)              |
    /// | `PREFS_PATH`           | `estoque-prefs.json`       |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a missing `STORE_URL` when
    /// `STORE_BACKEND=remote` -- misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "remote" => {
                let base_url = std::env::var("STORE_URL")
                    .expect("STORE_URL must be set when STORE_BACKEND=remote");
                let auth = match (std::env::var("STORE_USERNAME"), std::env::var("STORE_PASSWORD"))
                {
                    (Ok(username), Ok(password)) => Some(StoreCredentials { username, password }),
                    _ => None,
                };
                StoreBackend::Remote { base_url, auth }
            }
            other => panic!("STORE_BACKEND must be 'memory' or 'remote', got '{other}'"),
        };

        let prefs_path = std::env::var("PREFS_PATH")
            .unwrap_or_else(|_| "estoque-prefs.json".into())
            .into();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            store,
            prefs_path,
        }
    }
}
