//! Shared helpers for the HTTP-level integration tests.
//!
//! Every test runs the full application router (all middleware layers
//! included) over an in-memory record store, so requests exercise the same
//! stack production uses.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use estoque_api::auth::jwt::JwtConfig;
use estoque_api::auth::password::hash_password;
use estoque_api::config::{ServerConfig, StoreBackend};
use estoque_api::prefs::FilePrefsStore;
use estoque_api::router::build_app_router;
use estoque_api::state::AppState;
use estoque_core::roles::Role;
use estoque_db::models::empresa::{CreateEmpresa, Empresa};
use estoque_db::models::produto::{CreateProduto, Produto, ProdutoStatus};
use estoque_db::models::user::{CreateUser, User};
use estoque_db::repositories::{EmpresaRepo, ProdutoRepo, UserRepo};
use estoque_db::{MemoryStore, RecordStore};

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with a fixed JWT secret and a throwaway
/// preferences path.
pub fn test_config(prefs_path: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        store: StoreBackend::Memory,
        prefs_path,
    }
}

/// Appears in every test: the full router plus a handle on the store it
/// runs over, so tests can seed records directly.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn RecordStore>,
    // Keeps the prefs directory alive for the lifetime of the app.
    _prefs_dir: tempfile::TempDir,
}

pub fn build_test_app() -> TestApp {
    let prefs_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(prefs_dir.path().join("prefs.json"));

    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let prefs = Arc::new(FilePrefsStore::new(config.prefs_path.clone()));
    let state = AppState::new(store.clone(), prefs, Arc::new(config.clone()));
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        _prefs_dir: prefs_dir,
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Create a user directly in the store with [`TEST_PASSWORD`].
pub async fn seed_user(
    store: &dyn RecordStore,
    username: &str,
    role: Role,
    empresas: Vec<String>,
) -> User {
    let input = CreateUser {
        username: username.to_string(),
        role,
        empresas,
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(store, &input)
        .await
        .expect("user creation should succeed")
}

pub async fn seed_empresa(store: &dyn RecordStore, nome: &str) -> Empresa {
    EmpresaRepo::create(
        store,
        &CreateEmpresa {
            nome: nome.to_string(),
        },
    )
    .await
    .expect("empresa creation should succeed")
}

/// Create a product directly in the store, bypassing the movement trail.
pub async fn seed_produto(
    store: &dyn RecordStore,
    empresa_id: &str,
    codigo: &str,
    quantidade: i64,
) -> Produto {
    let input = CreateProduto {
        empresa: empresa_id.to_string(),
        codigo: codigo.to_string(),
        descricao: format!("Peça {codigo}"),
        valor: 10.0,
        quantidade,
        localizacao: "A1".to_string(),
        status: ProdutoStatus::Ativo,
        codigos_alternativos: Vec::new(),
    };
    ProdutoRepo::create(store, &input)
        .await
        .expect("produto creation should succeed")
}

/// Log in via the API and return the access token.
pub async fn login(app: &TestApp, username: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app.router.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("login response must carry a token")
        .to_string()
}

/// Seed an admin user and log in, returning the token.
pub async fn admin_token(app: &TestApp) -> String {
    seed_user(app.store.as_ref(), "admin", Role::Admin, Vec::new()).await;
    login(app, "admin").await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PATCH, uri, Some(token), body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
