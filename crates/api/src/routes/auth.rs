//! Route definitions for `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login            -> login (public)
/// POST /change-password  -> change_password
/// GET  /me               -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
}
