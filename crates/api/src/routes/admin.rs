//! Route definitions for `/admin` (user administration).

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/admin`. All handlers enforce the admin role.
///
/// ```text
/// GET   /users                      -> list
/// POST  /users                      -> create
/// PATCH /users/{id}                 -> update
/// POST  /users/{id}/reset-password  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", patch(users::update))
        .route("/users/{id}/reset-password", post(users::reset_password))
}
