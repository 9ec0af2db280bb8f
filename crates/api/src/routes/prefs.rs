//! Route definitions for `/prefs`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prefs;
use crate::state::AppState;

/// Routes mounted at `/prefs`.
///
/// ```text
/// GET  /       -> get
/// PUT  /       -> put
/// POST /reset  -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prefs::get).put(prefs::put))
        .route("/reset", post(prefs::reset))
}
