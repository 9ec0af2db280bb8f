//! Route definitions for `/backup`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::backup;
use crate::state::AppState;

/// Routes mounted at `/backup`. Admin only.
///
/// ```text
/// GET  /export -> export
/// POST /import -> import (destructive)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", get(backup::export))
        .route("/import", post(backup::import))
}
