//! Route definitions for count-scoped operations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contagens;
use crate::state::AppState;

/// Routes mounted at `/contagens`.
///
/// ```text
/// GET  /{id}           -> get_by_id (with items)
/// POST /{id}/items     -> add_item
/// POST /{id}/finalize  -> finalize (no stock changes)
/// POST /{id}/adjust    -> adjust (reconcile stock, then close)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(contagens::get_by_id))
        .route("/{id}/items", post(contagens::add_item))
        .route("/{id}/finalize", post(contagens::finalize))
        .route("/{id}/adjust", post(contagens::adjust))
}
