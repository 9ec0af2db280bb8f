//! Route definitions for order-scoped separation operations.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::separacoes;
use crate::state::AppState;

/// Routes mounted at `/separacoes`.
///
/// ```text
/// GET    /{id}                  -> get_by_id (with items)
/// PUT    /{id}/items            -> set_items (replace)
/// POST   /{id}/items            -> add_item (scan)
/// PATCH  /{id}/items/{item_id}  -> update_item
/// POST   /{id}/finalize         -> finalize
/// POST   /{id}/deliver          -> deliver
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(separacoes::get_by_id))
        .route(
            "/{id}/items",
            put(separacoes::set_items).post(separacoes::add_item),
        )
        .route("/{id}/items/{item_id}", patch(separacoes::update_item))
        .route("/{id}/finalize", post(separacoes::finalize))
        .route("/{id}/deliver", post(separacoes::deliver))
}
