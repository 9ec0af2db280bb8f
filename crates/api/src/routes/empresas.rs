//! Route definitions for the `/empresas` resource.
//!
//! Also nests the company-scoped catalog, movement, separation, and count
//! collection routes under `/empresas/{empresa_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{contagens, empresas, movimentacoes, produtos, separacoes};
use crate::state::AppState;

/// Routes mounted at `/empresas`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create (admin)
///
/// GET    /{empresa_id}/produtos               -> list
/// POST   /{empresa_id}/produtos               -> create
/// GET    /{empresa_id}/produtos/lookup        -> lookup
/// GET    /{empresa_id}/produtos/locations     -> locations
/// POST   /{empresa_id}/produtos/validate-batch -> validate_batch
/// POST   /{empresa_id}/produtos/batch         -> create_batch
///
/// GET    /{empresa_id}/movimentacoes          -> list
/// POST   /{empresa_id}/movimentacoes          -> register
///
/// GET    /{empresa_id}/separacoes             -> list
/// POST   /{empresa_id}/separacoes             -> create
/// POST   /{empresa_id}/separacoes/validate-items -> validate_items
///
/// GET    /{empresa_id}/contagens              -> list
/// POST   /{empresa_id}/contagens              -> create
/// ```
pub fn router() -> Router<AppState> {
    let produto_routes = Router::new()
        .route("/", get(produtos::list).post(produtos::create))
        .route("/lookup", get(produtos::lookup))
        .route("/locations", get(produtos::locations))
        .route("/validate-batch", post(produtos::validate_batch))
        .route("/batch", post(produtos::create_batch));

    let movimentacao_routes = Router::new()
        .route("/", get(movimentacoes::list).post(movimentacoes::register));

    let separacao_routes = Router::new()
        .route("/", get(separacoes::list).post(separacoes::create))
        .route("/validate-items", post(separacoes::validate_items));

    let contagem_routes = Router::new()
        .route("/", get(contagens::list).post(contagens::create));

    Router::new()
        .route("/", get(empresas::list).post(empresas::create))
        .nest("/{empresa_id}/produtos", produto_routes)
        .nest("/{empresa_id}/movimentacoes", movimentacao_routes)
        .nest("/{empresa_id}/separacoes", separacao_routes)
        .nest("/{empresa_id}/contagens", contagem_routes)
}
