pub mod admin;
pub mod auth;
pub mod backup;
pub mod contagens;
pub mod empresas;
pub mod health;
pub mod prefs;
pub mod separacoes;

use axum::routing::patch;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                login (public)
/// /auth/change-password                      change own password
/// /auth/me                                   current user snapshot
///
/// /empresas                                  list, create (create: admin)
/// /empresas/{empresa_id}/produtos            list, register
/// /empresas/{empresa_id}/produtos/lookup     resolve code/QR payload
/// /empresas/{empresa_id}/produtos/locations  distinct locations
/// /empresas/{empresa_id}/produtos/validate-batch  classify pasted rows
/// /empresas/{empresa_id}/produtos/batch      create validated rows
/// /empresas/{empresa_id}/movimentacoes       history, register movement
/// /empresas/{empresa_id}/separacoes          list, create
/// /empresas/{empresa_id}/separacoes/validate-items  resolve pick lines
/// /empresas/{empresa_id}/contagens           list, create
///
/// /produtos/{id}                             edit (PATCH)
///
/// /separacoes/{id}                           detail with items
/// /separacoes/{id}/items                     replace (PUT), scan (POST)
/// /separacoes/{id}/items/{item_id}           set picked quantity (PATCH)
/// /separacoes/{id}/finalize                  deduct stock, await delivery
/// /separacoes/{id}/deliver                   confirm delivery
///
/// /contagens/{id}                            detail with items
/// /contagens/{id}/items                      record counted quantity
/// /contagens/{id}/finalize                   close without adjusting
/// /contagens/{id}/adjust                     reconcile stock and close
///
/// /admin/users                               list, create (admin only)
/// /admin/users/{id}                          update role/company access
/// /admin/users/{id}/reset-password           reset password
///
/// /backup/export                             full snapshot (admin only)
/// /backup/import                             destructive restore (admin)
///
/// /prefs                                     get, put
/// /prefs/reset                               restore defaults
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/empresas", empresas::router())
        .route("/produtos/{id}", patch(handlers::produtos::update))
        .nest("/separacoes", separacoes::router())
        .nest("/contagens", contagens::router())
        .nest("/admin", admin::router())
        .nest("/backup", backup::router())
        .nest("/prefs", prefs::router())
}
