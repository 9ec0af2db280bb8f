//! Handlers for stock counts. Collection routes are nested under
//! `/empresas/{empresa_id}/contagens`; count-scoped operations live at
//! `/contagens/{id}/...`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use estoque_core::scan::normalize_scan;
use estoque_db::models::contagem::{Contagem, ContagemItem};
use estoque_db::repositories::ContagemRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateContagemRequest {
    pub nome: String,
}

/// POST /api/v1/empresas/{empresa_id}/contagens
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<CreateContagemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Contagem>>)> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let contagem = state.contagens.create(&empresa_id, &input.nome).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(contagem))))
}

/// GET /api/v1/empresas/{empresa_id}/contagens
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Contagem>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let contagens = state.contagens.list(&empresa_id).await?;
    Ok(Json(DataResponse::new(contagens)))
}

#[derive(Debug, Serialize)]
pub struct ContagemDetail {
    #[serde(flatten)]
    pub contagem: Contagem,
    pub items: Vec<ContagemItem>,
}

/// GET /api/v1/contagens/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ContagemDetail>>> {
    let (contagem, items) = state.contagens.get_with_items(&id).await?;
    user.require_empresa_access(&state, &contagem.empresa).await?;
    Ok(Json(DataResponse::new(ContagemDetail { contagem, items })))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Raw code or scanned QR payload.
    pub codigo: String,
    pub quantidade_contada: i64,
}

/// POST /api/v1/contagens/{id}/items -- record or overwrite a counted
/// quantity.
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<AddItemRequest>,
) -> AppResult<Json<DataResponse<ContagemItem>>> {
    let contagem = ContagemRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &contagem.empresa).await?;
    let codigo = normalize_scan(&input.codigo);
    let item = state
        .contagens
        .add_item(&id, &codigo, input.quantidade_contada)
        .await?;
    Ok(Json(DataResponse::new(item)))
}

/// POST /api/v1/contagens/{id}/finalize -- close without touching stock.
pub async fn finalize(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Contagem>>> {
    let contagem = ContagemRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &contagem.empresa).await?;
    let finalized = state.contagens.finalizar(&id).await?;
    Ok(Json(DataResponse::new(finalized)))
}

#[derive(Debug, Serialize)]
pub struct AjusteBody {
    pub ajustados: usize,
}

/// POST /api/v1/contagens/{id}/adjust -- reconcile stock and close.
pub async fn adjust(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<AjusteBody>>> {
    let contagem = ContagemRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &contagem.empresa).await?;
    let outcome = state.contagens.ajustar_estoque(&id, &user.user_id).await?;
    Ok(Json(DataResponse::new(AjusteBody {
        ajustados: outcome.ajustados,
    })))
}
