//! Handlers for pick orders. Collection routes are nested under
//! `/empresas/{empresa_id}/separacoes`; order-scoped operations live at
//! `/separacoes/{id}/...`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use estoque_core::batch::{parse_pick_lines, PickRow};
use estoque_core::scan::normalize_scan;
use estoque_db::models::produto::Produto;
use estoque_db::models::separacao::{Separacao, SeparacaoItem};
use estoque_db::repositories::SeparacaoRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSeparacaoRequest {
    pub os_numero: String,
    pub cliente: String,
    #[serde(default)]
    pub placa_veiculo: Option<String>,
}

/// POST /api/v1/empresas/{empresa_id}/separacoes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<CreateSeparacaoRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Separacao>>)> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let separacao = state
        .separacoes
        .create(&empresa_id, &input.os_numero, &input.cliente, input.placa_veiculo)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(separacao))))
}

/// GET /api/v1/empresas/{empresa_id}/separacoes
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Separacao>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let separacoes = state.separacoes.list(&empresa_id).await?;
    Ok(Json(DataResponse::new(separacoes)))
}

#[derive(Debug, Serialize)]
pub struct SeparacaoDetail {
    #[serde(flatten)]
    pub separacao: Separacao,
    pub items: Vec<SeparacaoItem>,
}

/// GET /api/v1/separacoes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<SeparacaoDetail>>> {
    let (separacao, items) = state.separacoes.get_with_items(&id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    Ok(Json(DataResponse::new(SeparacaoDetail { separacao, items })))
}

#[derive(Debug, Deserialize)]
pub struct ValidateItemsRequest {
    /// Whitespace-delimited pick lines (`CODE [QTY]`, quantity defaults
    /// to 1).
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ValidatedPickBody {
    pub codigo: String,
    pub quantidade: i64,
    pub produto: Option<Produto>,
}

/// POST /api/v1/empresas/{empresa_id}/separacoes/validate-items
pub async fn validate_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<ValidateItemsRequest>,
) -> AppResult<Json<DataResponse<Vec<ValidatedPickBody>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let rows = parse_pick_lines(&input.text);
    let validated = state.separacoes.validate_pick_rows(&empresa_id, rows).await?;
    let body = validated
        .into_iter()
        .map(|v| ValidatedPickBody {
            codigo: v.row.codigo,
            quantidade: v.row.quantidade,
            produto: v.produto,
        })
        .collect();
    Ok(Json(DataResponse::new(body)))
}

/// PUT /api/v1/separacoes/{id}/items -- replace the item list.
pub async fn set_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(rows): Json<Vec<PickRow>>,
) -> AppResult<Json<DataResponse<Vec<SeparacaoItem>>>> {
    let separacao = SeparacaoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    let items = state.separacoes.set_items(&id, rows).await?;
    Ok(Json(DataResponse::new(items)))
}

#[derive(Debug, Deserialize)]
pub struct ScanItemRequest {
    /// Raw code or scanned QR payload.
    pub codigo: String,
}

/// POST /api/v1/separacoes/{id}/items -- scan one picked unit.
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ScanItemRequest>,
) -> AppResult<Json<DataResponse<SeparacaoItem>>> {
    let separacao = SeparacaoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    let codigo = normalize_scan(&input.codigo);
    let item = state.separacoes.add_item_by_code(&id, &codigo).await?;
    Ok(Json(DataResponse::new(item)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantidade_separada: i64,
}

/// PATCH /api/v1/separacoes/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(String, String)>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<Json<DataResponse<SeparacaoItem>>> {
    let separacao = SeparacaoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    let item = state
        .separacoes
        .update_item_quantidade(&id, &item_id, input.quantidade_separada)
        .await?;
    Ok(Json(DataResponse::new(item)))
}

/// POST /api/v1/separacoes/{id}/finalize
pub async fn finalize(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Separacao>>> {
    let separacao = SeparacaoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    let finalized = state.separacoes.finalizar(&id, &user.user_id).await?;
    Ok(Json(DataResponse::new(finalized)))
}

#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    pub nome_recebedor: String,
}

/// POST /api/v1/separacoes/{id}/deliver
pub async fn deliver(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<DeliverRequest>,
) -> AppResult<Json<DataResponse<Separacao>>> {
    let separacao = SeparacaoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &separacao.empresa).await?;
    let delivered = state
        .separacoes
        .confirmar_entrega(&id, &input.nome_recebedor)
        .await?;
    Ok(Json(DataResponse::new(delivered)))
}
