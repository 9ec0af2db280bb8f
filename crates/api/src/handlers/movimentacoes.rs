//! Handlers for stock movements, nested under
//! `/empresas/{empresa_id}/movimentacoes`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use estoque_core::error::CoreError;
use estoque_core::movement::MovementKind;
use estoque_core::scan::normalize_scan;
use estoque_db::models::movimentacao::Movimentacao;
use estoque_db::models::produto::Produto;
use estoque_db::repositories::MovimentoFilters;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
}

/// GET /api/v1/empresas/{empresa_id}/movimentacoes
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<Movimentacao>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;

    let tipo = query
        .tipo
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<MovementKind>()
                .map_err(|_| AppError::Core(CoreError::Validation(format!("tipo inválido: {t}"))))
        })
        .transpose()?;

    let filters = MovimentoFilters {
        produto_codigo: query.codigo,
        tipo,
        data_inicio: query.data_inicio,
        data_fim: query.data_fim,
    };
    let movimentos = state.stock.historico(&empresa_id, &filters).await?;
    Ok(Json(DataResponse::new(movimentos)))
}

#[derive(Debug, Deserialize)]
pub struct RegisterMovementRequest {
    /// Raw code or scanned QR payload.
    pub codigo: String,
    pub tipo: MovementKind,
    pub quantidade: i64,
}

/// POST /api/v1/empresas/{empresa_id}/movimentacoes
///
/// Returns the product with its updated quantity.
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<RegisterMovementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Produto>>)> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let codigo = normalize_scan(&input.codigo);
    let produto = state
        .stock
        .registrar_movimentacao(&empresa_id, &codigo, input.tipo, input.quantidade, &user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(produto))))
}
