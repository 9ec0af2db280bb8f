//! Handlers for the product catalog.
//!
//! Collection routes are nested under `/empresas/{empresa_id}/produtos`;
//! single-record edits live at `/produtos/{id}` since the record already
//! carries its company.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use estoque_core::batch::{parse_product_lines, ValidatedRow};
use estoque_core::error::CoreError;
use estoque_core::scan::normalize_scan;
use estoque_db::models::produto::{CreateProduto, Produto, UpdateProduto};
use estoque_db::repositories::{ProdutoListOptions, ProdutoRepo};
use estoque_db::services::BatchOutcome;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub descending: bool,
}

/// GET /api/v1/empresas/{empresa_id}/produtos
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Produto>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let options = ProdutoListOptions {
        include_inactive: query.include_inactive,
        search_term: query.search,
        location: query.location,
        sort_key: query.sort,
        descending: query.descending,
    };
    let produtos = state.catalog.list(&empresa_id, &options).await?;
    Ok(Json(DataResponse::new(produtos)))
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub codigo: String,
}

/// GET /api/v1/empresas/{empresa_id}/produtos/lookup?codigo=...
///
/// The code may be a raw code or a scanned QR payload (public product-view
/// URL); both resolve the same way.
pub async fn lookup(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Query(query): Query<LookupQuery>,
) -> AppResult<Json<DataResponse<Produto>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let codigo = normalize_scan(&query.codigo);
    let produto = state
        .catalog
        .find_by_codigo(&empresa_id, &codigo)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Produto", codigo)))?;
    Ok(Json(DataResponse::new(produto)))
}

/// GET /api/v1/empresas/{empresa_id}/produtos/locations
pub async fn locations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let locations = state.catalog.unique_locations(&empresa_id).await?;
    Ok(Json(DataResponse::new(locations)))
}

#[derive(Debug, Deserialize)]
pub struct CreateProdutoRequest {
    pub codigo: String,
    pub descricao: String,
    pub valor: f64,
    #[serde(default)]
    pub quantidade: i64,
    #[serde(default)]
    pub localizacao: String,
    #[serde(default)]
    pub codigos_alternativos: Vec<String>,
}

/// POST /api/v1/empresas/{empresa_id}/produtos
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<CreateProdutoRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Produto>>)> {
    user.require_empresa_access(&state, &empresa_id).await?;

    let codigo = input.codigo.trim().to_uppercase();
    if codigo.is_empty() || input.descricao.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "informe código e descrição".into(),
        )));
    }
    if input.valor <= 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "o valor deve ser maior que zero".into(),
        )));
    }
    if input.quantidade < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "a quantidade não pode ser negativa".into(),
        )));
    }
    if !state
        .catalog
        .check_code_uniqueness(&empresa_id, &codigo, None)
        .await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Código \"{codigo}\" já está em uso."
        ))));
    }

    let create = CreateProduto {
        empresa: empresa_id,
        codigo,
        descricao: input.descricao.trim().to_string(),
        valor: input.valor,
        quantidade: input.quantidade,
        localizacao: input.localizacao.trim().to_uppercase(),
        status: estoque_db::models::produto::ProdutoStatus::Ativo,
        codigos_alternativos: input
            .codigos_alternativos
            .into_iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect(),
    };
    let produto = state.catalog.register_produto(create, &user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(produto))))
}

/// PATCH /api/v1/produtos/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduto>,
) -> AppResult<Json<DataResponse<Produto>>> {
    let existing = ProdutoRepo::get(state.store.as_ref(), &id).await?;
    user.require_empresa_access(&state, &existing.empresa).await?;

    if let Some(valor) = input.valor {
        if valor <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "o valor deve ser maior que zero".into(),
            )));
        }
    }
    let produto = state.catalog.editar_produto(&id, input).await?;
    Ok(Json(DataResponse::new(produto)))
}

#[derive(Debug, Deserialize)]
pub struct ValidateBatchRequest {
    /// Tab-delimited pasted rows, one product per line.
    pub text: String,
}

/// POST /api/v1/empresas/{empresa_id}/produtos/validate-batch
pub async fn validate_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(input): Json<ValidateBatchRequest>,
) -> AppResult<Json<DataResponse<Vec<ValidatedRow>>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let rows = parse_product_lines(&input.text);
    let validated = state.catalog.validate_batch(&empresa_id, rows).await?;
    Ok(Json(DataResponse::new(validated)))
}

/// POST /api/v1/empresas/{empresa_id}/produtos/batch
///
/// Accepts the rows returned by `validate-batch` and creates the `novo`
/// ones.
pub async fn create_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(empresa_id): Path<String>,
    Json(rows): Json<Vec<ValidatedRow>>,
) -> AppResult<Json<DataResponse<BatchOutcomeBody>>> {
    user.require_empresa_access(&state, &empresa_id).await?;
    let outcome = state
        .catalog
        .create_batch(&empresa_id, rows, &user.user_id)
        .await?;
    Ok(Json(DataResponse::new(BatchOutcomeBody::from(outcome))))
}

#[derive(Debug, serde::Serialize)]
pub struct BatchOutcomeBody {
    pub criados: usize,
    pub ignorados: usize,
}

impl From<BatchOutcome> for BatchOutcomeBody {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            criados: outcome.criados,
            ignorados: outcome.ignorados,
        }
    }
}
