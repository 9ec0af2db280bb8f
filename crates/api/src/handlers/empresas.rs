//! Handlers for the `/empresas` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use estoque_core::error::CoreError;
use estoque_db::models::empresa::{CreateEmpresa, Empresa};
use estoque_db::repositories::EmpresaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/empresas
///
/// Admins see every company; other users only the ones on their access
/// list.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Empresa>>>> {
    let mut empresas = EmpresaRepo::list_all(state.store.as_ref()).await?;
    if !user.role.is_admin() {
        let record =
            estoque_db::repositories::UserRepo::get(state.store.as_ref(), &user.user_id).await?;
        empresas.retain(|e| record.empresas.contains(&e.id));
    }
    Ok(Json(DataResponse::new(empresas)))
}

/// POST /api/v1/empresas (admin only)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEmpresa>,
) -> AppResult<(StatusCode, Json<DataResponse<Empresa>>)> {
    user.require_admin()?;
    if input.nome.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "informe o nome da empresa".into(),
        )));
    }
    let empresa = EmpresaRepo::create(state.store.as_ref(), &input).await?;
    tracing::info!(id = %empresa.id, nome = %empresa.nome, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(empresa))))
}
