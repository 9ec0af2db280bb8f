//! Handlers for `/admin/users` (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use estoque_core::error::CoreError;
use estoque_core::roles::Role;
use estoque_db::models::user::{CreateUser, UpdateUser, User};
use estoque_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    user.require_admin()?;
    let users = UserRepo::list_all(state.store.as_ref()).await?;
    Ok(Json(DataResponse::new(users)))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub empresas: Vec<String>,
}

/// POST /api/v1/admin/users
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    user.require_admin()?;

    let username = input.username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "informe um nome de usuário".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_username(state.store.as_ref(), &username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Usuário \"{username}\" já existe."
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;
    let created = UserRepo::create(
        state.store.as_ref(),
        &CreateUser {
            username,
            role: input.role,
            empresas: input.empresas,
            password_hash,
        },
    )
    .await?;

    tracing::info!(username = %created.username, role = %created.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub empresas: Option<Vec<String>>,
}

/// PATCH /api/v1/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    user.require_admin()?;
    let updates = UpdateUser {
        role: input.role,
        empresas: input.empresas,
        password_hash: None,
    };
    let updated = UserRepo::update(state.store.as_ref(), &id, &updates).await?;
    Ok(Json(DataResponse::new(updated)))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<()>>> {
    user.require_admin()?;
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;
    let updates = UpdateUser {
        password_hash: Some(password_hash),
        ..Default::default()
    };
    UserRepo::update(state.store.as_ref(), &id, &updates).await?;

    tracing::info!(user_id = %id, "Password reset by admin");
    Ok(Json(DataResponse::new(())))
}
