//! Handlers for `/auth`.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use estoque_core::error::CoreError;
use estoque_db::models::user::{UpdateUser, User};
use estoque_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/v1/auth/login
///
/// Every failure mode returns the same 401 so the endpoint does not reveal
/// which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(state.store.as_ref(), input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
    let verified = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let token = generate_access_token(&user.id, user.role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))?;

    tracing::info!(username = %user.username, "User logged in");
    Ok(Json(DataResponse::new(LoginResponse { token, user })))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<()>>> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let record = UserRepo::get(state.store.as_ref(), &user.user_id).await?;
    let hash = record
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::InternalError("user has no password hash".into()))?;

    let verified = verify_password(&input.current_password, hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;
    let updates = UpdateUser {
        password_hash: Some(new_hash),
        ..Default::default()
    };
    UserRepo::update(state.store.as_ref(), &user.user_id, &updates).await?;

    tracing::info!(user_id = %user.user_id, "Password changed");
    Ok(Json(DataResponse::new(())))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let record = UserRepo::get(state.store.as_ref(), &user.user_id).await?;
    Ok(Json(DataResponse::new(record)))
}
