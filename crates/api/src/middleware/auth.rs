//! JWT-based authentication extractor and company-access checks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use estoque_core::error::CoreError;
use estoque_core::roles::Role;
use estoque_core::types::RecordId;
use estoque_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's record id (from `claims.sub`).
    pub user_id: RecordId,
    pub role: Role,
}

impl AuthUser {
    /// Reject non-admin callers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )))
        }
    }

    /// Reject callers without access to the given company. Admins see every
    /// company; other users carry an explicit company-access list.
    pub async fn require_empresa_access(
        &self,
        state: &AppState,
        empresa_id: &str,
    ) -> Result<(), AppError> {
        if self.role.is_admin() {
            return Ok(());
        }
        let user = UserRepo::get(state.store.as_ref(), &self.user_id).await?;
        if user.empresas.iter().any(|e| e == empresa_id) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "No access to this company".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Core(CoreError::Unauthorized("Unknown role".into())))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}
