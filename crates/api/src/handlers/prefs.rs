//! Handlers for `/prefs` (theme and label presets).

use axum::extract::State;
use axum::Json;

use estoque_core::prefs::Preferences;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/prefs
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let prefs = state.prefs.load()?;
    Ok(Json(DataResponse::new(prefs)))
}

/// PUT /api/v1/prefs -- replace the stored preferences. A dangling active
/// preset reference is repaired before saving.
pub async fn put(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(mut prefs): Json<Preferences>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    prefs.ensure_active_preset();
    state.prefs.save(&prefs)?;
    Ok(Json(DataResponse::new(prefs)))
}

/// POST /api/v1/prefs/reset -- discard stored preferences.
pub async fn reset(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let defaults = state.prefs.reset()?;
    Ok(Json(DataResponse::new(defaults)))
}
