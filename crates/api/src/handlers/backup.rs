//! Handlers for `/backup` (admin only).

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use estoque_db::services::BackupData;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/backup/export -- dump every collection as one JSON document.
pub async fn export(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<BackupData>>> {
    user.require_admin()?;
    let data = state.backup.export().await?;
    Ok(Json(DataResponse::new(data)))
}

#[derive(Debug, Serialize)]
pub struct ImportBody {
    pub imported: usize,
    pub skipped: usize,
}

/// POST /api/v1/backup/import -- destructive restore from a snapshot.
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<BackupData>,
) -> AppResult<Json<DataResponse<ImportBody>>> {
    user.require_admin()?;
    tracing::warn!(records = data.total_records(), "Backup import requested");
    let outcome = state.backup.import(data).await?;
    Ok(Json(DataResponse::new(ImportBody {
        imported: outcome.imported,
        skipped: outcome.skipped,
    })))
}
