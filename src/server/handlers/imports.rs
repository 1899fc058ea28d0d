use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::EntityTrait;

use crate::database::entities::projects::Entity as Projects;
use crate::server::app::AppState;
use crate::services::{ImportError, ImportReport, ImportService};

/// CSV import endpoint: the body is the raw CSV text, `kind` picks the
/// target table (`items`, `project-items`, `options`).
pub async fn import_csv(
    State(state): State<AppState>,
    Path((project_id, kind)): Path<(i32, String)>,
    body: String,
) -> Result<Json<ImportReport>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = ImportService::new(state.db.clone());
    match service.import(Some(project_id), &kind, &body).await {
        Ok(report) => Ok(Json(report)),
        Err(e @ (ImportError::MissingColumn(_) | ImportError::UnknownKind(_))) => {
            tracing::warn!("Import rejected: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Import failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
