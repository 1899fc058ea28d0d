use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::EntityTrait;

use crate::database::entities::projects::Entity as Projects;
use crate::server::app::AppState;
use crate::services::{ProjectSummary, ReportService};

pub async fn project_summary(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectSummary>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = ReportService::new(state.db.clone());
    let summary = service
        .project_summary(project_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(summary))
}

pub async fn export_project(
    State(state): State<AppState>,
    Path((project_id, format)): Path<(i32, String)>,
) -> Result<String, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = ReportService::new(state.db.clone());
    match service.export(project_id, &format).await {
        Ok(rendered) => Ok(rendered),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
