use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::database::entities::{
    optimization_results, optimization_results::Entity as OptimizationResults, plan_entries,
    projects::Entity as Projects,
};
use crate::reconcile::runs_by_recency;
use crate::server::app::AppState;
use crate::services::{PlanChangeSet, PlanService};

use super::results::GroupedResultsResponse;

#[derive(Serialize, Deserialize)]
pub struct SavePlanRequest {
    pub run_id: String,
    #[serde(default)]
    pub changes: PlanChangeSet,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateDeliveryRequest {
    pub delivery_status: Option<String>,
    pub invoiced: Option<bool>,
}

pub async fn list_plan(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<plan_entries::Model>>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = PlanService::new(state.db.clone());
    let entries = service
        .entries(project_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(entries))
}

/// Reconcile a submitted change set against the stored baseline without
/// persisting anything. The response mirrors what "save" would write.
pub async fn preview_plan(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(changes): Json<PlanChangeSet>,
) -> Result<Json<GroupedResultsResponse>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = PlanService::new(state.db.clone());
    let groups = service
        .preview(project_id, &changes)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let recent_runs = runs_by_recency(&groups);

    Ok(Json(GroupedResultsResponse { groups, recent_runs }))
}

pub async fn save_plan(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<SavePlanRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    // A run with no baseline rows has nothing to save against.
    OptimizationResults::find()
        .filter(optimization_results::Column::ProjectId.eq(project_id))
        .filter(optimization_results::Column::RunId.eq(payload.run_id.clone()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = PlanService::new(state.db.clone());
    match service
        .save_plan(project_id, &payload.run_id, &payload.changes)
        .await
    {
        Ok(entries) => {
            let message = format!("Plan saved with {} entries", entries.len());
            Ok(Json(json!({
                "status": "completed",
                "run_id": payload.run_id,
                "entries": entries,
                "message": message
            })))
        }
        Err(e) => {
            tracing::error!("Plan save failed: {}", e);
            // The submitted change set stays valid for a retry; the message
            // is surfaced to the user as-is.
            Ok(Json(json!({
                "status": "failed",
                "run_id": payload.run_id,
                "message": format!("Plan save failed: {}", e)
            })))
        }
    }
}

pub async fn update_delivery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDeliveryRequest>,
) -> Result<Json<plan_entries::Model>, StatusCode> {
    let service = PlanService::new(state.db.clone());

    let mut entry: Option<plan_entries::Model> = None;

    if let Some(status) = payload.delivery_status {
        entry = Some(
            service
                .set_delivery_status(id, &status)
                .await
                .map_err(|_| StatusCode::BAD_REQUEST)?
                .ok_or(StatusCode::NOT_FOUND)?,
        );
    }

    if let Some(invoiced) = payload.invoiced {
        entry = Some(
            service
                .set_invoiced(id, invoiced)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
                .ok_or(StatusCode::NOT_FOUND)?,
        );
    }

    entry.map(Json).ok_or(StatusCode::BAD_REQUEST)
}
