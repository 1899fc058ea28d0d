use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use indexmap::IndexMap;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::database::entities::{
    optimization_results, optimization_results::Entity as OptimizationResults,
    projects::Entity as Projects,
};
use crate::reconcile::{runs_by_recency, RunGroup};
use crate::server::app::AppState;
use crate::services::{ResultsService, RunDecision};

#[derive(Serialize, Deserialize)]
pub struct CreateRunRequest {
    pub decisions: Vec<RunDecision>,
}

/// Reconciled view plus the display order the dashboard uses: newest run
/// first, ties in encounter order.
#[derive(Serialize)]
pub struct GroupedResultsResponse {
    pub groups: IndexMap<String, RunGroup>,
    pub recent_runs: Vec<String>,
}

pub async fn list_results(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<optimization_results::Model>>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let results = OptimizationResults::find()
        .filter(optimization_results::Column::ProjectId.eq(project_id))
        .order_by_asc(optimization_results::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(results))
}

pub async fn grouped_results(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<GroupedResultsResponse>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = ResultsService::new(state.db.clone());
    let groups = service
        .grouped(project_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let recent_runs = runs_by_recency(&groups);

    Ok(Json(GroupedResultsResponse { groups, recent_runs }))
}

pub async fn create_run(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<CreateRunRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if payload.decisions.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let service = ResultsService::new(state.db.clone());
    match service.create_run(project_id, &payload.decisions).await {
        Ok((run_id, results)) => Ok(Json(json!({
            "run_id": run_id,
            "results": results,
        }))),
        Err(e) => {
            tracing::error!("Failed to register run: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

pub async fn delete_run(
    State(state): State<AppState>,
    Path((project_id, run_id)): Path<(i32, String)>,
) -> Result<StatusCode, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let service = ResultsService::new(state.db.clone());

    // Deleting an already-gone run is fine; refetch drift is expected.
    service
        .delete_run(project_id, &run_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
