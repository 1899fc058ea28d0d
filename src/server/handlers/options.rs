use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::database::entities::{
    procurement_options, procurement_options::Entity as ProcurementOptions,
    projects::Entity as Projects,
};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateOptionRequest {
    pub item_code: String,
    pub supplier_name: String,
    pub base_cost: f64,
    pub currency_code: Option<String>,
    pub lomc_lead_time: Option<i32>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateOptionRequest {
    pub supplier_name: Option<String>,
    pub base_cost: Option<f64>,
    pub currency_code: Option<String>,
    pub lomc_lead_time: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn list_options(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<procurement_options::Model>>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let options = ProcurementOptions::find()
        .filter(procurement_options::Column::ProjectId.eq(project_id))
        .order_by_asc(procurement_options::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(options))
}

pub async fn create_option(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<CreateOptionRequest>,
) -> Result<Json<procurement_options::Model>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let now = Utc::now();
    let option = procurement_options::ActiveModel {
        project_id: Set(project_id),
        item_code: Set(payload.item_code),
        supplier_name: Set(payload.supplier_name),
        base_cost: Set(payload.base_cost),
        currency_code: Set(payload.currency_code.unwrap_or_else(|| "USD".to_string())),
        lomc_lead_time: Set(payload.lomc_lead_time.unwrap_or(0)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let option = option
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(option))
}

pub async fn update_option(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOptionRequest>,
) -> Result<Json<procurement_options::Model>, StatusCode> {
    let option = ProcurementOptions::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut option: procurement_options::ActiveModel = option.into();

    // Only update fields that are provided
    if let Some(supplier_name) = payload.supplier_name {
        option.supplier_name = Set(supplier_name);
    }
    if let Some(base_cost) = payload.base_cost {
        option.base_cost = Set(base_cost);
    }
    if let Some(currency_code) = payload.currency_code {
        option.currency_code = Set(currency_code);
    }
    if let Some(lomc_lead_time) = payload.lomc_lead_time {
        option.lomc_lead_time = Set(lomc_lead_time);
    }
    if let Some(is_active) = payload.is_active {
        option.is_active = Set(is_active);
    }
    option.updated_at = Set(Utc::now());

    let option = option
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(option))
}

pub async fn delete_option(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let option = ProcurementOptions::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    ProcurementOptions::delete_by_id(option.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
