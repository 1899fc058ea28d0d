use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::database::entities::{
    items, items::Entity as Items, project_items, project_items::Entity as ProjectItems,
    projects::Entity as Projects,
};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub item_code: String,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateProjectItemRequest {
    pub item_code: String,
    pub quantity: f64,
    pub need_time: Option<i32>,
}

pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<items::Model>>, StatusCode> {
    let items = Items::find()
        .order_by_asc(items::Column::ItemCode)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Json<items::Model>, StatusCode> {
    let existing = Items::find()
        .filter(items::Column::ItemCode.eq(payload.item_code.clone()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if existing.is_some() {
        return Err(StatusCode::CONFLICT);
    }

    let now = Utc::now();
    let item = items::ActiveModel {
        item_code: Set(payload.item_code),
        name: Set(payload.name),
        unit: Set(payload.unit),
        category: Set(payload.category),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let item = item
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(item))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<items::Model>, StatusCode> {
    let item = Items::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<items::Model>, StatusCode> {
    let item = Items::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut item: items::ActiveModel = item.into();

    // Only update fields that are provided
    if let Some(name) = payload.name {
        item.name = Set(name);
    }
    if let Some(unit) = payload.unit {
        item.unit = Set(unit);
    }
    if payload.category.is_some() {
        item.category = Set(payload.category);
    }
    item.updated_at = Set(Utc::now());

    let item = item
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let item = Items::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Items::delete_by_id(item.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_project_items(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<project_items::Model>>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let rows = ProjectItems::find()
        .filter(project_items::Column::ProjectId.eq(project_id))
        .order_by_asc(project_items::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(rows))
}

pub async fn create_project_item(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<CreateProjectItemRequest>,
) -> Result<Json<project_items::Model>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let now = Utc::now();
    let row = project_items::ActiveModel {
        project_id: Set(project_id),
        item_code: Set(payload.item_code),
        quantity: Set(payload.quantity),
        need_time: Set(payload.need_time.unwrap_or(1)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let row = row
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(row))
}

pub async fn delete_project_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let row = ProjectItems::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    ProjectItems::delete_by_id(row.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
