use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::database::entities::{currencies, currencies::Entity as Currencies};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateCurrencyRequest {
    pub code: String,
    pub name: String,
    pub rate_to_base: f64,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub name: Option<String>,
    pub rate_to_base: Option<f64>,
}

pub async fn list_currencies(
    State(state): State<AppState>,
) -> Result<Json<Vec<currencies::Model>>, StatusCode> {
    let currencies = Currencies::find()
        .order_by_asc(currencies::Column::Code)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(currencies))
}

pub async fn create_currency(
    State(state): State<AppState>,
    Json(payload): Json<CreateCurrencyRequest>,
) -> Result<Json<currencies::Model>, StatusCode> {
    if payload.rate_to_base <= 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let code = payload.code.to_uppercase();
    let existing = Currencies::find()
        .filter(currencies::Column::Code.eq(code.clone()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if existing.is_some() {
        return Err(StatusCode::CONFLICT);
    }

    let currency = currencies::ActiveModel {
        code: Set(code),
        name: Set(payload.name),
        rate_to_base: Set(payload.rate_to_base),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    let currency = currency
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(currency))
}

pub async fn update_currency(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCurrencyRequest>,
) -> Result<Json<currencies::Model>, StatusCode> {
    let currency = Currencies::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut currency: currencies::ActiveModel = currency.into();

    if let Some(name) = payload.name {
        currency.name = Set(name);
    }
    if let Some(rate_to_base) = payload.rate_to_base {
        if rate_to_base <= 0.0 {
            return Err(StatusCode::BAD_REQUEST);
        }
        currency.rate_to_base = Set(rate_to_base);
    }
    currency.updated_at = Set(Utc::now());

    let currency = currency
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(currency))
}

pub async fn delete_currency(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let currency = Currencies::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Currencies::delete_by_id(currency.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
