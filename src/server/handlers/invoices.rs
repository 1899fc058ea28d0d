use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::database::entities::{
    invoices, invoices::is_valid_invoice_status, invoices::Entity as Invoices, payments,
    payments::Entity as Payments, projects::Entity as Projects,
};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub supplier_name: String,
    pub amount: f64,
    pub currency_code: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub supplier_name: Option<String>,
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: f64,
    pub method: Option<String>,
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<invoices::Model>>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let invoices = Invoices::find()
        .filter(invoices::Column::ProjectId.eq(project_id))
        .order_by_asc(invoices::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(invoices))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<Json<invoices::Model>, StatusCode> {
    // Verify project exists
    Projects::find_by_id(project_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if payload.amount <= 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let now = Utc::now();
    let invoice = invoices::ActiveModel {
        project_id: Set(project_id),
        supplier_name: Set(payload.supplier_name),
        amount: Set(payload.amount),
        currency_code: Set(payload.currency_code.unwrap_or_else(|| "USD".to_string())),
        status: Set("draft".to_string()),
        issue_date: Set(now),
        due_date: Set(payload.due_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let invoice = invoice
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(invoice))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> Result<Json<invoices::Model>, StatusCode> {
    let invoice = Invoices::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut invoice: invoices::ActiveModel = invoice.into();

    // Only update fields that are provided
    if let Some(supplier_name) = payload.supplier_name {
        invoice.supplier_name = Set(supplier_name);
    }
    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return Err(StatusCode::BAD_REQUEST);
        }
        invoice.amount = Set(amount);
    }
    if let Some(currency_code) = payload.currency_code {
        invoice.currency_code = Set(currency_code);
    }
    if let Some(status) = payload.status {
        if !is_valid_invoice_status(&status) {
            return Err(StatusCode::BAD_REQUEST);
        }
        invoice.status = Set(status);
    }
    if payload.due_date.is_some() {
        invoice.due_date = Set(payload.due_date);
    }
    invoice.updated_at = Set(Utc::now());

    let invoice = invoice
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let invoice = Invoices::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Invoices::delete_by_id(invoice.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_payments(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
) -> Result<Json<Vec<payments::Model>>, StatusCode> {
    // Verify invoice exists
    Invoices::find_by_id(invoice_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let payments = Payments::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(payments::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(payments))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<Json<payments::Model>, StatusCode> {
    let invoice = Invoices::find_by_id(invoice_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if payload.amount <= 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let payment = payments::ActiveModel {
        invoice_id: Set(invoice_id),
        amount: Set(payload.amount),
        paid_at: Set(Utc::now()),
        method: Set(payload.method),
        ..Default::default()
    };

    let payment = payment
        .insert(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Flip the invoice to paid once payments cover the full amount.
    let paid: f64 = Payments::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .iter()
        .map(|p| p.amount)
        .sum();

    if invoice.balance(paid) <= 0.0 && invoice.status != "paid" {
        let mut invoice: invoices::ActiveModel = invoice.into();
        invoice.status = Set("paid".to_string());
        invoice.updated_at = Set(Utc::now());
        invoice
            .update(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    }

    Ok(Json(payment))
}
