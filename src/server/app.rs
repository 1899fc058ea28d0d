use axum::{
    routing::{delete, get, post, put},
    Router,
};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{currencies, health, imports, invoices, items, options, plan, projects, reports, results};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { db };

    // "*" must go through Any; tower-http rejects it as an exact origin.
    let exact_origin = cors_origin
        .filter(|origin| *origin != "*")
        .and_then(|origin| origin.parse::<axum::http::HeaderValue>().ok());
    let cors = match exact_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Project routes
        .route("/projects", get(projects::list_projects))
        .route("/projects", post(projects::create_project))
        .route("/projects/:id", get(projects::get_project))
        .route("/projects/:id", put(projects::update_project))
        .route("/projects/:id", delete(projects::delete_project))
        // Items master
        .route("/items", get(items::list_items))
        .route("/items", post(items::create_item))
        .route("/items/:id", get(items::get_item))
        .route("/items/:id", put(items::update_item))
        .route("/items/:id", delete(items::delete_item))
        // Project items
        .route("/projects/:id/items", get(items::list_project_items))
        .route("/projects/:id/items", post(items::create_project_item))
        .route("/project-items/:id", delete(items::delete_project_item))
        // Procurement options
        .route("/projects/:id/options", get(options::list_options))
        .route("/projects/:id/options", post(options::create_option))
        .route("/options/:id", put(options::update_option))
        .route("/options/:id", delete(options::delete_option))
        // Optimization results
        .route("/projects/:id/results", get(results::list_results))
        .route("/projects/:id/results", post(results::create_run))
        .route("/projects/:id/results/grouped", get(results::grouped_results))
        .route("/projects/:id/results/runs/:run_id", delete(results::delete_run))
        // Plan reconciliation, save and delivery tracking
        .route("/projects/:id/plan", get(plan::list_plan))
        .route("/projects/:id/plan/preview", post(plan::preview_plan))
        .route("/projects/:id/plan/save", post(plan::save_plan))
        .route("/plan-entries/:id/delivery", put(plan::update_delivery))
        // Currencies
        .route("/currencies", get(currencies::list_currencies))
        .route("/currencies", post(currencies::create_currency))
        .route("/currencies/:id", put(currencies::update_currency))
        .route("/currencies/:id", delete(currencies::delete_currency))
        // Invoices and payments
        .route("/projects/:id/invoices", get(invoices::list_invoices))
        .route("/projects/:id/invoices", post(invoices::create_invoice))
        .route("/invoices/:id", put(invoices::update_invoice))
        .route("/invoices/:id", delete(invoices::delete_invoice))
        .route("/invoices/:id/payments", get(invoices::list_payments))
        .route("/invoices/:id/payments", post(invoices::create_payment))
        // Reports and exports
        .route("/projects/:id/reports/summary", get(reports::project_summary))
        .route("/projects/:id/export/:format", get(reports::export_project))
        // CSV import
        .route("/projects/:id/import/:kind", post(imports::import_csv))
}
