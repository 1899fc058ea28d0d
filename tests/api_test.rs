//! API integration tests
//!
//! Tests for the REST endpoints: projects, items, options, results, currencies

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use procura::database::connection::setup_database;
use procura::server::app::create_app;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Create a test server backed by a throwaway database
async fn setup_test_server() -> Result<TestServer> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    // Persist the backing file for the server's lifetime: the connection pool
    // opens connections lazily, so the path must outlive this helper (dropping
    // the NamedTempFile here would unlink the file and break later queries).
    let _keep = temp_file.keep()?;

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, Some("*")).await?;
    let server = TestServer::new(app)?;

    Ok(server)
}

async fn create_test_project(server: &TestServer, name: &str) -> Result<i64> {
    let response = server
        .post("/api/v1/projects")
        .json(&json!({"name": name, "description": "test project"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let project: Value = response.json();
    Ok(project["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "procura-server");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_projects_crud_api() -> Result<()> {
    let server = setup_test_server().await?;

    // Test POST /api/v1/projects (create)
    let create_payload = json!({
        "name": "Test API Project",
        "description": "Created via API test"
    });

    let response = server.post("/api/v1/projects").json(&create_payload).await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let project: Value = response.json();
    let project_id = project["id"].as_i64().unwrap();
    assert_eq!(project["name"], "Test API Project");
    assert_eq!(project["description"], "Created via API test");

    // Test GET /api/v1/projects (list)
    let response = server.get("/api/v1/projects").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let projects: Vec<Value> = response.json();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], project_id);

    // Test PUT /api/v1/projects/{id} (update)
    let response = server
        .put(&format!("/api/v1/projects/{}", project_id))
        .json(&json!({"name": "Updated API Project", "description": "Updated"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let updated_project: Value = response.json();
    assert_eq!(updated_project["name"], "Updated API Project");

    // Test DELETE /api/v1/projects/{id}
    let response = server
        .delete(&format!("/api/v1/projects/{}", project_id))
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // Verify deletion
    let response = server.get(&format!("/api/v1/projects/{}", project_id)).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_items_master_api() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .post("/api/v1/items")
        .json(&json!({
            "item_code": "TRF-110",
            "name": "110kV Transformer",
            "unit": "unit",
            "category": "power"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let item: Value = response.json();
    let item_id = item["id"].as_i64().unwrap();
    assert_eq!(item["item_code"], "TRF-110");

    // Duplicate codes are rejected
    let response = server
        .post("/api/v1/items")
        .json(&json!({
            "item_code": "TRF-110",
            "name": "Duplicate",
            "unit": "unit"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Partial update leaves other fields alone
    let response = server
        .put(&format!("/api/v1/items/{}", item_id))
        .json(&json!({"name": "110kV Power Transformer"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let item: Value = response.json();
    assert_eq!(item["name"], "110kV Power Transformer");
    assert_eq!(item["unit"], "unit");
    assert_eq!(item["category"], "power");

    Ok(())
}

#[tokio::test]
async fn test_options_and_results_api() -> Result<()> {
    let server = setup_test_server().await?;
    let project_id = create_test_project(&server, "Options Project").await?;

    // Create two options for one item
    let response = server
        .post(&format!("/api/v1/projects/{}/options", project_id))
        .json(&json!({
            "item_code": "CBL-XLPE",
            "supplier_name": "Meridian Cables",
            "base_cost": 9400.0,
            "lomc_lead_time": 6
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let option: Value = response.json();
    let option_id = option["id"].as_i64().unwrap();
    assert_eq!(option["currency_code"], "USD");

    let response = server
        .post(&format!("/api/v1/projects/{}/options", project_id))
        .json(&json!({
            "item_code": "CBL-XLPE",
            "supplier_name": "Arcadia Cables",
            "base_cost": 8900.0,
            "currency_code": "EUR"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get(&format!("/api/v1/projects/{}/options", project_id))
        .await;
    let options: Vec<Value> = response.json();
    assert_eq!(options.len(), 2);

    // Register a run; final cost is derived from the option's base cost
    let response = server
        .post(&format!("/api/v1/projects/{}/results", project_id))
        .json(&json!({
            "decisions": [{
                "item_code": "CBL-XLPE",
                "procurement_option_id": option_id,
                "quantity": 3.0,
                "purchase_time": 1,
                "delivery_time": 2
            }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let run: Value = response.json();
    let run_id = run["run_id"].as_str().unwrap().to_string();
    assert_eq!(run["results"][0]["final_cost"], 9400.0 * 3.0);

    // Grouped view reports the same total
    let response = server
        .get(&format!("/api/v1/projects/{}/results/grouped", project_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let grouped: Value = response.json();
    assert_eq!(grouped["recent_runs"][0], run_id.as_str());
    assert_eq!(grouped["groups"][&run_id]["total_cost"], 9400.0 * 3.0);
    assert_eq!(grouped["groups"][&run_id]["has_edits"], false);

    // Delete the run; grouped view goes empty
    let response = server
        .delete(&format!(
            "/api/v1/projects/{}/results/runs/{}",
            project_id, run_id
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/projects/{}/results/grouped", project_id))
        .await;
    let grouped: Value = response.json();
    assert!(grouped["groups"].as_object().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_currencies_api() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .post("/api/v1/currencies")
        .json(&json!({"code": "eur", "name": "Euro", "rate_to_base": 1.08}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let currency: Value = response.json();
    let currency_id = currency["id"].as_i64().unwrap();
    assert_eq!(currency["code"], "EUR");

    // Non-positive rates are rejected
    let response = server
        .post("/api/v1/currencies")
        .json(&json!({"code": "BAD", "name": "Bad", "rate_to_base": 0.0}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .put(&format!("/api/v1/currencies/{}", currency_id))
        .json(&json!({"rate_to_base": 1.11}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let currency: Value = response.json();
    assert_eq!(currency["rate_to_base"], 1.11);

    Ok(())
}

#[tokio::test]
async fn test_invoices_and_payments_api() -> Result<()> {
    let server = setup_test_server().await?;
    let project_id = create_test_project(&server, "Invoice Project").await?;

    let response = server
        .post(&format!("/api/v1/projects/{}/invoices", project_id))
        .json(&json!({
            "supplier_name": "Meridian Cables",
            "amount": 1000.0
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let invoice: Value = response.json();
    let invoice_id = invoice["id"].as_i64().unwrap();
    assert_eq!(invoice["status"], "draft");

    // Issue the invoice
    let response = server
        .put(&format!("/api/v1/invoices/{}", invoice_id))
        .json(&json!({"status": "issued"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Unknown statuses are rejected
    let response = server
        .put(&format!("/api/v1/invoices/{}", invoice_id))
        .json(&json!({"status": "shredded"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Two partial payments; the second one covers the invoice in full
    let response = server
        .post(&format!("/api/v1/invoices/{}/payments", invoice_id))
        .json(&json!({"amount": 400.0, "method": "wire"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .post(&format!("/api/v1/invoices/{}/payments", invoice_id))
        .json(&json!({"amount": 600.0}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get(&format!("/api/v1/invoices/{}/payments", invoice_id))
        .await;
    let payments: Vec<Value> = response.json();
    assert_eq!(payments.len(), 2);

    let response = server
        .get(&format!("/api/v1/projects/{}/invoices", project_id))
        .await;
    let invoices: Vec<Value> = response.json();
    assert_eq!(invoices[0]["status"], "paid");

    Ok(())
}

#[tokio::test]
async fn test_error_handling() -> Result<()> {
    let server = setup_test_server().await?;

    // Test 404 for non-existent project
    let response = server.get("/api/v1/projects/99999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Nested resources also 404 on the missing parent
    let response = server.get("/api/v1/projects/99999/results/grouped").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Test invalid JSON payload
    let response = server
        .post("/api/v1/projects")
        .json(&json!({"invalid": "data"}))
        .await;

    // Should return a client error status
    assert!(response.status_code().is_client_error());

    Ok(())
}

#[tokio::test]
async fn test_cors_headers() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:5173"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    // CORS headers should be present
    let headers = response.headers();
    assert!(headers.get("access-control-allow-origin").is_some());

    Ok(())
}
