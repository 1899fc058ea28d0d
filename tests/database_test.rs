//! Database functionality tests
//!
//! Tests for migrations, entity operations, and cascade behavior

use anyhow::Result;
use chrono::Utc;
use procura::database::entities::*;
use procura::database::setup_database;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn insert_project(db: &DatabaseConnection, name: &str) -> Result<projects::Model> {
    let now = Utc::now();
    let project = projects::ActiveModel {
        name: Set(name.to_string()),
        description: Set(Some("test".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(project)
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    let projects = projects::Entity::find().all(&db).await?;
    assert_eq!(projects.len(), 0);

    let items = items::Entity::find().all(&db).await?;
    assert_eq!(items.len(), 0);

    let project_items = project_items::Entity::find().all(&db).await?;
    assert_eq!(project_items.len(), 0);

    let options = procurement_options::Entity::find().all(&db).await?;
    assert_eq!(options.len(), 0);

    let results = optimization_results::Entity::find().all(&db).await?;
    assert_eq!(results.len(), 0);

    let entries = plan_entries::Entity::find().all(&db).await?;
    assert_eq!(entries.len(), 0);

    let currencies = currencies::Entity::find().all(&db).await?;
    assert_eq!(currencies.len(), 0);

    let invoices = invoices::Entity::find().all(&db).await?;
    assert_eq!(invoices.len(), 0);

    let payments = payments::Entity::find().all(&db).await?;
    assert_eq!(payments.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_project_crud_operations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let project = insert_project(&db, "Test Project").await?;
    assert_eq!(project.name, "Test Project");

    // Read project
    let found_project = projects::Entity::find_by_id(project.id)
        .one(&db)
        .await?
        .expect("Project should exist");

    assert_eq!(found_project.id, project.id);
    assert_eq!(found_project.name, "Test Project");

    // Update project
    let mut project_update: projects::ActiveModel = found_project.into();
    project_update.name = Set("Updated Test Project".to_string());

    let updated_project = project_update.update(&db).await?;
    assert_eq!(updated_project.name, "Updated Test Project");

    // Delete project
    projects::Entity::delete_by_id(updated_project.id)
        .exec(&db)
        .await?;

    let deleted_project = projects::Entity::find_by_id(updated_project.id)
        .one(&db)
        .await?;

    assert!(deleted_project.is_none());

    Ok(())
}

#[tokio::test]
async fn test_result_rows_convert_to_records() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let project = insert_project(&db, "Conversion Project").await?;

    let now = Utc::now();
    let row = optimization_results::ActiveModel {
        project_id: Set(project.id),
        run_id: Set("run-a".to_string()),
        run_timestamp: Set(now),
        item_code: Set("TRF-110".to_string()),
        procurement_option_id: Set(1),
        purchase_time: Set(1),
        delivery_time: Set(3),
        quantity: Set(2.0),
        final_cost: Set(336_000.0),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let record = row.to_record();
    assert_eq!(record.id, i64::from(row.id));
    assert_eq!(record.run_id, "run-a");
    assert_eq!(record.final_cost.as_f64(), 336_000.0);

    Ok(())
}

#[tokio::test]
async fn test_procurement_data_relationships() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let project = insert_project(&db, "Relationship Project").await?;
    let now = Utc::now();

    let option = procurement_options::ActiveModel {
        project_id: Set(project.id),
        item_code: Set("SWG-36".to_string()),
        supplier_name: Set("Arcadia Switchgear".to_string()),
        base_cost: Set(39_900.0),
        currency_code: Set("EUR".to_string()),
        lomc_lead_time: Set(14),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    optimization_results::ActiveModel {
        project_id: Set(project.id),
        run_id: Set("run-b".to_string()),
        run_timestamp: Set(now),
        item_code: Set("SWG-36".to_string()),
        procurement_option_id: Set(option.id),
        purchase_time: Set(2),
        delivery_time: Set(4),
        quantity: Set(6.0),
        final_cost: Set(option.cost_for_quantity(6.0)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    plan_entries::ActiveModel {
        project_id: Set(project.id),
        run_id: Set("run-b".to_string()),
        item_code: Set("SWG-36".to_string()),
        procurement_option_id: Set(option.id),
        quantity: Set(6.0),
        purchase_time: Set(2),
        delivery_time: Set(4),
        final_cost: Set(239_400.0),
        delivery_status: Set("pending".to_string()),
        invoiced: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    // Cascade delete: removing the project removes its dependents
    projects::Entity::delete_by_id(project.id).exec(&db).await?;

    let remaining_options = procurement_options::Entity::find()
        .filter(procurement_options::Column::ProjectId.eq(project.id))
        .all(&db)
        .await?;
    assert_eq!(remaining_options.len(), 0);

    let remaining_results = optimization_results::Entity::find()
        .filter(optimization_results::Column::ProjectId.eq(project.id))
        .all(&db)
        .await?;
    assert_eq!(remaining_results.len(), 0);

    let remaining_entries = plan_entries::Entity::find()
        .filter(plan_entries::Column::ProjectId.eq(project.id))
        .all(&db)
        .await?;
    assert_eq!(remaining_entries.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_invoice_payment_cascade() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let project = insert_project(&db, "Invoice Project").await?;
    let now = Utc::now();

    let invoice = invoices::ActiveModel {
        project_id: Set(project.id),
        supplier_name: Set("Meridian Cables".to_string()),
        amount: Set(1_000.0),
        currency_code: Set("USD".to_string()),
        status: Set("issued".to_string()),
        issue_date: Set(now),
        due_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    payments::ActiveModel {
        invoice_id: Set(invoice.id),
        amount: Set(400.0),
        paid_at: Set(now),
        method: Set(Some("wire".to_string())),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    assert_eq!(invoice.balance(400.0), 600.0);

    invoices::Entity::delete_by_id(invoice.id).exec(&db).await?;

    let remaining_payments = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice.id))
        .all(&db)
        .await?;
    assert_eq!(remaining_payments.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_seed_data_is_idempotent() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    procura::database::seed_data::create_example_project(&db).await?;
    procura::database::seed_data::create_example_project(&db).await?;

    let projects = projects::Entity::find().all(&db).await?;
    assert_eq!(projects.len(), 1);

    let results = optimization_results::Entity::find().all(&db).await?;
    assert_eq!(results.len(), 3);

    Ok(())
}
