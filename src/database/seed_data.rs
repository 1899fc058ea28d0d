use anyhow::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::database::entities::{
    currencies, items, optimization_results, procurement_options, project_items, projects,
};

pub async fn create_example_project(db: &DatabaseConnection) -> Result<()> {
    // First check if example project already exists
    let existing_project = projects::Entity::find()
        .filter(projects::Column::Name.eq("Substation Retrofit Example"))
        .one(db)
        .await?;

    if existing_project.is_some() {
        info!("Example project already exists, skipping seed data creation");
        return Ok(());
    }

    info!("Creating example project: Substation Retrofit");

    let now = Utc::now();
    let project = projects::ActiveModel {
        name: Set("Substation Retrofit Example".to_string()),
        description: Set(Some(
            "A worked procurement example: three electrical items, competing supplier \
             options in two currencies, and one optimization run ready for plan editing."
                .to_string(),
        )),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let project_result = projects::Entity::insert(project).exec(db).await?;
    let project_id = project_result.last_insert_id;

    info!("Created project with ID: {}", project_id);

    create_example_currencies(db).await?;
    create_example_items(db, project_id).await?;
    let option_ids = create_example_options(db, project_id).await?;
    create_example_run(db, project_id, &option_ids).await?;

    info!("Successfully created all example data for project {}", project_id);
    Ok(())
}

async fn create_example_currencies(db: &DatabaseConnection) -> Result<()> {
    info!("Creating example currencies...");

    let currencies_data = vec![
        ("USD", "US Dollar", 1.0),
        ("EUR", "Euro", 1.08),
    ];

    for (code, name, rate) in currencies_data {
        let existing = currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }
        currencies::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            rate_to_base: Set(rate),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn create_example_items(db: &DatabaseConnection, project_id: i32) -> Result<()> {
    info!("Creating example items...");

    let items_data = vec![
        ("TRF-110", "110kV Transformer", "unit", Some("power")),
        ("CBL-XLPE", "XLPE Cable Drum", "drum", Some("cabling")),
        ("SWG-36", "36kV Switchgear Panel", "panel", Some("switchgear")),
    ];

    let now = Utc::now();
    for (code, name, unit, category) in &items_data {
        items::ActiveModel {
            item_code: Set(code.to_string()),
            name: Set(name.to_string()),
            unit: Set(unit.to_string()),
            category: Set(category.map(|c| c.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let demand_data = vec![("TRF-110", 2.0, 3), ("CBL-XLPE", 14.0, 2), ("SWG-36", 6.0, 4)];
    for (code, quantity, need_time) in demand_data {
        project_items::ActiveModel {
            project_id: Set(project_id),
            item_code: Set(code.to_string()),
            quantity: Set(quantity),
            need_time: Set(need_time),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn create_example_options(db: &DatabaseConnection, project_id: i32) -> Result<Vec<i32>> {
    info!("Creating example procurement options...");

    let options_data = vec![
        ("TRF-110", "Helios Transformers", 182_500.0, "USD", 16),
        ("TRF-110", "Nordwind Energie", 168_000.0, "EUR", 22),
        ("CBL-XLPE", "Meridian Cables", 9_400.0, "USD", 6),
        ("SWG-36", "Helios Transformers", 41_750.0, "USD", 10),
        ("SWG-36", "Arcadia Switchgear", 39_900.0, "EUR", 14),
    ];

    let now = Utc::now();
    let mut option_ids = Vec::new();
    for (item_code, supplier, base_cost, currency, lead_time) in options_data {
        let option = procurement_options::ActiveModel {
            project_id: Set(project_id),
            item_code: Set(item_code.to_string()),
            supplier_name: Set(supplier.to_string()),
            base_cost: Set(base_cost),
            currency_code: Set(currency.to_string()),
            lomc_lead_time: Set(lead_time),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        option_ids.push(option.id);
    }

    Ok(option_ids)
}

async fn create_example_run(
    db: &DatabaseConnection,
    project_id: i32,
    option_ids: &[i32],
) -> Result<()> {
    info!("Creating example optimization run...");

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now();

    // One decision per item, cheapest active option, quantity from demand.
    let decisions = vec![
        ("TRF-110", option_ids[1], 2.0, 168_000.0 * 2.0, 1, 3),
        ("CBL-XLPE", option_ids[2], 14.0, 9_400.0 * 14.0, 1, 2),
        ("SWG-36", option_ids[4], 6.0, 39_900.0 * 6.0, 2, 4),
    ];

    for (item_code, option_id, quantity, final_cost, purchase_time, delivery_time) in decisions {
        optimization_results::ActiveModel {
            project_id: Set(project_id),
            run_id: Set(run_id.clone()),
            run_timestamp: Set(run_timestamp),
            item_code: Set(item_code.to_string()),
            procurement_option_id: Set(option_id),
            purchase_time: Set(purchase_time),
            delivery_time: Set(delivery_time),
            quantity: Set(quantity),
            final_cost: Set(final_cost),
            created_at: Set(run_timestamp),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!("Created optimization run {}", run_id);
    Ok(())
}
