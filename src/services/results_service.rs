use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::database::entities::{
    optimization_results, optimization_results::Entity as OptimizationResults,
    procurement_options, procurement_options::Entity as ProcurementOptions,
};
use crate::reconcile::{DraftPlan, ResultRecord, RunGroup};

/// One decision submitted when registering a new optimization run. The final
/// cost is not accepted from the caller; it is derived from the selected
/// option's base cost and the quantity.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RunDecision {
    pub item_code: String,
    pub procurement_option_id: i32,
    pub quantity: f64,
    pub purchase_time: i32,
    pub delivery_time: i32,
}

pub struct ResultsService {
    db: DatabaseConnection,
}

impl ResultsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Server baseline for a project in fetch order, as reconciler records.
    pub async fn baseline(&self, project_id: i32) -> Result<Vec<ResultRecord>> {
        let rows = OptimizationResults::find()
            .filter(optimization_results::Column::ProjectId.eq(project_id))
            .order_by_asc(optimization_results::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.iter().map(|row| row.to_record()).collect())
    }

    /// Baseline grouped by run with no local changes applied.
    pub async fn grouped(&self, project_id: i32) -> Result<IndexMap<String, RunGroup>> {
        let baseline = self.baseline(project_id).await?;
        Ok(DraftPlan::new().reconcile(&baseline))
    }

    /// Register a new optimization run. Each decision is costed against its
    /// procurement option; decisions referencing foreign or missing options
    /// are rejected as a whole.
    pub async fn create_run(
        &self,
        project_id: i32,
        decisions: &[RunDecision],
    ) -> Result<(String, Vec<optimization_results::Model>)> {
        let run_id = Uuid::new_v4().to_string();
        let run_timestamp = Utc::now();

        let mut inserted = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let option = ProcurementOptions::find_by_id(decision.procurement_option_id)
                .filter(procurement_options::Column::ProjectId.eq(project_id))
                .one(&self.db)
                .await?
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "procurement option {} not found in project {}",
                        decision.procurement_option_id,
                        project_id
                    )
                })?;

            let row = optimization_results::ActiveModel {
                project_id: Set(project_id),
                run_id: Set(run_id.clone()),
                run_timestamp: Set(run_timestamp),
                item_code: Set(decision.item_code.clone()),
                procurement_option_id: Set(option.id),
                purchase_time: Set(decision.purchase_time),
                delivery_time: Set(decision.delivery_time),
                quantity: Set(decision.quantity),
                final_cost: Set(option.cost_for_quantity(decision.quantity)),
                created_at: Set(run_timestamp),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            inserted.push(row);
        }

        info!(
            "Registered optimization run {} with {} decisions",
            run_id,
            inserted.len()
        );
        Ok((run_id, inserted))
    }

    /// Delete every result row of one run. Returns the number of rows gone;
    /// an unknown run deletes nothing and is not an error.
    pub async fn delete_run(&self, project_id: i32, run_id: &str) -> Result<u64> {
        let outcome = OptimizationResults::delete_many()
            .filter(optimization_results::Column::ProjectId.eq(project_id))
            .filter(optimization_results::Column::RunId.eq(run_id))
            .exec(&self.db)
            .await?;

        info!("Deleted {} result rows for run {}", outcome.rows_affected, run_id);
        Ok(outcome.rows_affected)
    }
}
