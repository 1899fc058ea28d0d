use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{
    plan_entries, plan_entries::Entity as PlanEntries, plan_entries::is_valid_delivery_status,
};
use crate::reconcile::{DraftPlan, ResultRecord, RunGroup};
use crate::services::ResultsService;

/// A client's unsaved reconciler state, shipped in one piece for a preview or
/// a save round-trip: full-record edits, removed baseline ids, and drafted
/// rows carrying their negative placeholder ids.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PlanChangeSet {
    #[serde(default)]
    pub edits: Vec<ResultRecord>,
    #[serde(default)]
    pub removed: Vec<i64>,
    #[serde(default)]
    pub additions: Vec<ResultRecord>,
}

impl PlanChangeSet {
    /// Rebuild the reconciler state this change set describes. Additions go
    /// through `commit_draft`, so a non-negative id in `additions` degrades
    /// to an edit exactly as the dialog-save flow does.
    pub fn to_draft_plan(&self) -> DraftPlan {
        let mut plan = DraftPlan::new();
        for record in &self.edits {
            plan.apply_edit(record.id, record.clone());
        }
        for id in &self.removed {
            plan.mark_removed(*id);
        }
        for record in &self.additions {
            plan.commit_draft(record.clone());
        }
        plan
    }
}

pub struct PlanService {
    db: DatabaseConnection,
}

impl PlanService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reconcile a change set against the current baseline without touching
    /// any stored state.
    pub async fn preview(
        &self,
        project_id: i32,
        change_set: &PlanChangeSet,
    ) -> Result<IndexMap<String, RunGroup>> {
        let results_service = ResultsService::new(self.db.clone());
        let baseline = results_service.baseline(project_id).await?;
        Ok(change_set.to_draft_plan().reconcile(&baseline))
    }

    /// Persist the effective set for one run: reconcile the change set over
    /// the current baseline, then replace that run's plan entries in a single
    /// transaction. On any failure the previous entries survive untouched and
    /// the caller keeps its change set for a retry.
    pub async fn save_plan(
        &self,
        project_id: i32,
        run_id: &str,
        change_set: &PlanChangeSet,
    ) -> Result<Vec<plan_entries::Model>> {
        let results_service = ResultsService::new(self.db.clone());
        let baseline = results_service.baseline(project_id).await?;

        let mut groups = change_set.to_draft_plan().reconcile(&baseline);
        let group = groups
            .shift_remove(run_id)
            .ok_or_else(|| anyhow::anyhow!("run {} has no results to save", run_id))?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        PlanEntries::delete_many()
            .filter(plan_entries::Column::ProjectId.eq(project_id))
            .filter(plan_entries::Column::RunId.eq(run_id))
            .exec(&txn)
            .await?;

        let mut saved = Vec::with_capacity(group.records.len());
        for record in &group.records {
            let entry = plan_entries::ActiveModel {
                project_id: Set(project_id),
                run_id: Set(run_id.to_string()),
                item_code: Set(record.item_code.clone()),
                procurement_option_id: Set(record.procurement_option_id),
                quantity: Set(record.quantity),
                purchase_time: Set(record.purchase_time),
                delivery_time: Set(record.delivery_time),
                final_cost: Set(record.final_cost.as_f64()),
                delivery_status: Set("pending".to_string()),
                invoiced: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            saved.push(entry);
        }

        txn.commit().await?;

        info!(
            "Saved plan for run {}: {} entries, total cost {:.2}",
            run_id,
            saved.len(),
            group.total_cost
        );
        Ok(saved)
    }

    pub async fn entries(&self, project_id: i32) -> Result<Vec<plan_entries::Model>> {
        let entries = PlanEntries::find()
            .filter(plan_entries::Column::ProjectId.eq(project_id))
            .order_by_asc(plan_entries::Column::Id)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Delivery tracking: move one plan entry through
    /// pending -> ordered -> delivered. Any valid status can be set directly;
    /// the progression is a convention, not a state machine.
    pub async fn set_delivery_status(
        &self,
        entry_id: i32,
        status: &str,
    ) -> Result<Option<plan_entries::Model>> {
        if !is_valid_delivery_status(status) {
            anyhow::bail!("invalid delivery status: {}", status);
        }

        let Some(entry) = PlanEntries::find_by_id(entry_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut entry: plan_entries::ActiveModel = entry.into();
        entry.delivery_status = Set(status.to_string());
        entry.updated_at = Set(Utc::now());

        Ok(Some(entry.update(&self.db).await?))
    }

    /// Mark a plan entry as covered by an invoice.
    pub async fn set_invoiced(
        &self,
        entry_id: i32,
        invoiced: bool,
    ) -> Result<Option<plan_entries::Model>> {
        let Some(entry) = PlanEntries::find_by_id(entry_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut entry: plan_entries::ActiveModel = entry.into();
        entry.invoiced = Set(invoiced);
        entry.updated_at = Set(Utc::now());

        Ok(Some(entry.update(&self.db).await?))
    }
}
