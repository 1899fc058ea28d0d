use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::reconcile::{CostField, ResultRecord};

/// Decision row produced by one optimization run. Rows are the server
/// baseline the draft-plan reconciler projects local changes over; they are
/// never mutated by plan edits, only replaced wholesale when a run is
/// re-executed or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "optimization_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub run_id: String,
    pub run_timestamp: ChronoDateTimeUtc,
    pub item_code: String,
    pub procurement_option_id: i32,
    pub purchase_time: i32,
    pub delivery_time: i32,
    pub quantity: f64,
    pub final_cost: f64,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Wire/reconciler representation of this row. Stored costs are always
    /// numeric; the string-tolerant side of `CostField` only matters for
    /// records arriving from clients.
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            id: i64::from(self.id),
            run_id: self.run_id.clone(),
            run_timestamp: self.run_timestamp,
            project_id: self.project_id,
            item_code: self.item_code.clone(),
            procurement_option_id: self.procurement_option_id,
            purchase_time: self.purchase_time,
            delivery_time: self.delivery_time,
            quantity: self.quantity,
            final_cost: CostField::Number(self.final_cost),
        }
    }
}
