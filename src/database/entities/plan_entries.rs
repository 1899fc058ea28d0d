use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Simplified to String for now - will improve to enum later
pub type DeliveryStatus = String;

pub const DELIVERY_STATUSES: [&str; 3] = ["pending", "ordered", "delivered"];

pub fn is_valid_delivery_status(status: &str) -> bool {
    DELIVERY_STATUSES.contains(&status)
}

/// Persisted effective decision set for a run: what "save plan" writes after
/// the reconciler has applied edits, removals and drafts to the baseline.
/// Delivery tracking happens on these rows, not on optimization results.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub run_id: String,
    pub item_code: String,
    pub procurement_option_id: i32,
    pub quantity: f64,
    pub purchase_time: i32,
    pub delivery_time: i32,
    pub final_cost: f64,
    pub delivery_status: DeliveryStatus,
    pub invoiced: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
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
