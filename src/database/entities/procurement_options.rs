use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One way to buy an item: a supplier quote with unit cost and lead time.
/// The option catalog seeds draft defaults and is the basis for recomputing
/// `final_cost` when quantity or option selection changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "procurement_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub item_code: String,
    pub supplier_name: String,
    pub base_cost: f64,
    pub currency_code: String,
    pub lomc_lead_time: i32,
    pub is_active: bool,
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

impl Model {
    /// Cost of buying `quantity` units through this option.
    pub fn cost_for_quantity(&self, quantity: f64) -> f64 {
        self.base_cost * quantity
    }
}
