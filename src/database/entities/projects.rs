use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_items::Entity")]
    ProjectItems,
    #[sea_orm(has_many = "super::procurement_options::Entity")]
    ProcurementOptions,
    #[sea_orm(has_many = "super::optimization_results::Entity")]
    OptimizationResults,
    #[sea_orm(has_many = "super::plan_entries::Entity")]
    PlanEntries,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
}

impl Related<super::project_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectItems.def()
    }
}

impl Related<super::procurement_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcurementOptions.def()
    }
}

impl Related<super::optimization_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OptimizationResults.def()
    }
}

impl Related<super::plan_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanEntries.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
