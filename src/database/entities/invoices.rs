use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Simplified to String for now - will improve to enum later
pub type InvoiceStatus = String;

pub const INVOICE_STATUSES: [&str; 3] = ["draft", "issued", "paid"];

pub fn is_valid_invoice_status(status: &str) -> bool {
    INVOICE_STATUSES.contains(&status)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub supplier_name: String,
    pub amount: f64,
    pub currency_code: String,
    pub status: InvoiceStatus,
    pub issue_date: ChronoDateTimeUtc,
    pub due_date: Option<ChronoDateTimeUtc>,
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
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Outstanding balance given the payments recorded so far.
    pub fn balance(&self, paid: f64) -> f64 {
        self.amount - paid
    }
}
