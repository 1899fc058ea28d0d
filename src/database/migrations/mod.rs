use sea_orm_migration::prelude::*;

mod m001_create_tables;
mod m002_plan_entries;
mod m003_invoices_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_tables::Migration),
            Box::new(m002_plan_entries::Migration),
            Box::new(m003_invoices_payments::Migration),
        ]
    }
}
