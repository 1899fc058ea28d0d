use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Invoices::SupplierName).text().not_null())
                    .col(ColumnDef::new(Invoices::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Invoices::CurrencyCode)
                            .text()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .text()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Invoices::IssueDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Invoices::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Invoices::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_project_id")
                            .from(Invoices::Table, Invoices::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::InvoiceId).integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::PaidAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Payments::Method).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_invoice_id")
                            .from(Payments::Table, Payments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_project_id")
                    .table(Invoices::Table)
                    .col(Invoices::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_invoice_id")
                    .table(Payments::Table)
                    .col(Payments::InvoiceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    ProjectId,
    SupplierName,
    Amount,
    CurrencyCode,
    Status,
    IssueDate,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    InvoiceId,
    Amount,
    PaidAt,
    Method,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
}
