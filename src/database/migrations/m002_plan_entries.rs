use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlanEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanEntries::ProjectId).integer().not_null())
                    .col(ColumnDef::new(PlanEntries::RunId).text().not_null())
                    .col(ColumnDef::new(PlanEntries::ItemCode).text().not_null())
                    .col(
                        ColumnDef::new(PlanEntries::ProcurementOptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlanEntries::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(PlanEntries::PurchaseTime)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PlanEntries::DeliveryTime)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PlanEntries::FinalCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PlanEntries::DeliveryStatus)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(PlanEntries::Invoiced)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PlanEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PlanEntries::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_entries_project_id")
                            .from(PlanEntries::Table, PlanEntries::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_entries_project_id")
                    .table(PlanEntries::Table)
                    .col(PlanEntries::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_entries_run_id")
                    .table(PlanEntries::Table)
                    .col(PlanEntries::RunId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlanEntries::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum PlanEntries {
    Table,
    Id,
    ProjectId,
    RunId,
    ItemCode,
    ProcurementOptionId,
    Quantity,
    PurchaseTime,
    DeliveryTime,
    FinalCost,
    DeliveryStatus,
    Invoiced,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
}
