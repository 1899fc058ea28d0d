use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Name).text().not_null())
                    .col(ColumnDef::new(Projects::Description).text())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::ItemCode).text().not_null().unique_key())
                    .col(ColumnDef::new(Items::Name).text().not_null())
                    .col(ColumnDef::new(Items::Unit).text().not_null())
                    .col(ColumnDef::new(Items::Category).text())
                    .col(ColumnDef::new(Items::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Items::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectItems::ProjectId).integer().not_null())
                    .col(ColumnDef::new(ProjectItems::ItemCode).text().not_null())
                    .col(ColumnDef::new(ProjectItems::Quantity).double().not_null())
                    .col(ColumnDef::new(ProjectItems::NeedTime).integer().not_null().default(1))
                    .col(ColumnDef::new(ProjectItems::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ProjectItems::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_items_project_id")
                            .from(ProjectItems::Table, ProjectItems::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProcurementOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProcurementOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProcurementOptions::ProjectId).integer().not_null())
                    .col(ColumnDef::new(ProcurementOptions::ItemCode).text().not_null())
                    .col(ColumnDef::new(ProcurementOptions::SupplierName).text().not_null())
                    .col(ColumnDef::new(ProcurementOptions::BaseCost).double().not_null())
                    .col(
                        ColumnDef::new(ProcurementOptions::CurrencyCode)
                            .text()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(ProcurementOptions::LomcLeadTime)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcurementOptions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ProcurementOptions::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ProcurementOptions::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_procurement_options_project_id")
                            .from(ProcurementOptions::Table, ProcurementOptions::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OptimizationResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OptimizationResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OptimizationResults::ProjectId).integer().not_null())
                    .col(ColumnDef::new(OptimizationResults::RunId).text().not_null())
                    .col(
                        ColumnDef::new(OptimizationResults::RunTimestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OptimizationResults::ItemCode).text().not_null())
                    .col(
                        ColumnDef::new(OptimizationResults::ProcurementOptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OptimizationResults::PurchaseTime)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(OptimizationResults::DeliveryTime)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(OptimizationResults::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(OptimizationResults::FinalCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(OptimizationResults::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_optimization_results_project_id")
                            .from(OptimizationResults::Table, OptimizationResults::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Currencies::Code).text().not_null().unique_key())
                    .col(ColumnDef::new(Currencies::Name).text().not_null())
                    .col(
                        ColumnDef::new(Currencies::RateToBase)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Currencies::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_optimization_results_project_id")
                    .table(OptimizationResults::Table)
                    .col(OptimizationResults::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_optimization_results_run_id")
                    .table(OptimizationResults::Table)
                    .col(OptimizationResults::RunId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_procurement_options_item_code")
                    .table(ProcurementOptions::Table)
                    .col(ProcurementOptions::ItemCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OptimizationResults::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProcurementOptions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProjectItems::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    ItemCode,
    Name,
    Unit,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProjectItems {
    Table,
    Id,
    ProjectId,
    ItemCode,
    Quantity,
    NeedTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProcurementOptions {
    Table,
    Id,
    ProjectId,
    ItemCode,
    SupplierName,
    BaseCost,
    CurrencyCode,
    LomcLeadTime,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OptimizationResults {
    Table,
    Id,
    ProjectId,
    RunId,
    RunTimestamp,
    ItemCode,
    ProcurementOptionId,
    PurchaseTime,
    DeliveryTime,
    Quantity,
    FinalCost,
    CreatedAt,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
    Code,
    Name,
    RateToBase,
    UpdatedAt,
}
