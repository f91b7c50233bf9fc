//! Migration: categories, their service index, and services.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Categories::Description).string_len(500).null())
                    .col(ColumnDef::new(Categories::Icon).string().null())
                    .col(
                        ColumnDef::new(Categories::ChildMode)
                            .string_len(16)
                            .not_null()
                            .default("referenced"),
                    )
                    .col(ColumnDef::new(Categories::Subcategories).json().not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Category-owned index of service ids; may lag behind services until reconciled.
        manager
            .create_table(
                Table::create()
                    .table(CategoryServiceRefs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CategoryServiceRefs::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(CategoryServiceRefs::ServiceId).uuid().not_null())
                    .col(
                        ColumnDef::new(CategoryServiceRefs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CategoryServiceRefs::CategoryId)
                            .col(CategoryServiceRefs::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_service_refs_category")
                            .from(CategoryServiceRefs::Table, CategoryServiceRefs::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No foreign key: services keep their category_id after the category is deleted.
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Services::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Services::Description).string_len(1000).not_null())
                    .col(ColumnDef::new(Services::LongDescription).text().null())
                    .col(ColumnDef::new(Services::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Services::Icon).string().null())
                    .col(ColumnDef::new(Services::BasePrice).double().not_null())
                    .col(ColumnDef::new(Services::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Services::PercentageCharge).double().null())
                    .col(ColumnDef::new(Services::AdditionalFees).json().not_null())
                    .col(ColumnDef::new(Services::PricingNotes).text().null())
                    .col(ColumnDef::new(Services::Locations).json().not_null())
                    .col(ColumnDef::new(Services::Tags).json().not_null())
                    .col(
                        ColumnDef::new(Services::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Services::Popular)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_category_id")
                    .table(Services::Table)
                    .col(Services::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_active_popular")
                    .table(Services::Table)
                    .col(Services::IsActive)
                    .col(Services::Popular)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CategoryServiceRefs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    Icon,
    ChildMode,
    Subcategories,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CategoryServiceRefs {
    Table,
    CategoryId,
    ServiceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Title,
    Description,
    LongDescription,
    CategoryId,
    Icon,
    BasePrice,
    Currency,
    PercentageCharge,
    AdditionalFees,
    PricingNotes,
    Locations,
    Tags,
    IsActive,
    Popular,
    CreatedAt,
    UpdatedAt,
}
