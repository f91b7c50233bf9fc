//! Migration: providers, clients and their request/rating lists.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Providers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Providers::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Providers::Name).string().not_null())
                    .col(ColumnDef::new(Providers::Email).string().null())
                    .col(ColumnDef::new(Providers::Phone).string().null())
                    .col(ColumnDef::new(Providers::Address).string().null())
                    .col(ColumnDef::new(Providers::Witnesses).json().not_null())
                    .col(
                        ColumnDef::new(Providers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProviderServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderServiceRequests::RequestId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::ProviderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::ServiceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::ClientId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::RequestDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ProviderServiceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_service_requests_provider")
                            .from(
                                ProviderServiceRequests::Table,
                                ProviderServiceRequests::ProviderId,
                            )
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_service_requests_service_id")
                    .table(ProviderServiceRequests::Table)
                    .col(ProviderServiceRequests::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProviderClientRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderClientRatings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProviderClientRatings::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(ProviderClientRatings::ClientId).string().not_null())
                    .col(ColumnDef::new(ProviderClientRatings::RequestId).uuid().null())
                    .col(ColumnDef::new(ProviderClientRatings::ServiceId).uuid().null())
                    .col(ColumnDef::new(ProviderClientRatings::Rating).integer().not_null())
                    .col(ColumnDef::new(ProviderClientRatings::Review).text().null())
                    .col(
                        ColumnDef::new(ProviderClientRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_client_ratings_provider")
                            .from(ProviderClientRatings::Table, ProviderClientRatings::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string().null())
                    .col(ColumnDef::new(Clients::Phone).string().null())
                    .col(ColumnDef::new(Clients::Address).string().null())
                    .col(ColumnDef::new(Clients::Location).string().null())
                    .col(ColumnDef::new(Clients::IdType).string_len(32).null())
                    .col(ColumnDef::new(Clients::IdNumber).string().null())
                    .col(
                        ColumnDef::new(Clients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientServiceRequests::RequestId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClientServiceRequests::ClientId).uuid().not_null())
                    .col(ColumnDef::new(ClientServiceRequests::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(ClientServiceRequests::ProviderId).uuid().not_null())
                    .col(
                        ColumnDef::new(ClientServiceRequests::ProviderName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientServiceRequests::ProviderContact)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClientServiceRequests::RequestDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientServiceRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ClientServiceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_service_requests_client")
                            .from(ClientServiceRequests::Table, ClientServiceRequests::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientProviderRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientProviderRatings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClientProviderRatings::ClientId).uuid().not_null())
                    .col(ColumnDef::new(ClientProviderRatings::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(ClientProviderRatings::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(ClientProviderRatings::Rating).integer().not_null())
                    .col(ColumnDef::new(ClientProviderRatings::Review).text().null())
                    .col(
                        ColumnDef::new(ClientProviderRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_provider_ratings_client")
                            .from(ClientProviderRatings::Table, ClientProviderRatings::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientProviderRatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClientServiceRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProviderClientRatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProviderServiceRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Address,
    Witnesses,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProviderServiceRequests {
    Table,
    RequestId,
    ProviderId,
    ServiceId,
    ClientId,
    RequestDate,
    Status,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProviderClientRatings {
    Table,
    Id,
    ProviderId,
    ClientId,
    RequestId,
    ServiceId,
    Rating,
    Review,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Address,
    Location,
    IdType,
    IdNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientServiceRequests {
    Table,
    RequestId,
    ClientId,
    ServiceId,
    ProviderId,
    ProviderName,
    ProviderContact,
    RequestDate,
    Status,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProviderRatings {
    Table,
    Id,
    ClientId,
    ProviderId,
    ServiceId,
    Rating,
    Review,
    CreatedAt,
}
