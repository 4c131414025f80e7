//! Migration: Create the concerts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Concerts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Concerts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Concerts::Name).string().not_null())
                    .col(ColumnDef::new(Concerts::Description).string().null())
                    .col(ColumnDef::new(Concerts::MaxSeats).integer().not_null())
                    .col(ColumnDef::new(Concerts::Status).string().not_null())
                    .col(
                        ColumnDef::new(Concerts::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Concerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Concerts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for listing non-deleted concerts
        manager
            .create_index(
                Index::create()
                    .name("idx_concerts_deleted")
                    .table(Concerts::Table)
                    .col(Concerts::Deleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_concerts_deleted")
                    .table(Concerts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Concerts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Concerts {
    Table,
    Id,
    Name,
    Description,
    MaxSeats,
    Status,
    Deleted,
    CreatedAt,
    UpdatedAt,
}
