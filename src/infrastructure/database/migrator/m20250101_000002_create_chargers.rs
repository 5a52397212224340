//! Create chargers table migration

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_partners::Partners;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chargers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chargers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Chargers::ChargerId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Chargers::PartnerId).integer().not_null())
                    .col(ColumnDef::new(Chargers::Name).string_len(255).null())
                    .col(
                        ColumnDef::new(Chargers::Status)
                            .string_len(20)
                            .not_null()
                            .default("UNKNOWN"),
                    )
                    .col(ColumnDef::new(Chargers::Location).text().null())
                    .col(ColumnDef::new(Chargers::Configuration).text().null())
                    .col(
                        ColumnDef::new(Chargers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Chargers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chargers_partner_id")
                            .from(Chargers::Table, Chargers::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chargers_partner_charger")
                    .table(Chargers::Table)
                    .col(Chargers::PartnerId)
                    .col(Chargers::ChargerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chargers_status")
                    .table(Chargers::Table)
                    .col(Chargers::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chargers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Chargers {
    Table,
    Id,
    ChargerId,
    PartnerId,
    Name,
    Status,
    Location,
    Configuration,
    CreatedAt,
    UpdatedAt,
}
