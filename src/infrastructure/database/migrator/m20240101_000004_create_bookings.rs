//! Create bookings table
//!
//! The composite index backs the overlap existence check
//! (spot, status, start, end).

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_residents::Residents;
use super::m20240101_000003_create_parking_spots::ParkingSpots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::ResidentId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::SpotId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(16)
                            .not_null()
                            .default("RESERVED"),
                    )
                    .col(ColumnDef::new(Bookings::ActualStartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::ActualEndTime).timestamp_with_time_zone())
                    .check(Expr::col(Bookings::StartTime).lt(Expr::col(Bookings::EndTime)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_resident")
                            .from(Bookings::Table, Bookings::ResidentId)
                            .to(Residents::Table, Residents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_spot")
                            .from(Bookings::Table, Bookings::SpotId)
                            .to(ParkingSpots::Table, ParkingSpots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_spot_window")
                    .table(Bookings::Table)
                    .col(Bookings::SpotId)
                    .col(Bookings::Status)
                    .col(Bookings::StartTime)
                    .col(Bookings::EndTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_resident")
                    .table(Bookings::Table)
                    .col(Bookings::ResidentId)
                    .col(Bookings::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    ResidentId,
    SpotId,
    StartTime,
    EndTime,
    Status,
    ActualStartTime,
    ActualEndTime,
}
