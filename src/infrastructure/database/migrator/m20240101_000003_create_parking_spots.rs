//! Create parking_spots table
//!
//! Spot codes are unique within a community. There is deliberately no
//! status column; availability comes from the bookings table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_communities::Communities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSpots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSpots::Code).string_len(64).not_null())
                    .col(ColumnDef::new(ParkingSpots::CommunityId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spots_community")
                            .from(ParkingSpots::Table, ParkingSpots::CommunityId)
                            .to(Communities::Table, Communities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_parking_spots_community_code")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::CommunityId)
                    .col(ParkingSpots::Code)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpots {
    Table,
    Id,
    Code,
    CommunityId,
}
