//! Create residents table
//!
//! A resident's email is unique within its community.

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
                    .table(Residents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Residents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Residents::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Residents::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(Residents::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Residents::CommunityId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_residents_community")
                            .from(Residents::Table, Residents::CommunityId)
                            .to(Communities::Table, Communities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_residents_community_email")
                    .table(Residents::Table)
                    .col(Residents::CommunityId)
                    .col(Residents::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Residents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Residents {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    CommunityId,
}
