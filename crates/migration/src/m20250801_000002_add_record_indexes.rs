use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_records_user_id")
                    .table(Records::Table)
                    .col(Records::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Listing and period sums scan by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_records_created_at")
                    .table(Records::Table)
                    .col(Records::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_records_user_id").table(Records::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_records_created_at").table(Records::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Records { Table, UserId, CreatedAt }
