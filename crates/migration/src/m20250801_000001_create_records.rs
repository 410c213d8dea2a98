//! Create `records` table.
//! One row per user subscription: service, monthly price, owner and validity window.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Records::Table)
                    .if_not_exists()
                    .col(big_integer(Records::Id).primary_key().auto_increment())
                    .col(string_len(Records::ServiceName, 255).not_null())
                    .col(
                        integer(Records::Price)
                            .not_null()
                            .check(Expr::col(Records::Price).gte(0)),
                    )
                    .col(string_len(Records::UserId, 255).not_null())
                    .col(
                        timestamp_with_time_zone(Records::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone(Records::ExpiresAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Records::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Records {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    CreatedAt,
    ExpiresAt,
}
