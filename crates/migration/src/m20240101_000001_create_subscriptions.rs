//! Create `subscriptions` table.
//! One row per subscription; month periods are stored as the first day of the month.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(uuid(Subscriptions::Id).primary_key())
                    .col(string_len(Subscriptions::ServiceName, 255).not_null())
                    .col(
                        integer(Subscriptions::Price)
                            .not_null()
                            .check(Expr::col(Subscriptions::Price).gte(0)),
                    )
                    .col(uuid(Subscriptions::UserId).not_null())
                    .col(date(Subscriptions::StartDate).not_null())
                    .col(date_null(Subscriptions::EndDate))
                    .col(timestamp_with_time_zone(Subscriptions::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscriptions::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}
