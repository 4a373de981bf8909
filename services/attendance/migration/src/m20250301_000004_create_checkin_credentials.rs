use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckinCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckinCredentials::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckinCredentials::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(CheckinCredentials::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckinCredentials::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CheckinCredentials::RedeemedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(CheckinCredentials::Table)
                    .col(CheckinCredentials::OwnerId)
                    .name("idx_checkin_credentials_owner_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckinCredentials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CheckinCredentials {
    Table,
    Id,
    OwnerId,
    IssuedAt,
    ExpiresAt,
    RedeemedAt,
}
