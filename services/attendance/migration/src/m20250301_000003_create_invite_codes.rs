use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InviteCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InviteCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InviteCodes::Code).string_len(16).not_null())
                    .col(ColumnDef::new(InviteCodes::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(InviteCodes::IssuedBy).uuid())
                    .col(
                        ColumnDef::new(InviteCodes::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::OneTimeUse)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: short codes are reused once earlier rows expire.
        manager
            .create_index(
                Index::create()
                    .table(InviteCodes::Table)
                    .col(InviteCodes::Code)
                    .col(InviteCodes::ExpiresAt)
                    .name("idx_invite_codes_code_expires_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(InviteCodes::Table)
                    .col(InviteCodes::IssuedBy)
                    .name("idx_invite_codes_issued_by")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InviteCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum InviteCodes {
    Table,
    Id,
    Code,
    Kind,
    IssuedBy,
    IssuedAt,
    ExpiresAt,
    OneTimeUse,
    Used,
}
