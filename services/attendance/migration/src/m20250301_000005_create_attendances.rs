use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::ScheduleId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attendances::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Attendances::Method)
                            .string_len(16)
                            .not_null()
                            .default("unset"),
                    )
                    .col(ColumnDef::new(Attendances::Note).text())
                    .col(
                        ColumnDef::new(Attendances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one attendance row per user per schedule.
        manager
            .create_index(
                Index::create()
                    .table(Attendances::Table)
                    .col(Attendances::UserId)
                    .col(Attendances::ScheduleId)
                    .unique()
                    .name("uq_attendances_user_id_schedule_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Attendances::Table)
                    .col(Attendances::ScheduleId)
                    .name("idx_attendances_schedule_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendances {
    Table,
    Id,
    UserId,
    ScheduleId,
    Status,
    Method,
    Note,
    UpdatedAt,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
}
