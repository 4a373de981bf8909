use sea_orm_migration::prelude::*;

mod m20250301_000001_create_schedules;
mod m20250301_000002_create_group_members;
mod m20250301_000003_create_invite_codes;
mod m20250301_000004_create_checkin_credentials;
mod m20250301_000005_create_attendances;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_schedules::Migration),
            Box::new(m20250301_000002_create_group_members::Migration),
            Box::new(m20250301_000003_create_invite_codes::Migration),
            Box::new(m20250301_000004_create_checkin_credentials::Migration),
            Box::new(m20250301_000005_create_attendances::Migration),
        ]
    }
}
