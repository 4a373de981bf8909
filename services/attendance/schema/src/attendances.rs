use sea_orm::entity::prelude::*;

/// One row per (user, schedule). Seeded by eligibility sync, never deleted by check-in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    /// `pending` | `present` | `late` | `absent` | `excused`
    pub status: String,
    /// `credential` | `manual` | `unset`
    pub method: String,
    pub note: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedules::Entity",
        from = "Column::ScheduleId",
        to = "super::schedules::Column::Id",
        on_delete = "Cascade"
    )]
    Schedule,
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
