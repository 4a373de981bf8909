use std::collections::HashSet;

use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use rollcall_attendance_schema::{
    attendances, checkin_credentials, group_members, invite_codes, schedules,
};
use rollcall_domain::id::{
    AttendanceId, CredentialId, GroupId, InviteCodeId, ScheduleId, UserId,
};
use rollcall_domain::pagination::PageRequest;
use rollcall_domain::user::UserRole;

use crate::domain::classifier::{LATE_CUTOFF_MINS, SCHEDULE_LOOKUP_MARGIN_MINS};
use crate::domain::repository::{
    AttendanceRepository, CredentialRepository, InviteCodeRepository, MembershipPort,
    ScheduleLookup,
};
use crate::domain::types::{
    AttendanceCounts, AttendanceFilter, AttendanceRecord, AttendanceStatus, CheckinCredential,
    GroupMember, InviteCode, Schedule, ScheduleWindow, nearest_schedule,
};
use crate::error::AttendanceServiceError;

// ── InviteCode repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInviteCodeRepository {
    pub db: DatabaseConnection,
}

impl InviteCodeRepository for DbInviteCodeRepository {
    async fn list_unexpired_codes(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashSet<String>, AttendanceServiceError> {
        let codes = invite_codes::Entity::find()
            .select_only()
            .column(invite_codes::Column::Code)
            .filter(invite_codes::Column::ExpiresAt.gt(now))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list unexpired invite codes")?;
        Ok(codes.into_iter().collect())
    }

    async fn create(&self, invite: &InviteCode) -> Result<(), AttendanceServiceError> {
        invite_codes::ActiveModel {
            id: Set(invite.id.0),
            code: Set(invite.code.clone()),
            kind: Set(invite.kind.as_str().to_owned()),
            issued_by: Set(invite.issued_by.map(Uuid::from)),
            issued_at: Set(invite.issued_at),
            expires_at: Set(invite.expires_at),
            one_time_use: Set(invite.one_time_use),
            used: Set(invite.used),
        }
        .insert(&self.db)
        .await
        .context("insert invite code")?;
        Ok(())
    }

    async fn find_latest_by_code(
        &self,
        code: &str,
    ) -> Result<Option<InviteCode>, AttendanceServiceError> {
        let model = invite_codes::Entity::find()
            .filter(invite_codes::Column::Code.eq(code))
            .order_by_desc(invite_codes::Column::ExpiresAt)
            .order_by_desc(invite_codes::Column::IssuedAt)
            .one(&self.db)
            .await
            .context("find invite code")?;
        model.map(invite_from_model).transpose()
    }

    async fn mark_used(&self, id: InviteCodeId) -> Result<bool, AttendanceServiceError> {
        let result = invite_codes::Entity::update_many()
            .col_expr(invite_codes::Column::Used, Expr::value(true))
            .filter(invite_codes::Column::Id.eq(id.0))
            .filter(invite_codes::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("mark invite code used")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_issuer(
        &self,
        issuer: UserId,
        page: PageRequest,
    ) -> Result<Vec<InviteCode>, AttendanceServiceError> {
        let models = invite_codes::Entity::find()
            .filter(invite_codes::Column::IssuedBy.eq(issuer.0))
            .order_by_desc(invite_codes::Column::IssuedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list invite codes by issuer")?;
        models.into_iter().map(invite_from_model).collect()
    }
}

fn invite_from_model(model: invite_codes::Model) -> Result<InviteCode, AttendanceServiceError> {
    Ok(InviteCode {
        id: InviteCodeId(model.id),
        code: model.code,
        kind: model
            .kind
            .parse()
            .map_err(|_| anyhow!("invite {} has unknown kind {:?}", model.id, model.kind))?,
        issued_by: model.issued_by.map(UserId),
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        one_time_use: model.one_time_use,
        used: model.used,
    })
}

// ── Credential repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCredentialRepository {
    pub db: DatabaseConnection,
}

impl CredentialRepository for DbCredentialRepository {
    async fn create(&self, credential: &CheckinCredential) -> Result<(), AttendanceServiceError> {
        checkin_credentials::ActiveModel {
            id: Set(credential.id.0),
            owner_id: Set(credential.owner_id.0),
            issued_at: Set(credential.issued_at),
            expires_at: Set(credential.expires_at),
            redeemed_at: Set(credential.redeemed_at),
        }
        .insert(&self.db)
        .await
        .context("insert checkin credential")?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CredentialId,
    ) -> Result<Option<CheckinCredential>, AttendanceServiceError> {
        let model = checkin_credentials::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find checkin credential")?;
        Ok(model.map(credential_from_model))
    }

    async fn mark_redeemed(
        &self,
        id: CredentialId,
        at: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError> {
        let result = checkin_credentials::Entity::update_many()
            .col_expr(checkin_credentials::Column::RedeemedAt, Expr::value(at))
            .filter(checkin_credentials::Column::Id.eq(id.0))
            .filter(checkin_credentials::Column::RedeemedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark checkin credential redeemed")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<CheckinCredential>, AttendanceServiceError> {
        let models = checkin_credentials::Entity::find()
            .filter(checkin_credentials::Column::OwnerId.eq(owner.0))
            .order_by_desc(checkin_credentials::Column::IssuedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list checkin credentials by owner")?;
        Ok(models.into_iter().map(credential_from_model).collect())
    }
}

fn credential_from_model(model: checkin_credentials::Model) -> CheckinCredential {
    CheckinCredential {
        id: CredentialId(model.id),
        owner_id: UserId(model.owner_id),
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        redeemed_at: model.redeemed_at,
    }
}

// ── Attendance repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

fn filtered(filter: AttendanceFilter) -> Select<attendances::Entity> {
    let mut query = attendances::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(attendances::Column::UserId.eq(user_id.0));
    }
    if let Some(schedule_id) = filter.schedule_id {
        query = query.filter(attendances::Column::ScheduleId.eq(schedule_id.0));
    }
    if !filter.constrains_schedule() {
        return query;
    }

    query = query.join(JoinType::InnerJoin, attendances::Relation::Schedule.def());
    if let Some(group_id) = filter.group_id {
        query = query.filter(schedules::Column::GroupId.eq(group_id.0));
    }
    if let Some(from) = filter.starts_from() {
        query = query.filter(schedules::Column::StartTime.gte(from));
    }
    if let Some(until) = filter.ends_before() {
        query = query.filter(schedules::Column::EndTime.lt(until));
    }
    query
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find(
        &self,
        user_id: UserId,
        schedule_id: ScheduleId,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let model = attendances::Entity::find()
            .filter(attendances::Column::UserId.eq(user_id.0))
            .filter(attendances::Column::ScheduleId.eq(schedule_id.0))
            .one(&self.db)
            .await
            .context("find attendance")?;
        model.map(attendance_from_model).transpose()
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError> {
        attendances::ActiveModel {
            id: Set(record.id.0),
            status: Set(record.status.as_str().to_owned()),
            method: Set(record.method.as_str().to_owned()),
            note: Set(record.note.clone()),
            updated_at: Set(record.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update attendance")?;
        Ok(())
    }

    async fn list(
        &self,
        filter: AttendanceFilter,
        page: PageRequest,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = filtered(filter)
            .order_by_desc(attendances::Column::UpdatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list attendances")?;
        models.into_iter().map(attendance_from_model).collect()
    }

    async fn count(
        &self,
        filter: AttendanceFilter,
    ) -> Result<AttendanceCounts, AttendanceServiceError> {
        let rows = filtered(filter)
            .select_only()
            .column(attendances::Column::Status)
            .column_as(
                Expr::col((attendances::Entity, attendances::Column::Id)).count(),
                "count",
            )
            .group_by(attendances::Column::Status)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
            .context("count attendances")?;

        let mut counts = AttendanceCounts::default();
        for (status, n) in rows {
            let status: AttendanceStatus = status
                .parse()
                .map_err(|_| anyhow!("attendance row has unknown status {status:?}"))?;
            counts.add(status, u64::try_from(n).unwrap_or_default());
        }
        Ok(counts)
    }

    async fn list_user_ids(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<UserId>, AttendanceServiceError> {
        let ids = attendances::Entity::find()
            .select_only()
            .column(attendances::Column::UserId)
            .filter(attendances::Column::ScheduleId.eq(schedule_id.0))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list attendance user ids")?;
        Ok(ids.into_iter().map(UserId).collect())
    }

    async fn insert_missing(
        &self,
        records: &[AttendanceRecord],
    ) -> Result<u64, AttendanceServiceError> {
        if records.is_empty() {
            return Ok(0);
        }
        let models = records.iter().map(|r| attendances::ActiveModel {
            id: Set(r.id.0),
            user_id: Set(r.user_id.0),
            schedule_id: Set(r.schedule_id.0),
            status: Set(r.status.as_str().to_owned()),
            method: Set(r.method.as_str().to_owned()),
            note: Set(r.note.clone()),
            updated_at: Set(r.updated_at),
        });
        // A concurrent sync may have inserted some of these already; the unique
        // (user_id, schedule_id) index turns those into no-ops.
        let inserted = attendances::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    attendances::Column::UserId,
                    attendances::Column::ScheduleId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert pending attendances")?;
        Ok(inserted)
    }

    async fn remove(
        &self,
        schedule_id: ScheduleId,
        user_ids: &[UserId],
    ) -> Result<u64, AttendanceServiceError> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = attendances::Entity::delete_many()
            .filter(attendances::Column::ScheduleId.eq(schedule_id.0))
            .filter(attendances::Column::UserId.is_in(user_ids.iter().map(|u| u.0)))
            .exec(&self.db)
            .await
            .context("remove stale attendances")?;
        Ok(result.rows_affected)
    }
}

fn attendance_from_model(
    model: attendances::Model,
) -> Result<AttendanceRecord, AttendanceServiceError> {
    Ok(AttendanceRecord {
        id: AttendanceId(model.id),
        user_id: UserId(model.user_id),
        schedule_id: ScheduleId(model.schedule_id),
        status: model
            .status
            .parse()
            .map_err(|_| anyhow!("attendance {} has unknown status {:?}", model.id, model.status))?,
        method: model
            .method
            .parse()
            .map_err(|_| anyhow!("attendance {} has unknown method {:?}", model.id, model.method))?,
        note: model.note,
        updated_at: model.updated_at,
    })
}

// ── Schedule lookup ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbScheduleLookup {
    pub db: DatabaseConnection,
}

impl ScheduleLookup for DbScheduleLookup {
    async fn find_by_id(
        &self,
        id: ScheduleId,
    ) -> Result<Option<Schedule>, AttendanceServiceError> {
        let model = schedules::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find schedule")?;
        Ok(model.map(schedule_from_model))
    }

    async fn find_active_for(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Schedule>, AttendanceServiceError> {
        // Coarse horizon prefilter in SQL; `nearest_schedule` applies the exact bounds.
        let margin = Duration::minutes(SCHEDULE_LOOKUP_MARGIN_MINS);
        let models = schedules::Entity::find()
            .join(JoinType::InnerJoin, schedules::Relation::Attendances.def())
            .filter(attendances::Column::UserId.eq(user_id.0))
            .filter(schedules::Column::StartTime.lte(now + margin))
            .filter(
                Condition::any()
                    .add(schedules::Column::EndTime.gte(now - margin))
                    .add(
                        schedules::Column::StartTime
                            .gte(now - margin - Duration::minutes(LATE_CUTOFF_MINS)),
                    ),
            )
            .all(&self.db)
            .await
            .context("find active schedule")?;
        Ok(nearest_schedule(models.into_iter().map(schedule_from_model), now))
    }

    async fn list_by_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<Schedule>, AttendanceServiceError> {
        let models = schedules::Entity::find()
            .filter(schedules::Column::GroupId.eq(group_id.0))
            .order_by_asc(schedules::Column::StartTime)
            .all(&self.db)
            .await
            .context("list schedules by group")?;
        Ok(models.into_iter().map(schedule_from_model).collect())
    }
}

fn schedule_from_model(model: schedules::Model) -> Schedule {
    Schedule {
        id: ScheduleId(model.id),
        title: model.title,
        window: ScheduleWindow {
            start: model.start_time,
            end: model.end_time,
        },
        group_id: model.group_id.map(GroupId),
    }
}

// ── Membership ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMembershipPort {
    pub db: DatabaseConnection,
}

impl MembershipPort for DbMembershipPort {
    async fn list_members(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupMember>, AttendanceServiceError> {
        let models = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.0))
            .all(&self.db)
            .await
            .context("list group members")?;
        models.into_iter().map(member_from_model).collect()
    }
}

fn member_from_model(model: group_members::Model) -> Result<GroupMember, AttendanceServiceError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .ok_or_else(|| anyhow!("group member {} has unknown role {}", model.user_id, model.role))?;
    Ok(GroupMember {
        user_id: UserId(model.user_id),
        role,
    })
}
