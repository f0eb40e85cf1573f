use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::entity::round::{self, RoundStatus};
use crate::error::AppError;

/// Round lifecycle operations.
///
/// State transitions are conditional UPDATEs guarded on the current status,
/// checked via `rows_affected`; the partial unique index on `is_active`
/// backstops the single-active-round rule across concurrent processes.
pub struct RoundScheduler<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RoundScheduler<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert a new round in the `scheduled` state with the next round number.
    pub async fn schedule(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<round::Model, AppError> {
        if end_time <= start_time {
            return Err(AppError::InvalidTimeRange(
                "end_time must be after start_time".into(),
            ));
        }

        let round_number = self.max_round_number().await? + 1;

        let model = round::ActiveModel {
            id: Set(Uuid::new_v4()),
            round_number: Set(round_number),
            start_time: Set(start_time),
            end_time: Set(end_time),
            actual_end_time: Set(None),
            status: Set(RoundStatus::Scheduled),
            is_active: Set(false),
            started_by: Set(None),
            ended_by: Set(None),
            notes: Set(notes),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::RoundCreateFailed(e.to_string()))
    }

    /// Transition a scheduled round to `active`.
    ///
    /// Exactly one of two concurrent starts can succeed: the status guard
    /// catches a race on the same round, the unique index a race between
    /// different rounds.
    pub async fn start(&self, round_id: Uuid, started_by: Uuid) -> Result<round::Model, AppError> {
        if self.find_active().await?.is_some() {
            return Err(AppError::RoundAlreadyActive);
        }

        let target = self.find(round_id).await?;
        if target.status != RoundStatus::Scheduled {
            return Err(AppError::RoundNotScheduled);
        }

        let update = round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(true))
            .col_expr(round::Column::Status, Expr::value(RoundStatus::Active))
            .col_expr(round::Column::StartedBy, Expr::value(Some(started_by)))
            .filter(round::Column::Id.eq(round_id))
            .filter(round::Column::Status.eq(RoundStatus::Scheduled))
            .exec(self.conn)
            .await;

        let result = match update {
            Ok(result) => result,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::RoundAlreadyActive);
            }
            Err(e) => return Err(AppError::RoundStartFailed(e.to_string())),
        };

        if result.rows_affected == 0 {
            return Err(AppError::RoundNotScheduled);
        }

        self.find(round_id).await
    }

    /// Transition the active round to `completed`.
    pub async fn end(&self, ended_by: Uuid, notes: Option<String>) -> Result<round::Model, AppError> {
        let active = self.find_active().await?.ok_or(AppError::NoActiveRound)?;

        let update = round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(false))
            .col_expr(round::Column::Status, Expr::value(RoundStatus::Completed))
            .col_expr(round::Column::ActualEndTime, Expr::value(Some(Utc::now())))
            .col_expr(round::Column::EndedBy, Expr::value(Some(ended_by)))
            .col_expr(round::Column::Notes, Expr::value(notes))
            .filter(round::Column::Id.eq(active.id))
            .filter(round::Column::IsActive.eq(true))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::RoundEndFailed(e.to_string()))?;

        if update.rows_affected == 0 {
            return Err(AppError::NoActiveRound);
        }

        self.find(active.id).await
    }

    /// Cancel a scheduled or active round. Completed and cancelled rounds are
    /// terminal, so the guard rejects them along with unknown IDs.
    pub async fn cancel(
        &self,
        round_id: Uuid,
        reason: Option<String>,
    ) -> Result<round::Model, AppError> {
        let notes = reason.unwrap_or_else(|| "Admin cancelled".to_string());

        let update = round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(false))
            .col_expr(round::Column::Status, Expr::value(RoundStatus::Cancelled))
            .col_expr(round::Column::Notes, Expr::value(Some(notes)))
            .filter(round::Column::Id.eq(round_id))
            .filter(round::Column::Status.is_in([RoundStatus::Scheduled, RoundStatus::Active]))
            .exec(self.conn)
            .await?;

        if update.rows_affected == 0 {
            return Err(AppError::RoundCancelFailed);
        }

        self.find(round_id).await
    }

    /// Move a round's planned end time. Only `end_time` changes; status and
    /// the active flag are left alone.
    pub async fn extend(
        &self,
        round_id: Uuid,
        new_end_time: DateTime<Utc>,
    ) -> Result<round::Model, AppError> {
        let target = self.find(round_id).await?;

        if new_end_time <= target.start_time {
            return Err(AppError::InvalidTimeRange(
                "new_end_time must be after start_time".into(),
            ));
        }

        let update = round::Entity::update_many()
            .col_expr(round::Column::EndTime, Expr::value(new_end_time))
            .filter(round::Column::Id.eq(round_id))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::RoundExtendFailed(e.to_string()))?;

        if update.rows_affected == 0 {
            return Err(AppError::RoundExtendFailed(
                "round disappeared during extend".into(),
            ));
        }

        self.find(round_id).await
    }

    pub async fn find(&self, round_id: Uuid) -> Result<round::Model, AppError> {
        round::Entity::find_by_id(round_id)
            .one(self.conn)
            .await?
            .ok_or(AppError::RoundNotFound)
    }

    pub async fn find_active(&self) -> Result<Option<round::Model>, AppError> {
        Ok(round::Entity::find()
            .filter(round::Column::IsActive.eq(true))
            .one(self.conn)
            .await?)
    }

    /// The scheduled round with the earliest start time, if any.
    pub async fn next_scheduled(&self) -> Result<Option<round::Model>, AppError> {
        Ok(round::Entity::find()
            .filter(round::Column::Status.eq(RoundStatus::Scheduled))
            .order_by_asc(round::Column::StartTime)
            .one(self.conn)
            .await?)
    }

    async fn max_round_number(&self) -> Result<i32, AppError> {
        let max = round::Entity::find()
            .select_only()
            .expr(Expr::col(round::Column::RoundNumber).max())
            .into_tuple::<Option<i32>>()
            .one(self.conn)
            .await?;

        Ok(max.flatten().unwrap_or(0))
    }
}
