use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::round::{self, RoundStatus};
use crate::error::AppError;

/// Request body for scheduling a round.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScheduleRoundRequest {
    #[schema(example = "2026-03-01T18:00:00Z")]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2026-03-01T21:00:00Z")]
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request body for ending the active round.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EndRoundRequest {
    pub notes: Option<String>,
}

/// Request body for cancelling a round.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CancelRoundRequest {
    #[schema(example = "Maintenance window")]
    pub reason: Option<String>,
}

/// Request body for moving a round's end time.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExtendRoundRequest {
    #[schema(example = "2026-03-01T23:00:00Z")]
    pub new_end_time: DateTime<Utc>,
}

/// Full round representation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundResponse {
    pub id: Uuid,
    #[schema(example = 12)]
    pub round_number: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub status: RoundStatus,
    pub is_active: bool,
    pub started_by: Option<Uuid>,
    pub ended_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<round::Model> for RoundResponse {
    fn from(m: round::Model) -> Self {
        Self {
            id: m.id,
            round_number: m.round_number,
            start_time: m.start_time,
            end_time: m.end_time,
            actual_end_time: m.actual_end_time,
            status: m.status,
            is_active: m.is_active,
            started_by: m.started_by,
            ended_by: m.ended_by,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

/// Data shape shared by the lifecycle operations that return one round.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundOperationResponse {
    pub round: RoundResponse,
}

impl From<round::Model> for RoundOperationResponse {
    fn from(m: round::Model) -> Self {
        Self { round: m.into() }
    }
}

/// Result of ending a round, including the snapshot outcome.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EndRoundResponse {
    pub round: RoundResponse,
    /// False when the leaderboard freeze failed; the round still ended.
    pub snapshot_created: bool,
    #[schema(example = 42)]
    pub leaderboard_count: u64,
}

/// The currently active round as seen by players.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CurrentRoundResponse {
    pub id: Uuid,
    #[schema(example = 12)]
    pub round_number: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Clock time until the planned end, `HH:MM:SS`, clamped at zero.
    /// Hours keep counting past 24.
    #[schema(example = "02:41:09")]
    pub time_remaining: String,
    pub is_active: bool,
    pub status: RoundStatus,
    /// The next scheduled round, if one exists.
    pub next_round: Option<UpcomingRound>,
}

/// Preview of a scheduled round.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UpcomingRound {
    pub id: Uuid,
    #[schema(example = 13)]
    pub round_number: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<round::Model> for UpcomingRound {
    fn from(m: round::Model) -> Self {
        Self {
            id: m.id,
            round_number: m.round_number,
            start_time: m.start_time,
            end_time: m.end_time,
        }
    }
}

impl CurrentRoundResponse {
    pub fn new(now: DateTime<Utc>, active: round::Model, next: Option<round::Model>) -> Self {
        Self {
            id: active.id,
            round_number: active.round_number,
            start_time: active.start_time,
            end_time: active.end_time,
            time_remaining: format_time_remaining(now, active.end_time),
            is_active: active.is_active,
            status: active.status,
            next_round: next.map(Into::into),
        }
    }
}

/// Validate a schedule request (end must come after start).
pub fn validate_schedule_round(req: &ScheduleRoundRequest) -> Result<(), AppError> {
    if req.end_time <= req.start_time {
        return Err(AppError::InvalidTimeRange(
            "end_time must be after start_time".into(),
        ));
    }
    Ok(())
}

/// `HH:MM:SS` until `end`, clamped at `00:00:00` once passed.
pub fn format_time_remaining(now: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let seconds = (end - now).num_seconds().max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
