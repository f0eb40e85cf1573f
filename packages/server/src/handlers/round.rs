use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::engine::scheduler::RoundScheduler;
use crate::engine::snapshot::SnapshotService;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::CallerIdentity;
use crate::extractors::json::AppJson;
use crate::models::round::*;
use crate::models::shared::Envelope;
use crate::state::AppState;

/// Freeze the final standings for a completed round in one transaction.
async fn freeze_leaderboard(db: &DatabaseConnection, round_number: i32) -> Result<u64, DbErr> {
    let txn = db.begin().await?;
    let count = SnapshotService::new(&txn).freeze(round_number).await?;
    txn.commit().await?;
    Ok(count)
}

#[utoipa::path(
    get,
    path = "/current",
    tag = "Rounds",
    operation_id = "getCurrentRound",
    summary = "Get the active round",
    description = "Returns the active round with a live time-remaining countdown and a preview of the next scheduled round.",
    responses(
        (status = 200, description = "Active round", body = Envelope<CurrentRoundResponse>),
        (status = 404, description = "No active round (NO_ACTIVE_ROUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn current_round(
    State(state): State<AppState>,
) -> Result<Json<Envelope<CurrentRoundResponse>>, AppError> {
    let scheduler = RoundScheduler::new(&state.db);
    let active = scheduler
        .find_active()
        .await?
        .ok_or(AppError::NoActiveRound)?;
    let next = scheduler.next_scheduled().await?;

    Ok(Json(Envelope::new(CurrentRoundResponse::new(
        Utc::now(),
        active,
        next,
    ))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Rounds",
    operation_id = "getRoundInfo",
    summary = "Get one round by ID",
    params(
        ("id" = Uuid, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Round details", body = Envelope<RoundResponse>),
        (status = 404, description = "Round not found (ROUND_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(round_id = %round_id))]
pub async fn round_info(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<Envelope<RoundResponse>>, AppError> {
    let round = RoundScheduler::new(&state.db).find(round_id).await?;
    Ok(Json(Envelope::new(round.into())))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Rounds",
    operation_id = "scheduleRound",
    summary = "Schedule a new round",
    description = "Creates a round in the scheduled state with the next round number. Requires the admin role.",
    request_body = ScheduleRoundRequest,
    responses(
        (status = 201, description = "Round scheduled", body = Envelope<RoundOperationResponse>),
        (status = 400, description = "Validation error (INVALID_REQUEST, INVALID_TIME_RANGE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 500, description = "Insert rejected (ROUND_CREATE_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload))]
pub async fn schedule_round(
    caller: CallerIdentity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScheduleRoundRequest>,
) -> Result<impl IntoResponse, AppError> {
    caller.require_admin()?;
    validate_schedule_round(&payload)?;

    let txn = state.db.begin().await?;
    let round = RoundScheduler::new(&txn)
        .schedule(payload.start_time, payload.end_time, payload.notes)
        .await?;
    txn.commit().await?;

    info!(round_id = %round.id, round_number = round.round_number, "round scheduled");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(RoundOperationResponse::from(round))),
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/start",
    tag = "Rounds",
    operation_id = "startRound",
    summary = "Start a scheduled round",
    description = "Activates a scheduled round. At most one round can be active; concurrent starts resolve to exactly one winner. Requires the admin role.",
    params(
        ("id" = Uuid, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Round started", body = Envelope<RoundOperationResponse>),
        (status = 400, description = "State conflict (ROUND_ALREADY_ACTIVE, ROUND_NOT_SCHEDULED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (ROUND_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Update rejected (ROUND_START_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(round_id = %round_id))]
pub async fn start_round(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<Envelope<RoundOperationResponse>>, AppError> {
    caller.require_admin()?;

    let txn = state.db.begin().await?;
    let round = RoundScheduler::new(&txn)
        .start(round_id, caller.user_id)
        .await?;
    txn.commit().await?;

    info!(round_id = %round.id, round_number = round.round_number, "round started");

    Ok(Json(Envelope::new(RoundOperationResponse::from(round))))
}

#[utoipa::path(
    post,
    path = "/end",
    tag = "Rounds",
    operation_id = "endRound",
    summary = "End the active round",
    description = "Completes the active round and freezes the leaderboard. A failed freeze is reported in the response but does not un-end the round. Requires the admin role.",
    request_body = EndRoundRequest,
    responses(
        (status = 200, description = "Round ended", body = Envelope<EndRoundResponse>),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No active round (NO_ACTIVE_ROUND)", body = ErrorBody),
        (status = 500, description = "Update rejected (ROUND_END_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload))]
pub async fn end_round(
    caller: CallerIdentity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<EndRoundRequest>,
) -> Result<Json<Envelope<EndRoundResponse>>, AppError> {
    caller.require_admin()?;

    let txn = state.db.begin().await?;
    let round = RoundScheduler::new(&txn)
        .end(caller.user_id, payload.notes)
        .await?;
    txn.commit().await?;

    let (snapshot_created, leaderboard_count) =
        match freeze_leaderboard(&state.db, round.round_number).await {
            Ok(count) => (true, count),
            Err(e) => {
                warn!(error = %e, round_number = round.round_number, "leaderboard freeze failed");
                (false, 0)
            }
        };

    info!(
        round_id = %round.id,
        round_number = round.round_number,
        snapshot_created,
        "round ended"
    );

    Ok(Json(Envelope::new(EndRoundResponse {
        round: round.into(),
        snapshot_created,
        leaderboard_count,
    })))
}

#[utoipa::path(
    post,
    path = "/{id}/cancel",
    tag = "Rounds",
    operation_id = "cancelRound",
    summary = "Cancel a round",
    description = "Cancels a scheduled or active round. Completed and cancelled rounds cannot be cancelled. Requires the admin role.",
    params(
        ("id" = Uuid, Path, description = "Round ID")
    ),
    request_body = CancelRoundRequest,
    responses(
        (status = 200, description = "Round cancelled", body = Envelope<RoundOperationResponse>),
        (status = 400, description = "Not cancellable (ROUND_CANCEL_FAILED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload), fields(round_id = %round_id))]
pub async fn cancel_round(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    AppJson(payload): AppJson<CancelRoundRequest>,
) -> Result<Json<Envelope<RoundOperationResponse>>, AppError> {
    caller.require_admin()?;

    let txn = state.db.begin().await?;
    let round = RoundScheduler::new(&txn)
        .cancel(round_id, payload.reason)
        .await?;
    txn.commit().await?;

    info!(round_id = %round.id, round_number = round.round_number, "round cancelled");

    Ok(Json(Envelope::new(RoundOperationResponse::from(round))))
}

#[utoipa::path(
    post,
    path = "/{id}/extend",
    tag = "Rounds",
    operation_id = "extendRound",
    summary = "Move a round's end time",
    description = "Replaces the planned end time of a round in any state. Requires the admin role.",
    params(
        ("id" = Uuid, Path, description = "Round ID")
    ),
    request_body = ExtendRoundRequest,
    responses(
        (status = 200, description = "Round extended", body = Envelope<RoundOperationResponse>),
        (status = 400, description = "Validation error (INVALID_TIME_RANGE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (ROUND_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Update rejected (ROUND_EXTEND_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload), fields(round_id = %round_id))]
pub async fn extend_round(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
    AppJson(payload): AppJson<ExtendRoundRequest>,
) -> Result<Json<Envelope<RoundOperationResponse>>, AppError> {
    caller.require_admin()?;

    let txn = state.db.begin().await?;
    let round = RoundScheduler::new(&txn)
        .extend(round_id, payload.new_end_time)
        .await?;
    txn.commit().await?;

    info!(round_id = %round.id, new_end_time = %round.end_time, "round extended");

    Ok(Json(Envelope::new(RoundOperationResponse::from(round))))
}
