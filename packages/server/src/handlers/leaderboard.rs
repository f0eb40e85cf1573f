use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::engine::snapshot::SnapshotService;
use crate::error::{AppError, ErrorBody};
use crate::models::leaderboard::SnapshotEntry;
use crate::models::shared::{Envelope, PageQuery};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{round_number}",
    tag = "Leaderboard",
    operation_id = "getPastLeaderboard",
    summary = "Get a frozen leaderboard page",
    description = "Snapshot rows for a completed round, best rank first. A round that was never snapshotted yields an empty page.",
    params(
        ("round_number" = i32, Path, description = "Round number (1-based)"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Snapshot page", body = Envelope<Vec<SnapshotEntry>>),
        (status = 400, description = "Invalid round number (MISSING_ROUND_NUMBER)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(round_number = round_number))]
pub async fn past_leaderboard(
    State(state): State<AppState>,
    Path(round_number): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<Vec<SnapshotEntry>>>, AppError> {
    if round_number < 1 {
        return Err(AppError::MissingRoundNumber);
    }

    let (limit, offset) = query.window(100);
    let rows = SnapshotService::new(&state.db)
        .page(round_number, limit, offset)
        .await?;

    Ok(Json(Envelope::new(
        rows.into_iter().map(Into::into).collect(),
    )))
}
