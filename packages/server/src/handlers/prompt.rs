use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::engine::gate::SubmissionGate;
use crate::engine::rollback::RollbackService;
use crate::entity::{participant, prompt};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::CallerIdentity;
use crate::extractors::json::AppJson;
use crate::models::character::CharacterScores;
use crate::models::prompt::*;
use crate::models::shared::{Envelope, PageQuery, Pagination};
use crate::state::AppState;

/// Find the caller's active character or return 404.
async fn find_own_character<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<participant::Model, AppError> {
    participant::Entity::find()
        .filter(participant::Column::UserId.eq(user_id))
        .filter(participant::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or(AppError::CharacterNotFound)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Prompts",
    operation_id = "submitPrompt",
    summary = "Submit a prompt to the active round",
    description = "Scores the prompt and applies the gains to the caller's character. One live submission per character per round.",
    request_body = SubmitPromptRequest,
    responses(
        (status = 200, description = "Prompt scored", body = Envelope<SubmitPromptResponse>),
        (status = 400, description = "Rejected (INVALID_PROMPT_LENGTH, ROUND_NOT_ACTIVE, ALREADY_SUBMITTED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Character not found (CHARACTER_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Write rejected (SUBMISSION_FAILED, UPDATE_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload), fields(character_id = %payload.character_id))]
pub async fn submit_prompt(
    caller: CallerIdentity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitPromptRequest>,
) -> Result<Json<Envelope<SubmitPromptResponse>>, AppError> {
    let prompt_text = validate_prompt(&payload.prompt)?;

    let txn = state.db.begin().await?;
    let outcome = SubmissionGate::new(&txn)
        .submit(
            state.evaluator.as_ref(),
            caller.user_id,
            payload.character_id,
            &prompt_text,
        )
        .await?;
    txn.commit().await?;

    info!(
        prompt_id = %outcome.prompt.id,
        round_number = outcome.round_number,
        total = outcome.scores.total,
        "prompt scored"
    );

    Ok(Json(Envelope::new(SubmitPromptResponse {
        prompt_history_id: outcome.prompt.id,
        round_number: outcome.round_number,
        scores: outcome.scores,
        character: CharacterScores::from(&outcome.participant),
    })))
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Prompts",
    operation_id = "getMyPrompts",
    summary = "List the caller's submissions",
    description = "Returns the caller's non-deleted submissions, newest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "Submission history", body = Envelope<MyPromptsResponse>),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Character not found (CHARACTER_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, query))]
pub async fn my_prompts(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<MyPromptsResponse>>, AppError> {
    let character = find_own_character(&state.db, caller.user_id).await?;
    let (limit, offset) = query.window(20);

    let base = prompt::Entity::find()
        .filter(prompt::Column::ParticipantId.eq(character.id))
        .filter(prompt::Column::IsDeleted.eq(false));

    let total = base.clone().count(&state.db).await?;
    let rows = base
        .order_by_desc(prompt::Column::CreatedAt)
        .offset(offset)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(Envelope::new(MyPromptsResponse {
        data: rows.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            total,
            limit,
            offset,
        },
    })))
}

#[utoipa::path(
    post,
    path = "/{id}/rollback",
    tag = "Prompts",
    operation_id = "rollbackPrompt",
    summary = "Roll back a scored submission",
    description = "Soft-deletes the submission and subtracts its gains from the owning character. Frozen leaderboards are not rewritten. Requires the admin role.",
    params(
        ("id" = Uuid, Path, description = "Prompt history ID")
    ),
    request_body = RollbackRequest,
    responses(
        (status = 200, description = "Submission rolled back", body = Envelope<RollbackResponse>),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Prompt not found (PROMPT_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Write rejected (ROLLBACK_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload), fields(prompt_id = %prompt_id))]
pub async fn rollback_prompt(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    AppJson(payload): AppJson<RollbackRequest>,
) -> Result<Json<Envelope<RollbackResponse>>, AppError> {
    caller.require_admin()?;

    let txn = state.db.begin().await?;
    let entry = RollbackService::new(&txn).rollback(prompt_id).await?;
    txn.commit().await?;

    info!(
        prompt_id = %entry.id,
        participant_id = %entry.participant_id,
        reason = payload.reason.as_deref().unwrap_or("-"),
        "submission rolled back"
    );

    Ok(Json(Envelope::new(RollbackResponse {
        message: "Prompt deleted and scores rolled back".into(),
        rolled_back: RolledBackScores::from(&entry),
    })))
}
