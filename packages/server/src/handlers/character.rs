use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::engine::rank::RankService;
use crate::entity::participant;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::CallerIdentity;
use crate::extractors::json::AppJson;
use crate::models::character::*;
use crate::models::shared::Envelope;
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
    tag = "Characters",
    operation_id = "createCharacter",
    summary = "Create the caller's character",
    description = "Creates an active character with zeroed scores. Each user has at most one active character.",
    request_body = CreateCharacterRequest,
    responses(
        (status = 201, description = "Character created", body = Envelope<CharacterResponse>),
        (status = 400, description = "Rejected (INVALID_REQUEST, CHARACTER_EXISTS)", body = ErrorBody),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, payload))]
pub async fn create_character(
    caller: CallerIdentity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCharacterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validate_character_name(&payload.name)?;

    let model = participant::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(caller.user_id),
        name: Set(name),
        current_prompt: Set(None),
        strength: Set(0),
        charm: Set(0),
        creativity: Set(0),
        total_score: Set(0),
        is_active: Set(true),
        created_at: Set(Utc::now()),
    };

    let created = match model.insert(&state.db).await {
        Ok(m) => m,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::CharacterExists);
        }
        Err(e) => return Err(e.into()),
    };

    info!(character_id = %created.id, "character created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(CharacterResponse::from(created))),
    ))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Characters",
    operation_id = "getMyCharacter",
    summary = "Get the caller's character",
    responses(
        (status = 200, description = "Active character", body = Envelope<CharacterResponse>),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Character not found (CHARACTER_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn my_character(
    caller: CallerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Envelope<CharacterResponse>>, AppError> {
    let character = find_own_character(&state.db, caller.user_id).await?;
    Ok(Json(Envelope::new(CharacterResponse::from(character))))
}

#[utoipa::path(
    get,
    path = "/{id}/rank",
    tag = "Characters",
    operation_id = "getMyRank",
    summary = "Get a character's live rank",
    description = "Rank and percentile against current scores of all active characters. Equal totals share a rank.",
    params(
        ("id" = Uuid, Path, description = "Character ID")
    ),
    responses(
        (status = 200, description = "Live standing", body = Envelope<RankResponse>),
        (status = 401, description = "Unauthorized (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Character not found (CHARACTER_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _caller), fields(character_id = %character_id))]
pub async fn character_rank(
    _caller: CallerIdentity,
    State(state): State<AppState>,
    Path(character_id): Path<Uuid>,
) -> Result<Json<Envelope<RankResponse>>, AppError> {
    let view = RankService::new(&state.db).rank_for(character_id).await?;

    Ok(Json(Envelope::new(RankResponse {
        rank: view.rank,
        total_participants: view.total_participants,
        percentile: view.percentile,
        character: CharacterScores::from(&view.participant),
    })))
}
