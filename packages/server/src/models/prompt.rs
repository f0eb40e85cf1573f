use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::character::CharacterScores;
use super::shared::Pagination;
use crate::engine::scoring::ScoreCard;
use crate::entity::prompt;
use crate::error::AppError;

/// Request body for submitting a prompt to the active round.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SubmitPromptRequest {
    pub character_id: Uuid,
    #[schema(example = "a knight of glass and rain")]
    pub prompt: String,
}

/// Result of a scored submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmitPromptResponse {
    pub prompt_history_id: Uuid,
    #[schema(example = 12)]
    pub round_number: i32,
    /// What this submission gained.
    pub scores: ScoreCard,
    /// The character's totals after the gain.
    pub character: CharacterScores,
}

/// One stored submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptHistoryItem {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "a knight of glass and rain")]
    pub prompt: String,
    #[schema(example = 12)]
    pub round_number: i32,
    #[schema(example = 14)]
    pub strength_gained: i32,
    #[schema(example = 9)]
    pub charm_gained: i32,
    #[schema(example = 22)]
    pub creativity_gained: i32,
    #[schema(example = 45)]
    pub total_score_gained: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<prompt::Model> for PromptHistoryItem {
    fn from(m: prompt::Model) -> Self {
        Self {
            id: m.id,
            participant_id: m.participant_id,
            user_id: m.user_id,
            prompt: m.prompt,
            round_number: m.round_number,
            strength_gained: m.strength_gained,
            charm_gained: m.charm_gained,
            creativity_gained: m.creativity_gained,
            total_score_gained: m.total_score_gained,
            is_deleted: m.is_deleted,
            created_at: m.created_at,
        }
    }
}

/// The caller's submission history, newest first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyPromptsResponse {
    pub data: Vec<PromptHistoryItem>,
    pub pagination: Pagination,
}

/// Request body for rolling back a submission.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RollbackRequest {
    #[schema(example = "Abusive content")]
    pub reason: Option<String>,
}

/// The gains that were subtracted, reported as positive numbers.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RolledBackScores {
    #[schema(example = 14)]
    pub strength: i32,
    #[schema(example = 9)]
    pub charm: i32,
    #[schema(example = 22)]
    pub creativity: i32,
    #[schema(example = 45)]
    pub total: i32,
}

impl From<&prompt::Model> for RolledBackScores {
    fn from(m: &prompt::Model) -> Self {
        Self {
            strength: m.strength_gained,
            charm: m.charm_gained,
            creativity: m.creativity_gained,
            total: m.total_score_gained,
        }
    }
}

/// Result of a rollback.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RollbackResponse {
    #[schema(example = "Prompt deleted and scores rolled back")]
    pub message: String,
    pub rolled_back: RolledBackScores,
}

/// Validate and normalize a prompt (1-30 Unicode characters after
/// trimming). Returns the trimmed prompt that gets stored and scored.
pub fn validate_prompt(prompt: &str) -> Result<String, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() || prompt.chars().count() > 30 {
        return Err(AppError::InvalidPromptLength);
    }
    Ok(prompt.to_string())
}
