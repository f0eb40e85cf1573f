use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::participant;
use crate::error::AppError;

/// Request body for creating a character.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateCharacterRequest {
    #[schema(example = "Dokkaebi")]
    pub name: String,
}

/// Full character representation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CharacterResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Dokkaebi")]
    pub name: String,
    pub current_prompt: Option<String>,
    #[schema(example = 120)]
    pub strength: i32,
    #[schema(example = 95)]
    pub charm: i32,
    #[schema(example = 101)]
    pub creativity: i32,
    #[schema(example = 316)]
    pub total_score: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<participant::Model> for CharacterResponse {
    fn from(m: participant::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            current_prompt: m.current_prompt,
            strength: m.strength,
            charm: m.charm,
            creativity: m.creativity,
            total_score: m.total_score,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

/// Score block embedded in submission and rank responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CharacterScores {
    #[schema(example = 316)]
    pub total_score: i32,
    #[schema(example = 120)]
    pub strength: i32,
    #[schema(example = 95)]
    pub charm: i32,
    #[schema(example = 101)]
    pub creativity: i32,
}

impl From<&participant::Model> for CharacterScores {
    fn from(m: &participant::Model) -> Self {
        Self {
            total_score: m.total_score,
            strength: m.strength,
            charm: m.charm,
            creativity: m.creativity,
        }
    }
}

/// Live standing of one character.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RankResponse {
    #[schema(example = 3)]
    pub rank: u64,
    #[schema(example = 57)]
    pub total_participants: u64,
    /// Share of the field at or below this character, one decimal place.
    #[schema(example = 96.5)]
    pub percentile: f64,
    pub character: CharacterScores,
}

/// Validate and normalize a character name (1-20 Unicode characters after
/// trimming). Returns the trimmed name that gets stored.
pub fn validate_character_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 20 {
        return Err(AppError::InvalidRequest(
            "Name must be 1-20 characters".into(),
        ));
    }
    Ok(name.to_string())
}
