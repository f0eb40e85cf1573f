use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::leaderboard_snapshot;

/// One frozen leaderboard row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SnapshotEntry {
    pub id: Uuid,
    #[schema(example = 12)]
    pub round_number: i32,
    pub participant_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = 1)]
    pub rank: i32,
    #[schema(example = 316)]
    pub total_score: i32,
    #[schema(example = 120)]
    pub strength: i32,
    #[schema(example = 95)]
    pub charm: i32,
    #[schema(example = 101)]
    pub creativity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<leaderboard_snapshot::Model> for SnapshotEntry {
    fn from(m: leaderboard_snapshot::Model) -> Self {
        Self {
            id: m.id,
            round_number: m.round_number,
            participant_id: m.participant_id,
            user_id: m.user_id,
            rank: m.rank,
            total_score: m.total_score,
            strength: m.strength,
            charm: m.charm,
            creativity: m.creativity,
            created_at: m.created_at,
        }
    }
}
