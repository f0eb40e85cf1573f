use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::participant;
use crate::error::AppError;

/// A character's live standing among all active characters.
pub struct RankView {
    pub rank: u64,
    pub total_participants: u64,
    pub percentile: f64,
    pub participant: participant::Model,
}

/// Live rank queries against current scores. Characters with equal
/// `total_score` share a rank (1224-style); frozen snapshots use their own
/// tie order instead.
pub struct RankService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RankService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn rank_for(&self, participant_id: Uuid) -> Result<RankView, AppError> {
        let me = participant::Entity::find_by_id(participant_id)
            .filter(participant::Column::IsActive.eq(true))
            .one(self.conn)
            .await?
            .ok_or(AppError::CharacterNotFound)?;

        let total = participant::Entity::find()
            .filter(participant::Column::IsActive.eq(true))
            .count(self.conn)
            .await?;

        let higher = participant::Entity::find()
            .filter(participant::Column::IsActive.eq(true))
            .filter(participant::Column::TotalScore.gt(me.total_score))
            .count(self.conn)
            .await?;

        // `me` is active, so total >= rank >= 1.
        let rank = higher + 1;
        let percentile = round_tenth((total - rank + 1) as f64 / total as f64 * 100.0);

        Ok(RankView {
            rank,
            total_participants: total,
            percentile,
            participant: me,
        })
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
