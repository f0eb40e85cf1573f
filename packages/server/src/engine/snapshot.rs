use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::{leaderboard_snapshot, participant};

/// Frozen per-round leaderboards.
///
/// Ranks are dense positions in the ordering `total_score DESC, created_at
/// ASC, id ASC`; earlier characters win ties. Snapshot rows are never
/// updated after insertion.
pub struct SnapshotService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SnapshotService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Record the standings of every active character for `round_number`.
    /// Returns the number of rows written; a game with no characters
    /// snapshots nothing.
    pub async fn freeze(&self, round_number: i32) -> Result<u64, DbErr> {
        let standings = participant::Entity::find()
            .filter(participant::Column::IsActive.eq(true))
            .order_by_desc(participant::Column::TotalScore)
            .order_by_asc(participant::Column::CreatedAt)
            .order_by_asc(participant::Column::Id)
            .all(self.conn)
            .await?;

        if standings.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let rows: Vec<leaderboard_snapshot::ActiveModel> = standings
            .into_iter()
            .enumerate()
            .map(|(position, entrant)| leaderboard_snapshot::ActiveModel {
                id: Set(Uuid::new_v4()),
                round_number: Set(round_number),
                participant_id: Set(entrant.id),
                user_id: Set(entrant.user_id),
                rank: Set(position as i32 + 1),
                total_score: Set(entrant.total_score),
                strength: Set(entrant.strength),
                charm: Set(entrant.charm),
                creativity: Set(entrant.creativity),
                created_at: Set(now),
            })
            .collect();

        leaderboard_snapshot::Entity::insert_many(rows)
            .exec_without_returning(self.conn)
            .await
    }

    /// One page of a frozen leaderboard, best rank first.
    pub async fn page(
        &self,
        round_number: i32,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<leaderboard_snapshot::Model>, DbErr> {
        leaderboard_snapshot::Entity::find()
            .filter(leaderboard_snapshot::Column::RoundNumber.eq(round_number))
            .order_by_asc(leaderboard_snapshot::Column::Rank)
            .offset(offset)
            .limit(limit)
            .all(self.conn)
            .await
    }
}
