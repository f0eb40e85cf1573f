use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::{participant, prompt};
use crate::error::AppError;

/// Undo a scored submission: soft-delete the history row and subtract its
/// gains from the owning character.
///
/// Callers run `rollback` inside a transaction. The soft-delete flips first
/// and is guarded on `is_deleted`, so of two concurrent rollbacks of the same
/// prompt exactly one subtracts.
pub struct RollbackService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RollbackService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Returns the rolled-back history row with its original gains.
    pub async fn rollback(&self, prompt_id: Uuid) -> Result<prompt::Model, AppError> {
        let entry = prompt::Entity::find_by_id(prompt_id)
            .filter(prompt::Column::IsDeleted.eq(false))
            .one(self.conn)
            .await?
            .ok_or(AppError::PromptNotFound)?;

        let flagged = prompt::Entity::update_many()
            .col_expr(prompt::Column::IsDeleted, Expr::value(true))
            .filter(prompt::Column::Id.eq(prompt_id))
            .filter(prompt::Column::IsDeleted.eq(false))
            .exec(self.conn)
            .await?;

        if flagged.rows_affected == 0 {
            return Err(AppError::PromptNotFound);
        }

        let update = participant::Entity::update_many()
            .col_expr(
                participant::Column::Strength,
                Expr::col(participant::Column::Strength).sub(entry.strength_gained),
            )
            .col_expr(
                participant::Column::Charm,
                Expr::col(participant::Column::Charm).sub(entry.charm_gained),
            )
            .col_expr(
                participant::Column::Creativity,
                Expr::col(participant::Column::Creativity).sub(entry.creativity_gained),
            )
            .col_expr(
                participant::Column::TotalScore,
                Expr::col(participant::Column::TotalScore).sub(entry.total_score_gained),
            )
            .filter(participant::Column::Id.eq(entry.participant_id))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::RollbackFailed(e.to_string()))?;

        if update.rows_affected == 0 {
            return Err(AppError::RollbackFailed(
                "character no longer exists".into(),
            ));
        }

        Ok(entry)
    }
}
