use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::engine::scoring::{ScoreCard, ScoreEvaluator};
use crate::entity::{participant, prompt, round};
use crate::error::AppError;

/// What a successful submission produced: the stored history row, the
/// participant after the score bump, and the card the evaluator returned.
pub struct SubmissionOutcome {
    pub prompt: prompt::Model,
    pub participant: participant::Model,
    pub scores: ScoreCard,
    pub round_number: i32,
}

/// Admission control for prompt submissions.
///
/// Callers run `submit` inside a transaction. The one-per-round rule is
/// enforced twice: a count pre-check for the friendly error, and the partial
/// unique index on `(participant_id, round_number)` for the race window
/// between check and insert.
pub struct SubmissionGate<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionGate<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn submit(
        &self,
        evaluator: &dyn ScoreEvaluator,
        user_id: Uuid,
        participant_id: Uuid,
        prompt_text: &str,
    ) -> Result<SubmissionOutcome, AppError> {
        let round = round::Entity::find()
            .filter(round::Column::IsActive.eq(true))
            .one(self.conn)
            .await?
            .ok_or(AppError::RoundNotActive)?;

        let target = participant::Entity::find_by_id(participant_id)
            .filter(participant::Column::UserId.eq(user_id))
            .filter(participant::Column::IsActive.eq(true))
            .one(self.conn)
            .await?
            .ok_or(AppError::CharacterNotFound)?;

        let submitted = prompt::Entity::find()
            .filter(prompt::Column::ParticipantId.eq(target.id))
            .filter(prompt::Column::RoundNumber.eq(round.round_number))
            .filter(prompt::Column::IsDeleted.eq(false))
            .count(self.conn)
            .await?;
        if submitted > 0 {
            return Err(AppError::AlreadySubmitted);
        }

        let scores = evaluator.evaluate(prompt_text).await?;

        let entry = prompt::ActiveModel {
            id: Set(Uuid::new_v4()),
            participant_id: Set(target.id),
            user_id: Set(user_id),
            prompt: Set(prompt_text.to_string()),
            round_number: Set(round.round_number),
            strength_gained: Set(scores.strength),
            charm_gained: Set(scores.charm),
            creativity_gained: Set(scores.creativity),
            total_score_gained: Set(scores.total),
            is_deleted: Set(false),
            created_at: Set(Utc::now()),
        };

        let stored = match entry.insert(self.conn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::AlreadySubmitted);
            }
            Err(e) => return Err(AppError::SubmissionFailed(e.to_string())),
        };

        let update = participant::Entity::update_many()
            .col_expr(
                participant::Column::CurrentPrompt,
                Expr::value(Some(prompt_text.to_string())),
            )
            .col_expr(
                participant::Column::Strength,
                Expr::col(participant::Column::Strength).add(scores.strength),
            )
            .col_expr(
                participant::Column::Charm,
                Expr::col(participant::Column::Charm).add(scores.charm),
            )
            .col_expr(
                participant::Column::Creativity,
                Expr::col(participant::Column::Creativity).add(scores.creativity),
            )
            .col_expr(
                participant::Column::TotalScore,
                Expr::col(participant::Column::TotalScore).add(scores.total),
            )
            .filter(participant::Column::Id.eq(target.id))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::UpdateFailed(e.to_string()))?;

        if update.rows_affected == 0 {
            return Err(AppError::UpdateFailed(
                "character disappeared during score update".into(),
            ));
        }

        let refreshed = participant::Entity::find_by_id(target.id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::UpdateFailed("character disappeared during score update".into()))?;

        Ok(SubmissionOutcome {
            prompt: stored,
            participant: refreshed,
            scores,
            round_number: round.round_number,
        })
    }
}
