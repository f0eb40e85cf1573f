use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One prompt submission. The `*_gained` columns record the exact deltas
/// applied to the participant, so a rollback can reverse them precisely.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prompt_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub participant_id: Uuid,
    pub user_id: Uuid,

    pub prompt: String,
    pub round_number: i32,

    pub strength_gained: i32,
    pub charm_gained: i32,
    pub creativity_gained: i32,
    pub total_score_gained: i32,

    /// Rolled-back submissions are kept for admin review but excluded from
    /// player history and from the one-live-submission-per-round index.
    pub is_deleted: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::participant::Entity",
        from = "Column::ParticipantId",
        to = "super::participant::Column::Id"
    )]
    Participant,
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
