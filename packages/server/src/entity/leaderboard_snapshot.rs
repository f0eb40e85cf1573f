use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Frozen standing of one participant at the moment a round ended.
/// Rows are written once and never updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaderboard_snapshot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub round_number: i32,
    pub participant_id: Uuid,
    pub user_id: Uuid,

    pub rank: i32,
    pub total_score: i32,
    pub strength: i32,
    pub charm: i32,
    pub creativity: i32,

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
