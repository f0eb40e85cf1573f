use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A player's character. Attribute columns accumulate across rounds;
/// `total_score` always equals `strength + charm + creativity`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,
    pub name: String,
    pub current_prompt: Option<String>,

    pub strength: i32,
    pub charm: i32,
    pub creativity: i32,
    pub total_score: i32,

    /// A user has at most one active participant (partial unique index).
    pub is_active: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prompt::Entity")]
    Prompt,
}

impl Related<super::prompt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prompt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
