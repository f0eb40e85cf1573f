use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a game round.
///
/// `Completed` and `Cancelled` are terminal; no transition leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_round")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub round_number: i32,

    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    /// Set when the round is ended, which may differ from the planned `end_time`.
    pub actual_end_time: Option<DateTimeUtc>,

    pub status: RoundStatus,
    /// Redundant with `status == Active`; kept as its own column so a partial
    /// unique index can enforce the single-active-round rule in the store.
    pub is_active: bool,

    pub started_by: Option<Uuid>,
    pub ended_by: Option<Uuid>,
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
