use std::time::Duration;

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::entity::{leaderboard_snapshot, participant, prompt, round};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;
    ensure_indexes(&db).await?;
    info!("database schema ready");

    Ok(db)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, schema.create_table_from_entity(round::Entity)).await?;
    create_table(db, schema.create_table_from_entity(participant::Entity)).await?;
    create_table(db, schema.create_table_from_entity(prompt::Entity)).await?;
    create_table(
        db,
        schema.create_table_from_entity(leaderboard_snapshot::Entity),
    )
    .await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();
    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}

/// Store-level guards the entity schema cannot express. The syntax below is
/// accepted by both Postgres and SQLite.
async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        // one active round game-wide
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_game_round_single_active \
         ON game_round (is_active) WHERE is_active",
        // one active character per user
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_participant_active_user \
         ON participant (user_id) WHERE is_active",
        // one live submission per character per round
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_prompt_live_submission \
         ON prompt_history (participant_id, round_number) WHERE NOT is_deleted",
        // snapshot rows are written once per round
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_snapshot_round_participant \
         ON leaderboard_snapshot (round_number, participant_id)",
        "CREATE INDEX IF NOT EXISTS idx_snapshot_round_rank \
         ON leaderboard_snapshot (round_number, \"rank\")",
    ];

    for sql in statements {
        db.execute_unprepared(sql).await?;
    }

    Ok(())
}
