pub mod leaderboard_snapshot;
pub mod participant;
pub mod prompt;
pub mod round;
