pub mod character;
pub mod leaderboard;
pub mod prompt;
pub mod round;
