mod leaderboard;
mod prompts;
mod rollback;
