use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::engine::scoring::ScoreEvaluator;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub evaluator: Arc<dyn ScoreEvaluator>,
}
