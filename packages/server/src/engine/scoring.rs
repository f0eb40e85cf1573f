use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Evaluator produced a negative {axis} score: {value}")]
    NegativeScore { axis: &'static str, value: i32 },

    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),
}

/// Scores awarded to a single prompt.
///
/// `total` is derived at construction and always equals the sum of the three
/// axes; there is no way to build a card where the parts disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ScoreCard {
    pub strength: i32,
    pub charm: i32,
    pub creativity: i32,
    pub total: i32,
}

impl ScoreCard {
    pub fn new(strength: i32, charm: i32, creativity: i32) -> Result<Self, EvalError> {
        for (axis, value) in [
            ("strength", strength),
            ("charm", charm),
            ("creativity", creativity),
        ] {
            if value < 0 {
                return Err(EvalError::NegativeScore { axis, value });
            }
        }

        Ok(Self {
            strength,
            charm,
            creativity,
            total: strength + charm + creativity,
        })
    }
}

/// Scoring backend for submitted prompts.
///
/// The engine only depends on this trait; swapping the placeholder for a
/// model-backed evaluator is a state-construction change, not an engine one.
#[async_trait]
pub trait ScoreEvaluator: Send + Sync {
    async fn evaluate(&self, prompt: &str) -> Result<ScoreCard, EvalError>;
}

/// Placeholder evaluator: each axis uniform in `[min, max)`.
pub struct RandomEvaluator {
    min: i32,
    max: i32,
}

impl RandomEvaluator {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

#[async_trait]
impl ScoreEvaluator for RandomEvaluator {
    async fn evaluate(&self, _prompt: &str) -> Result<ScoreCard, EvalError> {
        let (strength, charm, creativity) = {
            let mut rng = rand::rng();
            (
                rng.random_range(self.min..self.max),
                rng.random_range(self.min..self.max),
                rng.random_range(self.min..self.max),
            )
        };

        ScoreCard::new(strength, charm, creativity)
    }
}
