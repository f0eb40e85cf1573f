use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::engine::scoring::EvalError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false` on error responses.
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error kind, e.g. `INVALID_PROMPT_LENGTH`,
    /// `ROUND_ALREADY_ACTIVE`, `ALREADY_SUBMITTED`, `CHARACTER_NOT_FOUND`.
    #[schema(example = "INVALID_PROMPT_LENGTH")]
    pub error: &'static str,
    /// Human-readable error description.
    #[schema(example = "Prompt must be 1-30 characters")]
    pub message: String,
}

/// Application-level error type.
///
/// Every failure an endpoint can produce is one of these kinds. Validation
/// and state-conflict kinds map to 400, identity kinds to 401/403, missing
/// targets to 404 and persistence failures to 500. The 500 kinds log their
/// detail and return a fixed message so store internals never leak.
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    InvalidPromptLength,
    InvalidTimeRange(String),
    MissingRoundNumber,
    RoundNotActive,
    RoundAlreadyActive,
    RoundNotScheduled,
    AlreadySubmitted,
    RoundCancelFailed,
    CharacterExists,
    Unauthorized,
    PermissionDenied,
    RoundNotFound,
    NoActiveRound,
    CharacterNotFound,
    PromptNotFound,
    RoundCreateFailed(String),
    RoundStartFailed(String),
    RoundEndFailed(String),
    RoundExtendFailed(String),
    SubmissionFailed(String),
    UpdateFailed(String),
    RollbackFailed(String),
    Database(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, error, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            AppError::InvalidPromptLength => (
                StatusCode::BAD_REQUEST,
                "INVALID_PROMPT_LENGTH",
                "Prompt must be 1-30 characters".into(),
            ),
            AppError::InvalidTimeRange(msg) => (StatusCode::BAD_REQUEST, "INVALID_TIME_RANGE", msg),
            AppError::MissingRoundNumber => (
                StatusCode::BAD_REQUEST,
                "MISSING_ROUND_NUMBER",
                "Round number is required".into(),
            ),
            AppError::RoundNotActive => (
                StatusCode::BAD_REQUEST,
                "ROUND_NOT_ACTIVE",
                "No round is currently accepting submissions".into(),
            ),
            AppError::RoundAlreadyActive => (
                StatusCode::BAD_REQUEST,
                "ROUND_ALREADY_ACTIVE",
                "Another round is already active".into(),
            ),
            AppError::RoundNotScheduled => (
                StatusCode::BAD_REQUEST,
                "ROUND_NOT_SCHEDULED",
                "Round is not in the scheduled state".into(),
            ),
            AppError::AlreadySubmitted => (
                StatusCode::BAD_REQUEST,
                "ALREADY_SUBMITTED",
                "Already submitted a prompt this round".into(),
            ),
            AppError::RoundCancelFailed => (
                StatusCode::BAD_REQUEST,
                "ROUND_CANCEL_FAILED",
                "Round not found, already completed or already cancelled".into(),
            ),
            AppError::CharacterExists => (
                StatusCode::BAD_REQUEST,
                "CHARACTER_EXISTS",
                "An active character already exists for this user".into(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".into(),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                "Insufficient permissions".into(),
            ),
            AppError::RoundNotFound => (
                StatusCode::NOT_FOUND,
                "ROUND_NOT_FOUND",
                "Round not found".into(),
            ),
            AppError::NoActiveRound => (
                StatusCode::NOT_FOUND,
                "NO_ACTIVE_ROUND",
                "No active round".into(),
            ),
            AppError::CharacterNotFound => (
                StatusCode::NOT_FOUND,
                "CHARACTER_NOT_FOUND",
                "Character not found".into(),
            ),
            AppError::PromptNotFound => (
                StatusCode::NOT_FOUND,
                "PROMPT_NOT_FOUND",
                "Prompt not found".into(),
            ),
            AppError::RoundCreateFailed(detail) => {
                return Self::internal("ROUND_CREATE_FAILED", "Failed to create round", detail);
            }
            AppError::RoundStartFailed(detail) => {
                return Self::internal("ROUND_START_FAILED", "Failed to start round", detail);
            }
            AppError::RoundEndFailed(detail) => {
                return Self::internal("ROUND_END_FAILED", "Failed to end round", detail);
            }
            AppError::RoundExtendFailed(detail) => {
                return Self::internal("ROUND_EXTEND_FAILED", "Failed to extend round", detail);
            }
            AppError::SubmissionFailed(detail) => {
                return Self::internal("SUBMISSION_FAILED", "Failed to record submission", detail);
            }
            AppError::UpdateFailed(detail) => {
                return Self::internal("UPDATE_FAILED", "Failed to update character", detail);
            }
            AppError::RollbackFailed(detail) => {
                return Self::internal("ROLLBACK_FAILED", "Failed to roll back prompt", detail);
            }
            AppError::Database(detail) => {
                return Self::internal("DATABASE_ERROR", "A database error occurred", detail);
            }
            AppError::Internal(detail) => {
                return Self::internal("INTERNAL_ERROR", "An unexpected error occurred", detail);
            }
        };

        (
            status,
            ErrorBody {
                success: false,
                error,
                message,
            },
        )
    }

    fn internal(error: &'static str, message: &str, detail: String) -> (StatusCode, ErrorBody) {
        tracing::error!(kind = error, detail = %detail, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                success: false,
                error,
                message: message.into(),
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        AppError::SubmissionFailed(err.to_string())
    }
}
