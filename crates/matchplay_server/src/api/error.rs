//! Mapping of match errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use matchplay::MatchError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error returned by a handler.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or unknown bearer token.
    #[display("Authentication required")]
    Unauthorized,
    /// Path segment is not a match id.
    #[display("Invalid match id: {}", _0)]
    MalformedId(String),
    /// Move body is missing or does not name a square.
    #[display("Invalid move request: {}", _0)]
    MalformedMove(String),
    /// Match operation failed.
    #[display("{}", _0)]
    Match(MatchError),
}

impl std::error::Error for ApiError {}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError::Match(err)
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable error kind.
    pub code: String,
}

impl ApiError {
    /// HTTP status and stable error kind.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::MalformedId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
            ApiError::MalformedMove(_) => (StatusCode::BAD_REQUEST, "invalid_move"),
            ApiError::Match(err) => match err {
                MatchError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                MatchError::OutOfTurn { .. } => (StatusCode::UNAUTHORIZED, "out_of_turn"),
                MatchError::InvalidMove(_) => (StatusCode::BAD_REQUEST, "invalid_move"),
                MatchError::NotParticipant(_) => (StatusCode::FORBIDDEN, "not_participant"),
                MatchError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                MatchError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_failure"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            // Infrastructure details stay in the logs.
            ApiError::Match(MatchError::Store(err)) => {
                error!(error = %err, "Store failure");
                "Internal storage error".to_string()
            }
            other => {
                warn!(status = %status, code, message = %other, "Request failed");
                other.to_string()
            }
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
