use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use taxtrack_core::{LedgerError, ValidationError};
use tracing::{error, warn};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A [`LedgerError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Connection(_) | LedgerError::Transport(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            LedgerError::Database(_)
            | LedgerError::Configuration(_)
            | LedgerError::Summary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ValidationError::Malformed(rejection.body_text()).into())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ValidationError::Malformed(rejection.body_text()).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use taxtrack_core::calculations::SummaryError;

    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                LedgerError::Validation(ValidationError::BlankJobName),
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::NotFound(3), StatusCode::NOT_FOUND),
            (
                LedgerError::Database("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LedgerError::Connection("refused".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                LedgerError::Summary(SummaryError::Overflow("total income")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError(error).status(), status);
        }
    }

    #[test]
    fn response_carries_status() {
        let response = ApiError(LedgerError::NotFound(3)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
