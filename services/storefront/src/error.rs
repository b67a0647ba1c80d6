//! Custom error types for the storefront service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::membership::MembershipError;

/// Custom error type for the storefront service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller is not logged in or gave wrong credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::Unauthenticated => ApiError::Unauthorized("Not logged in".to_string()),
            MembershipError::InvalidArgument(_) => {
                ApiError::BadRequest("Invalid product id".to_string())
            }
            MembershipError::NotFound => ApiError::NotFound("Account not found".to_string()),
            MembershipError::StorageFailure(e) => {
                error!("Account storage failure: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::InternalServerError => "Server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_errors_map_to_statuses() {
        let cases = [
            (MembershipError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                MembershipError::InvalidArgument("nope".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (MembershipError::NotFound, StatusCode::NOT_FOUND),
            (
                MembershipError::StorageFailure(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_conflict_status() {
        let response = ApiError::Conflict("Email already in use.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::InternalServerError;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(MembershipError::InvalidArgument("secret-id".to_string()));
        assert_eq!(err.to_string(), "Invalid product id");
    }
}
