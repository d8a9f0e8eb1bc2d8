//! API error types and their mapping from domain errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories exposed over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ConflictError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// JSON error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidId { message } => Self::bad_request(message).with_param("id"),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Configuration { message }
            | DomainError::Storage { message }
            | DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid email format");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
        assert_eq!(err.response.error.message, "Invalid email format");
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::not_found("User not found").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);

        let api_err: ApiError = DomainError::conflict("Email taken").into();
        assert_eq!(api_err.status, StatusCode::CONFLICT);

        let api_err: ApiError = DomainError::invalid_id("bad uuid").into();
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.response.error.param, Some("id".to_string()));

        let api_err: ApiError = DomainError::storage("connection lost").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::conflict("Email 'a@b.co' is already registered");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("conflict_error"));
        assert!(json.contains("already registered"));
        // No param set, so the field is omitted
        assert!(!json.contains("param"));
    }
}
