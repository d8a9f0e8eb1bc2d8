//! JSON extractor that reports body errors in the API error format

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Wrapper around `axum::Json` whose rejections are JSON bodies matching
/// the API error shape instead of plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// JSON rejection carrying the API error format
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(JsonRejection {
                status: rejection.status(),
                message: rejection_message(&rejection),
            }),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        _ => "Invalid JSON request".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rejection_into_response() {
        let rejection = JsonRejection {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Test error".to_string(),
        };

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
