use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope returned on every non-2xx response.
///
/// The wire contract is a single `message` field; clients render it
/// directly, so the text must stay human-readable.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error description
    #[schema(example = "Product not found")]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the message placed in the response envelope. Store failures
    /// surface the underlying database error text; this service is an
    /// internal tool and the operators debugging it are the audience.
    pub fn response_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            message: self.response_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// API error type for HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Service(service_error) => {
                return service_error.into_response();
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::DatabaseError(sea_orm::error::DbErr::Custom("boom".into()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_carry_no_variant_prefix() {
        // The envelope text is shown verbatim in the client UI.
        assert_eq!(
            ServiceError::NotFound("Product not found".into()).response_message(),
            "Product not found"
        );
        assert_eq!(
            ServiceError::ValidationError("\"name\" is required".into()).response_message(),
            "\"name\" is required"
        );
    }

    #[tokio::test]
    async fn api_error_serializes_message_envelope() {
        let response =
            ApiError::Service(ServiceError::NotFound("Product not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.message, "Product not found");
    }
}
