use crate::errors::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard `{message}` body for update/delete acknowledgements.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product updated successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON body extractor that maps deserialization failures onto the
/// `400 {message}` envelope instead of axum's default rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

/// Picks the single violation surfaced to the client: first failing field
/// in declared order, first error within that field. Bare `required`
/// violations carry no message of their own, so the text is synthesized
/// here from the error code.
pub fn first_violation(errors: &ValidationErrors, field_order: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    field_order.iter().find_map(|field| {
        field_errors
            .get(*field)
            .and_then(|errs| errs.first())
            .map(|err| match err.message.as_ref() {
                Some(message) => message.to_string(),
                None if err.code == "required" => format!("\"{}\" is required", field),
                None => format!("\"{}\" is invalid", field),
            })
    })
}

/// `ceil(total / limit)`, with the degenerate cases pinned down: an empty
/// result set has zero pages, and a non-positive limit never divides.
pub fn total_pages(total: u64, limit: i64) -> u64 {
    if limit <= 0 || total == 0 {
        return 0;
    }
    let limit = limit as u64;
    (total + limit - 1) / limit
}
