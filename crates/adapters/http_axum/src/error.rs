//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gymhub_domain::error::{GymHubError, NotFoundError, ValidationErrors};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody<D> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<D>,
}

/// Maps [`GymHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(GymHubError);

impl ApiError {
    /// A body that could not be decoded into a form.
    pub(crate) fn malformed_body() -> Self {
        Self(ValidationErrors::single("body", "The request body could not be parsed.").into())
    }

    /// A path id that is not a valid record id.
    pub(crate) fn unknown_id(entity: &'static str, raw: &str) -> Self {
        Self(
            NotFoundError {
                entity,
                id: raw.to_string(),
            }
            .into(),
        )
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> GymHubError {
        self.0
    }
}

impl From<GymHubError> for ApiError {
    fn from(err: GymHubError) -> Self {
        Self(err)
    }
}

fn detail_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            GymHubError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: "validation failed".to_string(),
                    details: Some(errors),
                }),
            )
                .into_response(),
            GymHubError::NotFound(err) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::<()> {
                    error: err.to_string(),
                    details: None,
                }),
            )
                .into_response(),
            GymHubError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::<()> {
                    error: "unauthenticated".to_string(),
                    details: None,
                }),
            )
                .into_response(),
            err @ (GymHubError::Storage(_)
            | GymHubError::Files(_)
            | GymHubError::Credentials(_)) => {
                let details = detail_chain(&err);
                tracing::error!(error = %details, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal server error".to_string(),
                        details: Some(details),
                    }),
                )
                    .into_response()
            }
        }
    }
}
