//! Request extractors shared by the API handlers.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;

use gymhub_domain::error::GymHubError;
use gymhub_domain::form::{Form, Upload};
use gymhub_domain::user::User;

use crate::error::ApiError;
use crate::state::{AppState, Backend};

/// The user owning the bearer token of the request.
///
/// Rejects with 401 when the `Authorization` header is missing, is not a
/// bearer token, or names an unknown or revoked token.
pub struct CurrentUser(pub User);

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

impl<B: Backend> FromRequestParts<AppState<B>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<B>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(GymHubError::Unauthorized)?;
        let user = state.auth_service.authenticate(&token).await?;
        Ok(Self(user))
    }
}

/// A write payload decoded from JSON, multipart or url-encoded bodies.
pub struct FormPayload(pub Form);

enum Encoding {
    Json,
    Multipart,
    UrlEncoded,
    Unspecified,
}

fn encoding(req: &Request) -> Encoding {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        Encoding::Multipart
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Encoding::UrlEncoded
    } else if content_type.starts_with("application/json") || content_type.ends_with("+json") {
        Encoding::Json
    } else {
        Encoding::Unspecified
    }
}

fn json_form(bytes: &[u8]) -> Result<Form, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Form::new());
    }
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| ApiError::malformed_body())?;
    Form::from_json(value).map_err(|_| ApiError::malformed_body())
}

async fn multipart_form(mut multipart: Multipart) -> Result<Form, ApiError> {
    let mut form = Form::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::malformed_body())?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|_| ApiError::malformed_body())?;
                // browsers send an empty part for an untouched file input
                if file_name.is_empty() && bytes.is_empty() {
                    form.mark_present(&name);
                } else {
                    form.push_file(&name, Upload::new(file_name, content_type, bytes.to_vec()));
                }
            }
            None => {
                let text = field.text().await.map_err(|_| ApiError::malformed_body())?;
                form.push_text(&name, text);
            }
        }
    }
    Ok(form)
}

impl<S: Send + Sync> FromRequest<S> for FormPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = match encoding(&req) {
            Encoding::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::malformed_body())?;
                multipart_form(multipart).await?
            }
            Encoding::UrlEncoded => {
                let axum::Form(pairs) = axum::Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::malformed_body())?;
                Form::from_pairs(pairs)
            }
            Encoding::Json | Encoding::Unspecified => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::malformed_body())?;
                json_form(&bytes)?
            }
        };
        Ok(Self(form))
    }
}
