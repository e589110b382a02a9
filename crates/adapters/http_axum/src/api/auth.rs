//! Login and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gymhub_domain::error::GymHubError;

use super::responses::MessageBody;
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Possible responses from the login endpoint.
pub enum LoginResponse {
    Ok(Json<TokenBody>),
    InvalidCredentials,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(MessageBody {
                    message: "invalid credentials",
                }),
            )
                .into_response(),
        }
    }
}

/// `POST /api/login`
pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    FormPayload(form): FormPayload,
) -> Result<LoginResponse, ApiError> {
    match state.auth_service.login(&form).await {
        Ok(token) => Ok(LoginResponse::Ok(Json(TokenBody { token }))),
        Err(GymHubError::Unauthorized) => Ok(LoginResponse::InvalidCredentials),
        Err(err) => Err(err.into()),
    }
}

/// Possible responses from the logout endpoint.
pub enum LogoutResponse {
    Ok,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => Json(MessageBody {
                message: "Logged out successfully",
            })
            .into_response(),
        }
    }
}

/// `POST /api/logout`
///
/// Revokes every token of the caller, not only the one presented.
pub async fn logout<B: Backend>(
    State(state): State<AppState<B>>,
    CurrentUser(user): CurrentUser,
) -> Result<LogoutResponse, ApiError> {
    state.auth_service.logout(&user).await?;
    Ok(LogoutResponse::Ok)
}
