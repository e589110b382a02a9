//! JSON REST handlers for training requests.
//!
//! Submitting is public; everything else needs a bearer token.

use axum::Json;
use axum::extract::{Path, Query, State};

use gymhub_domain::form::Form;
use gymhub_domain::id::TrainingRequestId;
use gymhub_domain::page::PageRequest;
use gymhub_domain::training_request::TrainingRequest;

use super::parse_id;
use super::responses::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

const ENTITY: &str = "TrainingRequest";

/// `POST /api/training-requests`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    FormPayload(form): FormPayload,
) -> Result<CreateResponse<TrainingRequest>, ApiError> {
    let stored = state.training_request_service.submit_request(&form).await?;
    Ok(CreateResponse::Created(Json(stored)))
}

/// `GET /api/training-requests`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<ListResponse<TrainingRequest>, ApiError> {
    let page = PageRequest::from_form(&Form::from_pairs(query), TrainingRequest::PER_PAGE);
    let requests = state.training_request_service.list_requests(page).await?;
    Ok(ListResponse::Ok(Json(requests)))
}

/// `GET /api/training-requests/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<GetResponse<TrainingRequest>, ApiError> {
    let id: TrainingRequestId = parse_id(&id, ENTITY)?;
    let request = state.training_request_service.get_request(id).await?;
    Ok(GetResponse::Ok(Json(request)))
}

/// `PUT /api/training-requests/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    FormPayload(form): FormPayload,
) -> Result<GetResponse<TrainingRequest>, ApiError> {
    let id: TrainingRequestId = parse_id(&id, ENTITY)?;
    let updated = state
        .training_request_service
        .update_request(id, &form)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/training-requests/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: TrainingRequestId = parse_id(&id, ENTITY)?;
    state.training_request_service.delete_request(id).await?;
    Ok(DeleteResponse::Deleted("Training request deleted successfully"))
}
