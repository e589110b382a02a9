//! JSON REST handlers for trainers.

use axum::Json;
use axum::extract::{Path, Query, State};

use gymhub_domain::form::Form;
use gymhub_domain::id::TrainerId;
use gymhub_domain::page::PageRequest;
use gymhub_domain::trainer::{Trainer, TrainerFilter, TrainerWithServices};

use super::parse_id;
use super::responses::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

const ENTITY: &str = "Trainer";

/// `GET /api/trainers`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<ListResponse<TrainerWithServices>, ApiError> {
    let query = Form::from_pairs(query);
    let filter = TrainerFilter::from_form(&query)?;
    let page = PageRequest::from_form(&query, Trainer::PER_PAGE);
    let trainers = state.trainer_service.list_trainers(&filter, page).await?;
    Ok(ListResponse::Ok(Json(trainers)))
}

/// `GET /api/trainers/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse<TrainerWithServices>, ApiError> {
    let id: TrainerId = parse_id(&id, ENTITY)?;
    let trainer = state.trainer_service.get_trainer(id).await?;
    Ok(GetResponse::Ok(Json(trainer)))
}

/// `POST /api/trainers`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    FormPayload(form): FormPayload,
) -> Result<CreateResponse<TrainerWithServices>, ApiError> {
    let created = state.trainer_service.create_trainer(form).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/trainers/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    FormPayload(form): FormPayload,
) -> Result<GetResponse<TrainerWithServices>, ApiError> {
    let id: TrainerId = parse_id(&id, ENTITY)?;
    let updated = state.trainer_service.update_trainer(id, form).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/trainers/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: TrainerId = parse_id(&id, ENTITY)?;
    state.trainer_service.delete_trainer(id).await?;
    Ok(DeleteResponse::Deleted("Trainer deleted successfully"))
}
