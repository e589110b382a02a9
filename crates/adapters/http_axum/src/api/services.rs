//! JSON REST handlers for gym services.

use axum::Json;
use axum::extract::{Path, Query, State};

use gymhub_domain::form::Form;
use gymhub_domain::id::ServiceId;
use gymhub_domain::page::PageRequest;
use gymhub_domain::service::{Service, ServiceFilter, ServiceWithTrainers};

use super::parse_id;
use super::responses::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

const ENTITY: &str = "Service";

/// `GET /api/services`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<ListResponse<ServiceWithTrainers>, ApiError> {
    let query = Form::from_pairs(query);
    let filter = ServiceFilter::from_form(&query)?;
    let page = PageRequest::from_form(&query, Service::PER_PAGE);
    let services = state.service_service.list_services(&filter, page).await?;
    Ok(ListResponse::Ok(Json(services)))
}

/// `GET /api/services/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse<ServiceWithTrainers>, ApiError> {
    let id: ServiceId = parse_id(&id, ENTITY)?;
    let service = state.service_service.get_service(id).await?;
    Ok(GetResponse::Ok(Json(service)))
}

/// `POST /api/services`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    FormPayload(form): FormPayload,
) -> Result<CreateResponse<ServiceWithTrainers>, ApiError> {
    let created = state.service_service.create_service(form).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/services/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    FormPayload(form): FormPayload,
) -> Result<GetResponse<ServiceWithTrainers>, ApiError> {
    let id: ServiceId = parse_id(&id, ENTITY)?;
    let updated = state.service_service.update_service(id, form).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/services/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: ServiceId = parse_id(&id, ENTITY)?;
    state.service_service.delete_service(id).await?;
    Ok(DeleteResponse::Deleted("Service deleted successfully"))
}
