//! JSON REST handlers for news posts.

use axum::Json;
use axum::extract::{Path, Query, State};

use gymhub_domain::form::Form;
use gymhub_domain::id::NewsId;
use gymhub_domain::news::News;
use gymhub_domain::page::PageRequest;

use super::parse_id;
use super::responses::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

const ENTITY: &str = "News";

/// `GET /api/news`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<ListResponse<News>, ApiError> {
    let page = PageRequest::from_form(&Form::from_pairs(query), News::PER_PAGE);
    let news = state.news_service.list_news(page).await?;
    Ok(ListResponse::Ok(Json(news)))
}

/// `GET /api/news/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse<News>, ApiError> {
    let id: NewsId = parse_id(&id, ENTITY)?;
    let news = state.news_service.get_news(id).await?;
    Ok(GetResponse::Ok(Json(news)))
}

/// `POST /api/news`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    FormPayload(form): FormPayload,
) -> Result<CreateResponse<News>, ApiError> {
    let created = state.news_service.create_news(form).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/news/{id}`
///
/// Partial update: absent fields keep their stored value.
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    FormPayload(form): FormPayload,
) -> Result<GetResponse<News>, ApiError> {
    let id: NewsId = parse_id(&id, ENTITY)?;
    let updated = state.news_service.update_news(id, form).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/news/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: NewsId = parse_id(&id, ENTITY)?;
    state.news_service.delete_news(id).await?;
    Ok(DeleteResponse::Deleted("News deleted successfully"))
}
