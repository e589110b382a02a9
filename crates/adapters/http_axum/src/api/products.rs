//! JSON REST handlers for shop products.

use axum::Json;
use axum::extract::{Path, Query, State};

use gymhub_domain::form::Form;
use gymhub_domain::id::ProductId;
use gymhub_domain::page::PageRequest;
use gymhub_domain::product::{Product, ProductFilter};

use super::parse_id;
use super::responses::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::extract::{CurrentUser, FormPayload};
use crate::state::{AppState, Backend};

const ENTITY: &str = "Product";

/// `GET /api/products`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<ListResponse<Product>, ApiError> {
    let query = Form::from_pairs(query);
    let filter = ProductFilter::from_form(&query)?;
    let page = PageRequest::from_form(&query, Product::PER_PAGE);
    let products = state.product_service.list_products(&filter, page).await?;
    Ok(ListResponse::Ok(Json(products)))
}

/// `GET /api/products/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Product>, ApiError> {
    let id: ProductId = parse_id(&id, ENTITY)?;
    let product = state.product_service.get_product(id).await?;
    Ok(GetResponse::Ok(Json(product)))
}

/// `POST /api/products`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    FormPayload(form): FormPayload,
) -> Result<CreateResponse<Product>, ApiError> {
    let created = state.product_service.create_product(form).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/products/{id}`
///
/// Uploading `images` replaces the whole gallery.
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    FormPayload(form): FormPayload,
) -> Result<GetResponse<Product>, ApiError> {
    let id: ProductId = parse_id(&id, ENTITY)?;
    let updated = state.product_service.update_product(id, form).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/products/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: ProductId = parse_id(&id, ENTITY)?;
    state.product_service.delete_product(id).await?;
    Ok(DeleteResponse::Deleted("Product deleted successfully"))
}
