//! Dashboard counters.

use axum::Json;
use axum::extract::State;

use gymhub_domain::stats::Stats;

use super::responses::GetResponse;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::{AppState, Backend};

/// `GET /api/stats`
pub async fn show<B: Backend>(
    State(state): State<AppState<B>>,
    _user: CurrentUser,
) -> Result<GetResponse<Stats>, ApiError> {
    let stats = Stats {
        services: state.service_service.count_services().await?,
        trainers: state.trainer_service.count_trainers().await?,
        products: state.product_service.count_products().await?,
        news: state.news_service.count_news().await?,
        training_requests: state.training_request_service.count_requests().await?,
    };
    Ok(GetResponse::Ok(Json(stats)))
}
