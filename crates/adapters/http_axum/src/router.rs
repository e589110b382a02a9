//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::{AppState, Backend};

/// Request bodies above this size are rejected. Leaves room for three
/// product images of 2 MiB each plus form overhead.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and serves `storage_root` under
/// `/storage`. Includes a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<B: Backend>(state: AppState<B>, storage_root: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes::<B>())
        .nest_service("/storage", ServeDir::new(storage_root))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, StatusCode};
    use gymhub_app::ports::{
        FileStore, NewsRepository, ProductRepository, ServiceRepository, TokenRepository,
        TrainerRepository, TrainingRequestRepository, UserRepository,
    };
    use gymhub_app::services::auth_service::AuthService;
    use gymhub_app::services::news_service::NewsService;
    use gymhub_app::services::product_service::ProductService;
    use gymhub_app::services::service_service::ServiceService;
    use gymhub_app::services::trainer_service::TrainerService;
    use gymhub_app::services::training_request_service::TrainingRequestService;
    use gymhub_domain::error::GymHubError;
    use gymhub_domain::form::Upload;
    use gymhub_domain::id::{NewsId, ProductId, ServiceId, TokenId, TrainerId, TrainingRequestId, UserId};
    use gymhub_domain::news::{NewNews, News};
    use gymhub_domain::page::{Page, PageRequest};
    use gymhub_domain::product::{NewProduct, Product, ProductFilter};
    use gymhub_domain::service::{NewService, Service, ServiceFilter, ServiceWithTrainers};
    use gymhub_domain::time::Timestamp;
    use gymhub_domain::trainer::{NewTrainer, Trainer, TrainerFilter, TrainerWithServices};
    use gymhub_domain::training_request::{TrainingRequest, TrainingRequestDraft};
    use gymhub_domain::user::{AccessToken, NewUser, User};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Empty catalog that refuses every write.
    struct Stub;

    fn refused() -> GymHubError {
        GymHubError::Storage("writes are not supported".into())
    }

    impl ServiceRepository for Stub {
        async fn create(
            &self,
            _service: NewService,
            _trainers: &[TrainerId],
        ) -> Result<ServiceWithTrainers, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(&self, _id: ServiceId) -> Result<Option<ServiceWithTrainers>, GymHubError> {
            Ok(None)
        }
        async fn list(
            &self,
            _filter: &ServiceFilter,
            page: PageRequest,
        ) -> Result<Page<ServiceWithTrainers>, GymHubError> {
            Ok(Page::new(vec![], page, 0))
        }
        async fn update(
            &self,
            _service: Service,
            _trainers: Option<&[TrainerId]>,
        ) -> Result<ServiceWithTrainers, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _id: ServiceId) -> Result<(), GymHubError> {
            Err(refused())
        }
        async fn count(&self) -> Result<u64, GymHubError> {
            Ok(0)
        }
        async fn find_missing_trainers(
            &self,
            ids: &[TrainerId],
        ) -> Result<Vec<TrainerId>, GymHubError> {
            Ok(ids.to_vec())
        }
    }

    impl TrainerRepository for Stub {
        async fn create(
            &self,
            _trainer: NewTrainer,
            _services: &[ServiceId],
        ) -> Result<TrainerWithServices, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(&self, _id: TrainerId) -> Result<Option<TrainerWithServices>, GymHubError> {
            Ok(None)
        }
        async fn list(
            &self,
            _filter: &TrainerFilter,
            page: PageRequest,
        ) -> Result<Page<TrainerWithServices>, GymHubError> {
            Ok(Page::new(vec![], page, 0))
        }
        async fn update(
            &self,
            _trainer: Trainer,
            _services: Option<&[ServiceId]>,
        ) -> Result<TrainerWithServices, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _id: TrainerId) -> Result<(), GymHubError> {
            Err(refused())
        }
        async fn count(&self) -> Result<u64, GymHubError> {
            Ok(0)
        }
        async fn find_missing_services(
            &self,
            ids: &[ServiceId],
        ) -> Result<Vec<ServiceId>, GymHubError> {
            Ok(ids.to_vec())
        }
    }

    impl ProductRepository for Stub {
        async fn create(&self, _product: NewProduct) -> Result<Product, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(&self, _id: ProductId) -> Result<Option<Product>, GymHubError> {
            Ok(None)
        }
        async fn list(
            &self,
            _filter: &ProductFilter,
            page: PageRequest,
        ) -> Result<Page<Product>, GymHubError> {
            Ok(Page::new(vec![], page, 0))
        }
        async fn update(&self, _product: Product) -> Result<Product, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _id: ProductId) -> Result<(), GymHubError> {
            Err(refused())
        }
        async fn count(&self) -> Result<u64, GymHubError> {
            Ok(0)
        }
    }

    impl NewsRepository for Stub {
        async fn create(&self, _news: NewNews) -> Result<News, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(&self, _id: NewsId) -> Result<Option<News>, GymHubError> {
            Ok(None)
        }
        async fn list(&self, page: PageRequest) -> Result<Page<News>, GymHubError> {
            Ok(Page::new(vec![], page, 0))
        }
        async fn update(&self, _news: News) -> Result<News, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _id: NewsId) -> Result<(), GymHubError> {
            Err(refused())
        }
        async fn count(&self) -> Result<u64, GymHubError> {
            Ok(0)
        }
    }

    impl TrainingRequestRepository for Stub {
        async fn create(
            &self,
            _request: TrainingRequestDraft,
        ) -> Result<TrainingRequest, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(
            &self,
            _id: TrainingRequestId,
        ) -> Result<Option<TrainingRequest>, GymHubError> {
            Ok(None)
        }
        async fn list(&self, page: PageRequest) -> Result<Page<TrainingRequest>, GymHubError> {
            Ok(Page::new(vec![], page, 0))
        }
        async fn update(&self, _request: TrainingRequest) -> Result<TrainingRequest, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _id: TrainingRequestId) -> Result<(), GymHubError> {
            Err(refused())
        }
        async fn count(&self) -> Result<u64, GymHubError> {
            Ok(0)
        }
    }

    impl UserRepository for Stub {
        async fn create(&self, _user: NewUser) -> Result<User, GymHubError> {
            Err(refused())
        }
        async fn get_by_id(&self, _id: UserId) -> Result<Option<User>, GymHubError> {
            Ok(None)
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, GymHubError> {
            Ok(None)
        }
    }

    impl TokenRepository for Stub {
        async fn create(
            &self,
            _user_id: UserId,
            _name: &str,
            _token_hash: &str,
        ) -> Result<AccessToken, GymHubError> {
            Err(refused())
        }
        async fn find_by_hash(&self, _token_hash: &str) -> Result<Option<AccessToken>, GymHubError> {
            Ok(None)
        }
        async fn touch(&self, _id: TokenId, _at: Timestamp) -> Result<(), GymHubError> {
            Ok(())
        }
        async fn delete_for_user(&self, _user_id: UserId) -> Result<u64, GymHubError> {
            Ok(0)
        }
    }

    impl FileStore for Stub {
        async fn store(&self, _directory: &str, _upload: Upload) -> Result<String, GymHubError> {
            Err(refused())
        }
        async fn delete(&self, _path: &str) -> Result<(), GymHubError> {
            Ok(())
        }
    }

    struct StubBackend;

    impl Backend for StubBackend {
        type Services = Stub;
        type Trainers = Stub;
        type Products = Stub;
        type News = Stub;
        type TrainingRequests = Stub;
        type Users = Stub;
        type Tokens = Stub;
        type Files = Stub;
    }

    fn test_app() -> Router {
        let state = AppState::<StubBackend>::new(
            AuthService::new(Stub, Stub),
            ServiceService::new(Stub, Stub),
            TrainerService::new(Stub, Stub),
            ProductService::new(Stub, Stub),
            NewsService::new(Stub, Stub),
            TrainingRequestService::new(Stub),
        );
        build(state, Path::new("storage/public"))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_empty_page_envelope_when_listing_services() {
        let response = test_app()
            .oneshot(get_request("/api/services?page=0"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["current_page"], 1);
        assert_eq!(body["per_page"], 5);
        assert_eq!(body["total"], 0);
        assert_eq!(body["last_page"], 1);
    }

    #[tokio::test]
    async fn should_reject_non_numeric_price_filter() {
        let response = test_app()
            .oneshot(get_request("/api/products?min_price=cheap"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["details"].get("min_price").is_some());
    }

    #[tokio::test]
    async fn should_return_not_found_for_non_numeric_id() {
        let response = test_app()
            .oneshot(get_request("/api/trainers/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_require_bearer_token_for_writes_and_stats() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_post("/api/services", r#"{"title":"Yoga"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "unauthenticated");

        let response = app.oneshot(get_request("/api/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_answer_invalid_credentials_for_unknown_email() {
        let response = test_app()
            .oneshot(json_post(
                "/api/login",
                r#"{"email":"nobody@gym.example","password":"secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "invalid credentials"})
        );
    }

    #[tokio::test]
    async fn should_reject_training_request_without_consent() {
        let response = test_app()
            .oneshot(json_post(
                "/api/training-requests",
                r#"{"name":"Ivan","phone":"123","consent":false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["details"].get("consent").is_some());
    }

    #[tokio::test]
    async fn should_decode_url_encoded_training_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/training-requests")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Ivan&phone=123&consent=0"))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let details = json_body(response).await["details"].clone();
        assert!(details.get("consent").is_some());
        assert!(details.get("name").is_none());
        assert!(details.get("phone").is_none());
    }
}
