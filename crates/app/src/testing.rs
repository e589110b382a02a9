//! In-memory port implementations shared by the service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::form::Upload;
use gymhub_domain::id::{
    NewsId, ProductId, ServiceId, TokenId, TrainerId, TrainingRequestId, UserId,
};
use gymhub_domain::news::{NewNews, News};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::product::{NewProduct, Product, ProductFilter};
use gymhub_domain::service::{NewService, Service, ServiceFilter, ServiceWithTrainers};
use gymhub_domain::time::{now, Timestamp};
use gymhub_domain::trainer::{NewTrainer, Trainer, TrainerFilter, TrainerWithServices};
use gymhub_domain::training_request::{TrainingRequest, TrainingRequestDraft};
use gymhub_domain::user::{AccessToken, NewUser, User};

use crate::ports::{
    FileStore, NewsRepository, ProductRepository, ServiceRepository, TokenRepository,
    TrainerRepository, TrainingRequestRepository, UserRepository,
};

fn refused() -> GymHubError {
    GymHubError::Storage(Box::new(std::io::Error::other("write refused")))
}

fn not_found(entity: &'static str, id: impl ToString) -> GymHubError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(usize::try_from(request.offset()).unwrap())
        .take(usize::try_from(request.limit()).unwrap())
        .collect();
    Page::new(data, request, total)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Default)]
pub(crate) struct Catalog {
    next_id: i64,
    fail_writes: bool,
    services: BTreeMap<ServiceId, Service>,
    trainers: BTreeMap<TrainerId, Trainer>,
    links: BTreeSet<(ServiceId, TrainerId)>,
    products: BTreeMap<ProductId, Product>,
    news: BTreeMap<NewsId, News>,
    requests: BTreeMap<TrainingRequestId, TrainingRequest>,
    users: BTreeMap<UserId, User>,
    tokens: BTreeMap<TokenId, AccessToken>,
}

impl Catalog {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_writable(&self) -> Result<(), GymHubError> {
        if self.fail_writes { Err(refused()) } else { Ok(()) }
    }

    fn service_with_trainers(&self, service: &Service) -> ServiceWithTrainers {
        let trainers = self
            .links
            .iter()
            .filter(|(service_id, _)| *service_id == service.id)
            .filter_map(|(_, trainer_id)| self.trainers.get(trainer_id).cloned())
            .collect();
        ServiceWithTrainers {
            service: service.clone(),
            trainers,
        }
    }

    fn trainer_with_services(&self, trainer: &Trainer) -> TrainerWithServices {
        let services = self
            .links
            .iter()
            .filter(|(_, trainer_id)| *trainer_id == trainer.id)
            .filter_map(|(service_id, _)| self.services.get(service_id).cloned())
            .collect();
        TrainerWithServices {
            trainer: trainer.clone(),
            services,
        }
    }

    fn service_count(&self, trainer: TrainerId) -> u32 {
        let count = self.links.iter().filter(|(_, t)| *t == trainer).count();
        u32::try_from(count).unwrap()
    }
}

/// Every repository port backed by one shared in-memory catalog.
#[derive(Clone, Default)]
pub(crate) struct InMemoryCatalog(Arc<Mutex<Catalog>>);

impl InMemoryCatalog {
    fn state(&self) -> MutexGuard<'_, Catalog> {
        self.0.lock().unwrap()
    }

    /// Make every subsequent write fail with a storage error.
    pub(crate) fn fail_writes(&self) {
        self.state().fail_writes = true;
    }

    pub(crate) fn add_trainer(&self, first_name: &str, last_name: &str) -> TrainerId {
        let mut state = self.state();
        let id = TrainerId::new(state.next());
        let ts = now();
        state.trainers.insert(
            id,
            Trainer {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                description: "coach".to_string(),
                photo: None,
                created_at: ts,
                updated_at: ts,
            },
        );
        id
    }

    pub(crate) fn add_service(&self, title: &str, price: f64) -> ServiceId {
        let mut state = self.state();
        let id = ServiceId::new(state.next());
        let ts = now();
        state.services.insert(
            id,
            Service {
                id,
                title: title.to_string(),
                description: "class".to_string(),
                price,
                image: None,
                created_at: ts,
                updated_at: ts,
            },
        );
        id
    }

    pub(crate) fn link(&self, service: ServiceId, trainer: TrainerId) {
        self.state().links.insert((service, trainer));
    }

    pub(crate) fn links(&self) -> Vec<(ServiceId, TrainerId)> {
        self.state().links.iter().copied().collect()
    }

    pub(crate) fn tokens(&self) -> Vec<AccessToken> {
        self.state().tokens.values().cloned().collect()
    }
}

impl ServiceRepository for InMemoryCatalog {
    async fn create(
        &self,
        service: NewService,
        trainers: &[TrainerId],
    ) -> Result<ServiceWithTrainers, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = ServiceId::new(state.next());
        let ts = now();
        let service = Service {
            id,
            title: service.title,
            description: service.description,
            price: service.price,
            image: service.image,
            created_at: ts,
            updated_at: ts,
        };
        state.services.insert(id, service.clone());
        for trainer in trainers {
            state.links.insert((id, *trainer));
        }
        Ok(state.service_with_trainers(&service))
    }

    async fn get_by_id(&self, id: ServiceId) -> Result<Option<ServiceWithTrainers>, GymHubError> {
        let state = self.state();
        Ok(state
            .services
            .get(&id)
            .map(|service| state.service_with_trainers(service)))
    }

    async fn list(
        &self,
        filter: &ServiceFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceWithTrainers>, GymHubError> {
        let state = self.state();
        let matching = state
            .services
            .values()
            .filter(|s| filter.title.as_deref().is_none_or(|t| contains_ci(&s.title, t)))
            .filter(|s| filter.min_price.is_none_or(|min| s.price >= min))
            .filter(|s| filter.max_price.is_none_or(|max| s.price <= max))
            .filter(|s| {
                filter
                    .trainer_id
                    .is_none_or(|trainer| state.links.contains(&(s.id, trainer)))
            })
            .map(|s| state.service_with_trainers(s))
            .collect();
        Ok(paginate(matching, page))
    }

    async fn update(
        &self,
        mut service: Service,
        trainers: Option<&[TrainerId]>,
    ) -> Result<ServiceWithTrainers, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        if !state.services.contains_key(&service.id) {
            return Err(not_found("Service", service.id));
        }
        service.updated_at = now();
        state.services.insert(service.id, service.clone());
        if let Some(trainers) = trainers {
            state.links.retain(|(s, _)| *s != service.id);
            for trainer in trainers {
                state.links.insert((service.id, *trainer));
            }
        }
        Ok(state.service_with_trainers(&service))
    }

    async fn delete(&self, id: ServiceId) -> Result<(), GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        state.links.retain(|(s, _)| *s != id);
        state
            .services
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Service", id))
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        Ok(self.state().services.len() as u64)
    }

    async fn find_missing_trainers(
        &self,
        ids: &[TrainerId],
    ) -> Result<Vec<TrainerId>, GymHubError> {
        let state = self.state();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.trainers.contains_key(id))
            .collect())
    }
}

impl TrainerRepository for InMemoryCatalog {
    async fn create(
        &self,
        trainer: NewTrainer,
        services: &[ServiceId],
    ) -> Result<TrainerWithServices, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = TrainerId::new(state.next());
        let ts = now();
        let trainer = Trainer {
            id,
            first_name: trainer.first_name,
            last_name: trainer.last_name,
            description: trainer.description,
            photo: trainer.photo,
            created_at: ts,
            updated_at: ts,
        };
        state.trainers.insert(id, trainer.clone());
        for service in services {
            state.links.insert((*service, id));
        }
        Ok(state.trainer_with_services(&trainer))
    }

    async fn get_by_id(&self, id: TrainerId) -> Result<Option<TrainerWithServices>, GymHubError> {
        let state = self.state();
        Ok(state
            .trainers
            .get(&id)
            .map(|trainer| state.trainer_with_services(trainer)))
    }

    async fn list(
        &self,
        filter: &TrainerFilter,
        page: PageRequest,
    ) -> Result<Page<TrainerWithServices>, GymHubError> {
        let state = self.state();
        let matching = state
            .trainers
            .values()
            .filter(|t| {
                filter.name.as_deref().is_none_or(|name| {
                    contains_ci(&t.first_name, name) || contains_ci(&t.last_name, name)
                })
            })
            .filter(|t| {
                filter
                    .service_id
                    .is_none_or(|service| state.links.contains(&(service, t.id)))
            })
            .filter(|t| filter.min_services.is_none_or(|min| state.service_count(t.id) >= min))
            .filter(|t| filter.max_services.is_none_or(|max| state.service_count(t.id) <= max))
            .map(|t| state.trainer_with_services(t))
            .collect();
        Ok(paginate(matching, page))
    }

    async fn update(
        &self,
        mut trainer: Trainer,
        services: Option<&[ServiceId]>,
    ) -> Result<TrainerWithServices, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        if !state.trainers.contains_key(&trainer.id) {
            return Err(not_found("Trainer", trainer.id));
        }
        trainer.updated_at = now();
        state.trainers.insert(trainer.id, trainer.clone());
        if let Some(services) = services {
            state.links.retain(|(_, t)| *t != trainer.id);
            for service in services {
                state.links.insert((*service, trainer.id));
            }
        }
        Ok(state.trainer_with_services(&trainer))
    }

    async fn delete(&self, id: TrainerId) -> Result<(), GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        state.links.retain(|(_, t)| *t != id);
        state
            .trainers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Trainer", id))
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        Ok(self.state().trainers.len() as u64)
    }

    async fn find_missing_services(
        &self,
        ids: &[ServiceId],
    ) -> Result<Vec<ServiceId>, GymHubError> {
        let state = self.state();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.services.contains_key(id))
            .collect())
    }
}

impl ProductRepository for InMemoryCatalog {
    async fn create(&self, product: NewProduct) -> Result<Product, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = ProductId::new(state.next());
        let ts = now();
        let product = Product {
            id,
            title: product.title,
            description: product.description,
            price: product.price,
            color: product.color,
            composition: product.composition,
            images: product.images,
            created_at: ts,
            updated_at: ts,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, GymHubError> {
        Ok(self.state().products.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, GymHubError> {
        let matching = self
            .state()
            .products
            .values()
            .filter(|p| filter.title.as_deref().is_none_or(|t| contains_ci(&p.title, t)))
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn update(&self, mut product: Product) -> Result<Product, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        if !state.products.contains_key(&product.id) {
            return Err(not_found("Product", product.id));
        }
        product.updated_at = now();
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<(), GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        state
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Product", id))
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        Ok(self.state().products.len() as u64)
    }
}

impl NewsRepository for InMemoryCatalog {
    async fn create(&self, news: NewNews) -> Result<News, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = NewsId::new(state.next());
        let ts = now();
        let news = News {
            id,
            title: news.title,
            description: news.description,
            image: news.image,
            created_at: ts,
            updated_at: ts,
        };
        state.news.insert(id, news.clone());
        Ok(news)
    }

    async fn get_by_id(&self, id: NewsId) -> Result<Option<News>, GymHubError> {
        Ok(self.state().news.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<News>, GymHubError> {
        let all = self.state().news.values().cloned().collect();
        Ok(paginate(all, page))
    }

    async fn update(&self, mut news: News) -> Result<News, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        if !state.news.contains_key(&news.id) {
            return Err(not_found("News", news.id));
        }
        news.updated_at = now();
        state.news.insert(news.id, news.clone());
        Ok(news)
    }

    async fn delete(&self, id: NewsId) -> Result<(), GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        state
            .news
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("News", id))
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        Ok(self.state().news.len() as u64)
    }
}

impl TrainingRequestRepository for InMemoryCatalog {
    async fn create(&self, request: TrainingRequestDraft) -> Result<TrainingRequest, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = TrainingRequestId::new(state.next());
        let ts = now();
        let request = TrainingRequest {
            id,
            name: request.name,
            phone: request.phone,
            message: request.message,
            consent: true,
            created_at: ts,
            updated_at: ts,
        };
        state.requests.insert(id, request.clone());
        Ok(request)
    }

    async fn get_by_id(
        &self,
        id: TrainingRequestId,
    ) -> Result<Option<TrainingRequest>, GymHubError> {
        Ok(self.state().requests.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TrainingRequest>, GymHubError> {
        let newest_first = self.state().requests.values().rev().cloned().collect();
        Ok(paginate(newest_first, page))
    }

    async fn update(&self, mut request: TrainingRequest) -> Result<TrainingRequest, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        if !state.requests.contains_key(&request.id) {
            return Err(not_found("TrainingRequest", request.id));
        }
        request.updated_at = now();
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn delete(&self, id: TrainingRequestId) -> Result<(), GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        state
            .requests
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("TrainingRequest", id))
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        Ok(self.state().requests.len() as u64)
    }
}

impl UserRepository for InMemoryCatalog {
    async fn create(&self, user: NewUser) -> Result<User, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = UserId::new(state.next());
        let ts = now();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: ts,
            updated_at: ts,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, GymHubError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, GymHubError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

impl TokenRepository for InMemoryCatalog {
    async fn create(
        &self,
        user_id: UserId,
        name: &str,
        token_hash: &str,
    ) -> Result<AccessToken, GymHubError> {
        let mut state = self.state();
        state.check_writable()?;
        let id = TokenId::new(state.next());
        let token = AccessToken {
            id,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            last_used_at: None,
            created_at: now(),
        };
        state.tokens.insert(id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, GymHubError> {
        Ok(self
            .state()
            .tokens
            .values()
            .find(|token| token.token_hash == token_hash)
            .cloned())
    }

    async fn touch(&self, id: TokenId, at: Timestamp) -> Result<(), GymHubError> {
        if let Some(token) = self.state().tokens.get_mut(&id) {
            token.last_used_at = Some(at);
        }
        Ok(())
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64, GymHubError> {
        let mut state = self.state();
        let before = state.tokens.len();
        state.tokens.retain(|_, token| token.user_id != user_id);
        Ok((before - state.tokens.len()) as u64)
    }
}

#[derive(Default)]
struct FilesState {
    paths: BTreeSet<String>,
    counter: u64,
    /// Stores allowed before every further store fails.
    budget: Option<usize>,
}

/// File store keeping only the stored paths.
#[derive(Clone, Default)]
pub(crate) struct InMemoryFiles(Arc<Mutex<FilesState>>);

impl InMemoryFiles {
    fn state(&self) -> MutexGuard<'_, FilesState> {
        self.0.lock().unwrap()
    }

    /// Let `count` more stores succeed, then fail.
    pub(crate) fn fail_after(&self, count: usize) {
        self.state().budget = Some(count);
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.state().paths.iter().cloned().collect()
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.state().paths.contains(path)
    }
}

impl FileStore for InMemoryFiles {
    async fn store(&self, directory: &str, upload: Upload) -> Result<String, GymHubError> {
        let mut state = self.state();
        match state.budget {
            Some(0) => {
                return Err(GymHubError::Files(Box::new(std::io::Error::other(
                    "disk full",
                ))));
            }
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        state.counter += 1;
        let extension = upload.extension().unwrap_or_else(|| "bin".to_string());
        let path = format!("{directory}/file{}.{extension}", state.counter);
        state.paths.insert(path.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), GymHubError> {
        self.state().paths.remove(path);
        Ok(())
    }
}
