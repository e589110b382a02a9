//! `SQLite` implementation of [`ServiceRepository`].

use std::future::Future;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use gymhub_app::ports::ServiceRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::service::{NewService, Service, ServiceFilter, ServiceWithTrainers};
use gymhub_domain::time::now;

use crate::error::StorageError;
use crate::query::{fetch_page, push_like};
use crate::relations;
use crate::rows::ServiceRow;

const INSERT: &str = r"
    INSERT INTO services (title, description, price, image, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM services WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM services";
const UPDATE: &str = r"
    UPDATE services
    SET title = ?, description = ?, price = ?, image = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM services WHERE id = ?";

fn not_found(id: ServiceId) -> GymHubError {
    NotFoundError {
        entity: "Service",
        id: id.to_string(),
    }
    .into()
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ServiceFilter) {
    if let Some(title) = &filter.title {
        push_like(builder, "title", title);
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max);
    }
    if let Some(trainer) = filter.trainer_id {
        builder
            .push(" AND id IN (SELECT service_id FROM service_trainer WHERE trainer_id = ")
            .push_bind(trainer.get())
            .push(")");
    }
}

async fn load(pool: &SqlitePool, id: ServiceId) -> Result<Option<ServiceWithTrainers>, sqlx::Error> {
    let row: Option<ServiceRow> = sqlx::query_as(SELECT_BY_ID)
        .bind(id.get())
        .fetch_optional(pool)
        .await?;
    let Some(ServiceRow(service)) = row else {
        return Ok(None);
    };
    let mut trainers = relations::trainers_by_service(pool, &[id]).await?;
    Ok(Some(ServiceWithTrainers {
        trainers: trainers.remove(&id).unwrap_or_default(),
        service,
    }))
}

/// `SQLite`-backed service repository.
#[derive(Clone)]
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ServiceRepository for SqliteServiceRepository {
    fn create(
        &self,
        service: NewService,
        trainers: &[TrainerId],
    ) -> impl Future<Output = Result<ServiceWithTrainers, GymHubError>> + Send {
        let pool = self.pool.clone();
        let trainers = trainers.to_vec();
        async move {
            let ts = now().to_rfc3339();
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let result = sqlx::query(INSERT)
                .bind(&service.title)
                .bind(&service.description)
                .bind(service.price)
                .bind(&service.image)
                .bind(&ts)
                .bind(&ts)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let id = ServiceId::new(result.last_insert_rowid());

            let pairs: Vec<_> = trainers.iter().map(|trainer| (id, *trainer)).collect();
            relations::attach(&mut *tx, &pairs)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            load(&pool, id)
                .await
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(id))
        }
    }

    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<ServiceWithTrainers>, GymHubError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(load(&pool, id).await.map_err(StorageError::from)?) }
    }

    fn list(
        &self,
        filter: &ServiceFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceWithTrainers>, GymHubError>> + Send {
        let pool = self.pool.clone();
        let filter = filter.clone();
        async move {
            let rows: Page<ServiceRow> = fetch_page(&pool, "services", "id", page, |builder| {
                push_filters(builder, &filter);
            })
            .await
            .map_err(StorageError::from)?;

            let ids: Vec<ServiceId> = rows.data.iter().map(|row| row.0.id).collect();
            let mut trainers = relations::trainers_by_service(&pool, &ids)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.map(|ServiceRow(service)| ServiceWithTrainers {
                trainers: trainers.remove(&service.id).unwrap_or_default(),
                service,
            }))
        }
    }

    fn update(
        &self,
        service: Service,
        trainers: Option<&[TrainerId]>,
    ) -> impl Future<Output = Result<ServiceWithTrainers, GymHubError>> + Send {
        let pool = self.pool.clone();
        let trainers = trainers.map(<[TrainerId]>::to_vec);
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let result = sqlx::query(UPDATE)
                .bind(&service.title)
                .bind(&service.description)
                .bind(service.price)
                .bind(&service.image)
                .bind(now().to_rfc3339())
                .bind(service.id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if result.rows_affected() == 0 {
                return Err(not_found(service.id));
            }

            if let Some(trainers) = trainers {
                relations::detach_service(&mut *tx, service.id)
                    .await
                    .map_err(StorageError::from)?;
                let pairs: Vec<_> = trainers.iter().map(|trainer| (service.id, *trainer)).collect();
                relations::attach(&mut *tx, &pairs)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;

            load(&pool, service.id)
                .await
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(service.id))
        }
    }

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), GymHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            relations::detach_service(&mut *tx, id)
                .await
                .map_err(StorageError::from)?;
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            tx.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let count: i64 = sqlx::query_scalar(COUNT)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(u64::try_from(count).unwrap_or_default())
        }
    }

    fn find_missing_trainers(
        &self,
        ids: &[TrainerId],
    ) -> impl Future<Output = Result<Vec<TrainerId>, GymHubError>> + Send {
        let pool = self.pool.clone();
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        async move {
            let missing = relations::missing_ids(&pool, "trainers", &ids)
                .await
                .map_err(StorageError::from)?;
            Ok(missing.into_iter().map(TrainerId::new).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::trainer_repo::SqliteTrainerRepository;
    use gymhub_app::ports::TrainerRepository;
    use gymhub_domain::trainer::NewTrainer;

    async fn setup() -> (SqliteServiceRepository, SqliteTrainerRepository) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        (
            SqliteServiceRepository::new(db.pool().clone()),
            SqliteTrainerRepository::new(db.pool().clone()),
        )
    }

    fn new_service(title: &str, price: f64) -> NewService {
        NewService {
            title: title.to_string(),
            description: "Group class".to_string(),
            price,
            image: None,
        }
    }

    async fn trainer(repo: &SqliteTrainerRepository, first_name: &str) -> TrainerId {
        repo.create(
            NewTrainer {
                first_name: first_name.to_string(),
                last_name: "Coach".to_string(),
                description: "d".to_string(),
                photo: None,
            },
            &[],
        )
        .await
        .unwrap()
        .trainer
        .id
    }

    fn trainer_ids(service: &ServiceWithTrainers) -> Vec<TrainerId> {
        service.trainers.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_service_with_trainers() {
        let (repo, trainers) = setup().await;
        let anna = trainer(&trainers, "Anna").await;

        let created = repo.create(new_service("Yoga", 25.5), &[anna]).await.unwrap();

        let fetched = repo.get_by_id(created.service.id).await.unwrap().unwrap();
        assert_eq!(fetched.service.title, "Yoga");
        assert!((fetched.service.price - 25.5).abs() < f64::EPSILON);
        assert_eq!(trainer_ids(&fetched), vec![anna]);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_return_none_when_service_not_found() {
        let (repo, _) = setup().await;
        assert!(repo.get_by_id(ServiceId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_sync_trainers_to_exact_set() {
        let (repo, trainers) = setup().await;
        let t1 = trainer(&trainers, "One").await;
        let t2 = trainer(&trainers, "Two").await;
        let t3 = trainer(&trainers, "Three").await;
        let created = repo.create(new_service("Yoga", 10.0), &[t1, t2]).await.unwrap();

        let updated = repo
            .update(created.service.clone(), Some(&[t2, t3][..]))
            .await
            .unwrap();
        assert_eq!(trainer_ids(&updated), vec![t2, t3]);

        let untouched = repo.update(updated.service.clone(), None).await.unwrap();
        assert_eq!(trainer_ids(&untouched), vec![t2, t3]);

        let cleared = repo.update(updated.service, Some(&[][..])).await.unwrap();
        assert!(cleared.trainers.is_empty());
    }

    #[tokio::test]
    async fn should_ignore_duplicate_attachments() {
        let (repo, trainers) = setup().await;
        let t1 = trainer(&trainers, "One").await;
        let created = repo.create(new_service("Yoga", 10.0), &[t1, t1]).await.unwrap();
        assert_eq!(trainer_ids(&created), vec![t1]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_service() {
        let (repo, _) = setup().await;
        let created = repo.create(new_service("Yoga", 10.0), &[]).await.unwrap();
        repo.delete(created.service.id).await.unwrap();

        let result = repo.update(created.service, None).await;
        assert!(matches!(result, Err(GymHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_service_and_pivot_rows() {
        let (repo, trainers) = setup().await;
        let t1 = trainer(&trainers, "One").await;
        let created = repo.create(new_service("Yoga", 10.0), &[t1]).await.unwrap();

        repo.delete(created.service.id).await.unwrap();

        assert!(repo.get_by_id(created.service.id).await.unwrap().is_none());
        let coach = trainers.get_by_id(t1).await.unwrap().unwrap();
        assert!(coach.services.is_empty());
        assert!(matches!(
            repo.delete(created.service.id).await,
            Err(GymHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_filter_and_paginate() {
        let (repo, trainers) = setup().await;
        let t1 = trainer(&trainers, "One").await;
        for (title, price) in [("Yoga", 10.0), ("Power yoga", 20.0), ("Boxing", 30.0)] {
            repo.create(new_service(title, price), &[]).await.unwrap();
        }
        repo.create(new_service("Kids yoga", 60.0), &[t1]).await.unwrap();

        let by_title = ServiceFilter {
            title: Some("YOGA".to_string()),
            max_price: Some(20.0),
            ..ServiceFilter::default()
        };
        let page = repo.list(&by_title, PageRequest::new(1, 5)).await.unwrap();
        let titles: Vec<&str> = page.data.iter().map(|s| s.service.title.as_str()).collect();
        assert_eq!(titles, vec!["Yoga", "Power yoga"]);

        let by_trainer = ServiceFilter {
            trainer_id: Some(t1),
            ..ServiceFilter::default()
        };
        let page = repo.list(&by_trainer, PageRequest::new(1, 5)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].service.title, "Kids yoga");
        assert_eq!(trainer_ids(&page.data[0]), vec![t1]);

        let second = repo
            .list(&ServiceFilter::default(), PageRequest::new(2, 3))
            .await
            .unwrap();
        assert_eq!(second.total, 4);
        assert_eq!(second.last_page, 2);
        assert_eq!(second.data.len(), 1);
    }

    #[tokio::test]
    async fn should_treat_like_wildcards_literally() {
        let (repo, _) = setup().await;
        repo.create(new_service("50% off", 10.0), &[]).await.unwrap();
        repo.create(new_service("500 kcal", 10.0), &[]).await.unwrap();

        let filter = ServiceFilter {
            title: Some("50%".to_string()),
            ..ServiceFilter::default()
        };
        let page = repo.list(&filter, PageRequest::new(1, 5)).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn should_report_missing_trainers_and_count() {
        let (repo, trainers) = setup().await;
        let t1 = trainer(&trainers, "One").await;
        repo.create(new_service("Yoga", 10.0), &[]).await.unwrap();

        let missing = repo
            .find_missing_trainers(&[t1, TrainerId::new(999)])
            .await
            .unwrap();
        assert_eq!(missing, vec![TrainerId::new(999)]);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
