//! `SQLite` implementation of [`TrainerRepository`].

use std::future::Future;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use gymhub_app::ports::TrainerRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::time::now;
use gymhub_domain::trainer::{NewTrainer, Trainer, TrainerFilter, TrainerWithServices};

use crate::error::StorageError;
use crate::query::{fetch_page, like_pattern};
use crate::relations;
use crate::rows::TrainerRow;

const INSERT: &str = r"
    INSERT INTO trainers (first_name, last_name, description, photo, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM trainers WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM trainers";
const UPDATE: &str = r"
    UPDATE trainers
    SET first_name = ?, last_name = ?, description = ?, photo = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM trainers WHERE id = ?";
const SERVICE_COUNT: &str =
    "(SELECT COUNT(*) FROM service_trainer WHERE service_trainer.trainer_id = trainers.id)";

fn not_found(id: TrainerId) -> GymHubError {
    NotFoundError {
        entity: "Trainer",
        id: id.to_string(),
    }
    .into()
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &TrainerFilter) {
    if let Some(name) = &filter.name {
        let pattern = like_pattern(name);
        builder
            .push(" AND (first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR last_name LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(service) = filter.service_id {
        builder
            .push(" AND id IN (SELECT trainer_id FROM service_trainer WHERE service_id = ")
            .push_bind(service.get())
            .push(")");
    }
    if let Some(min) = filter.min_services {
        builder
            .push(" AND ")
            .push(SERVICE_COUNT)
            .push(" >= ")
            .push_bind(i64::from(min));
    }
    if let Some(max) = filter.max_services {
        builder
            .push(" AND ")
            .push(SERVICE_COUNT)
            .push(" <= ")
            .push_bind(i64::from(max));
    }
}

async fn load(pool: &SqlitePool, id: TrainerId) -> Result<Option<TrainerWithServices>, sqlx::Error> {
    let row: Option<TrainerRow> = sqlx::query_as(SELECT_BY_ID)
        .bind(id.get())
        .fetch_optional(pool)
        .await?;
    let Some(TrainerRow(trainer)) = row else {
        return Ok(None);
    };
    let mut services = relations::services_by_trainer(pool, &[id]).await?;
    Ok(Some(TrainerWithServices {
        services: services.remove(&id).unwrap_or_default(),
        trainer,
    }))
}

/// `SQLite`-backed trainer repository.
#[derive(Clone)]
pub struct SqliteTrainerRepository {
    pool: SqlitePool,
}

impl SqliteTrainerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TrainerRepository for SqliteTrainerRepository {
    fn create(
        &self,
        trainer: NewTrainer,
        services: &[ServiceId],
    ) -> impl Future<Output = Result<TrainerWithServices, GymHubError>> + Send {
        let pool = self.pool.clone();
        let services = services.to_vec();
        async move {
            let ts = now().to_rfc3339();
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let result = sqlx::query(INSERT)
                .bind(&trainer.first_name)
                .bind(&trainer.last_name)
                .bind(&trainer.description)
                .bind(&trainer.photo)
                .bind(&ts)
                .bind(&ts)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let id = TrainerId::new(result.last_insert_rowid());

            let pairs: Vec<_> = services.iter().map(|service| (*service, id)).collect();
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
        id: TrainerId,
    ) -> impl Future<Output = Result<Option<TrainerWithServices>, GymHubError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(load(&pool, id).await.map_err(StorageError::from)?) }
    }

    fn list(
        &self,
        filter: &TrainerFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<TrainerWithServices>, GymHubError>> + Send {
        let pool = self.pool.clone();
        let filter = filter.clone();
        async move {
            let rows: Page<TrainerRow> = fetch_page(&pool, "trainers", "id", page, |builder| {
                push_filters(builder, &filter);
            })
            .await
            .map_err(StorageError::from)?;

            let ids: Vec<TrainerId> = rows.data.iter().map(|row| row.0.id).collect();
            let mut services = relations::services_by_trainer(&pool, &ids)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.map(|TrainerRow(trainer)| TrainerWithServices {
                services: services.remove(&trainer.id).unwrap_or_default(),
                trainer,
            }))
        }
    }

    fn update(
        &self,
        trainer: Trainer,
        services: Option<&[ServiceId]>,
    ) -> impl Future<Output = Result<TrainerWithServices, GymHubError>> + Send {
        let pool = self.pool.clone();
        let services = services.map(<[ServiceId]>::to_vec);
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let result = sqlx::query(UPDATE)
                .bind(&trainer.first_name)
                .bind(&trainer.last_name)
                .bind(&trainer.description)
                .bind(&trainer.photo)
                .bind(now().to_rfc3339())
                .bind(trainer.id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if result.rows_affected() == 0 {
                return Err(not_found(trainer.id));
            }

            if let Some(services) = services {
                relations::detach_trainer(&mut *tx, trainer.id)
                    .await
                    .map_err(StorageError::from)?;
                let pairs: Vec<_> = services.iter().map(|service| (*service, trainer.id)).collect();
                relations::attach(&mut *tx, &pairs)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;

            load(&pool, trainer.id)
                .await
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(trainer.id))
        }
    }

    fn delete(&self, id: TrainerId) -> impl Future<Output = Result<(), GymHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            relations::detach_trainer(&mut *tx, id)
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

    fn find_missing_services(
        &self,
        ids: &[ServiceId],
    ) -> impl Future<Output = Result<Vec<ServiceId>, GymHubError>> + Send {
        let pool = self.pool.clone();
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        async move {
            let missing = relations::missing_ids(&pool, "services", &ids)
                .await
                .map_err(StorageError::from)?;
            Ok(missing.into_iter().map(ServiceId::new).collect())
        }
    }
}
