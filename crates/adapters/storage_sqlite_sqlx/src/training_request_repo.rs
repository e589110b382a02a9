//! `SQLite` implementation of [`TrainingRequestRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymhub_app::ports::TrainingRequestRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::TrainingRequestId;
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::time::now;
use gymhub_domain::training_request::{TrainingRequest, TrainingRequestDraft};

use crate::error::StorageError;
use crate::query::fetch_page;
use crate::rows::timestamp;

struct Wrapper(TrainingRequest);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(TrainingRequest {
            id: TrainingRequestId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            message: row.try_get("message")?,
            consent: row.try_get("consent")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO training_requests (name, phone, message, consent, created_at, updated_at)
    VALUES (?, ?, ?, 1, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM training_requests WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM training_requests";
const UPDATE: &str = r"
    UPDATE training_requests
    SET name = ?, phone = ?, message = ?, consent = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM training_requests WHERE id = ?";

fn not_found(id: TrainingRequestId) -> GymHubError {
    NotFoundError {
        entity: "TrainingRequest",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed training request repository.
#[derive(Clone)]
pub struct SqliteTrainingRequestRepository {
    pool: SqlitePool,
}

impl SqliteTrainingRequestRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: TrainingRequestId) -> Result<Option<TrainingRequest>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|w| w.0))
    }
}

impl TrainingRequestRepository for SqliteTrainingRequestRepository {
    async fn create(&self, request: TrainingRequestDraft) -> Result<TrainingRequest, GymHubError> {
        let ts = now().to_rfc3339();
        let result = sqlx::query(INSERT)
            .bind(&request.name)
            .bind(&request.phone)
            .bind(&request.message)
            .bind(&ts)
            .bind(&ts)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = TrainingRequestId::new(result.last_insert_rowid());
        self.fetch(id).await?.ok_or_else(|| not_found(id))
    }

    async fn get_by_id(
        &self,
        id: TrainingRequestId,
    ) -> Result<Option<TrainingRequest>, GymHubError> {
        Ok(self.fetch(id).await?)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TrainingRequest>, GymHubError> {
        let rows: Page<Wrapper> = fetch_page(
            &self.pool,
            "training_requests",
            "created_at DESC, id DESC",
            page,
            |_| {},
        )
        .await
        .map_err(StorageError::from)?;
        Ok(rows.map(|w| w.0))
    }

    async fn update(&self, request: TrainingRequest) -> Result<TrainingRequest, GymHubError> {
        let result = sqlx::query(UPDATE)
            .bind(&request.name)
            .bind(&request.phone)
            .bind(&request.message)
            .bind(request.consent)
            .bind(now().to_rfc3339())
            .bind(request.id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(request.id));
        }
        self.fetch(request.id)
            .await?
            .ok_or_else(|| not_found(request.id))
    }

    async fn delete(&self, id: TrainingRequestId) -> Result<(), GymHubError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
