//! `SQLite` implementation of [`NewsRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymhub_app::ports::NewsRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::NewsId;
use gymhub_domain::news::{NewNews, News};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::time::now;

use crate::error::StorageError;
use crate::query::fetch_page;
use crate::rows::timestamp;

struct Wrapper(News);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(News {
            id: NewsId::new(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO news (title, description, image, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM news WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM news";
const UPDATE: &str = "UPDATE news SET title = ?, description = ?, image = ?, updated_at = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM news WHERE id = ?";

fn not_found(id: NewsId) -> GymHubError {
    NotFoundError {
        entity: "News",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed news repository.
#[derive(Clone)]
pub struct SqliteNewsRepository {
    pool: SqlitePool,
}

impl SqliteNewsRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: NewsId) -> Result<Option<News>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|w| w.0))
    }
}

impl NewsRepository for SqliteNewsRepository {
    async fn create(&self, news: NewNews) -> Result<News, GymHubError> {
        let ts = now().to_rfc3339();
        let result = sqlx::query(INSERT)
            .bind(&news.title)
            .bind(&news.description)
            .bind(&news.image)
            .bind(&ts)
            .bind(&ts)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = NewsId::new(result.last_insert_rowid());
        self.fetch(id).await?.ok_or_else(|| not_found(id))
    }

    async fn get_by_id(&self, id: NewsId) -> Result<Option<News>, GymHubError> {
        Ok(self.fetch(id).await?)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<News>, GymHubError> {
        let rows: Page<Wrapper> = fetch_page(&self.pool, "news", "id", page, |_| {})
            .await
            .map_err(StorageError::from)?;
        Ok(rows.map(|w| w.0))
    }

    async fn update(&self, news: News) -> Result<News, GymHubError> {
        let result = sqlx::query(UPDATE)
            .bind(&news.title)
            .bind(&news.description)
            .bind(&news.image)
            .bind(now().to_rfc3339())
            .bind(news.id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(news.id));
        }
        self.fetch(news.id).await?.ok_or_else(|| not_found(news.id))
    }

    async fn delete(&self, id: NewsId) -> Result<(), GymHubError> {
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
