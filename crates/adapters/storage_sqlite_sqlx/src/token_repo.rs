//! `SQLite` implementation of [`TokenRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymhub_app::ports::TokenRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::{TokenId, UserId};
use gymhub_domain::time::{now, Timestamp};
use gymhub_domain::user::AccessToken;

use crate::error::StorageError;
use crate::rows::{optional_timestamp, timestamp};

struct Wrapper(AccessToken);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(AccessToken {
            id: TokenId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            name: row.try_get("name")?,
            token_hash: row.try_get("token_hash")?,
            last_used_at: optional_timestamp(row, "last_used_at")?,
            created_at: timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO personal_access_tokens (user_id, name, token_hash, created_at)
    VALUES (?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM personal_access_tokens WHERE id = ?";
const SELECT_BY_HASH: &str = "SELECT * FROM personal_access_tokens WHERE token_hash = ?";
const TOUCH: &str = "UPDATE personal_access_tokens SET last_used_at = ? WHERE id = ?";
const DELETE_FOR_USER: &str = "DELETE FROM personal_access_tokens WHERE user_id = ?";

/// `SQLite`-backed token repository.
#[derive(Clone)]
pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TokenRepository for SqliteTokenRepository {
    async fn create(
        &self,
        user_id: UserId,
        name: &str,
        token_hash: &str,
    ) -> Result<AccessToken, GymHubError> {
        let result = sqlx::query(INSERT)
            .bind(user_id.get())
            .bind(name)
            .bind(token_hash)
            .bind(now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = result.last_insert_rowid();
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        row.map(|w| w.0).ok_or_else(|| {
            NotFoundError {
                entity: "AccessToken",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, GymHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_HASH)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn touch(&self, id: TokenId, at: Timestamp) -> Result<(), GymHubError> {
        sqlx::query(TOUCH)
            .bind(at.to_rfc3339())
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64, GymHubError> {
        let result = sqlx::query(DELETE_FOR_USER)
            .bind(user_id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(result.rows_affected())
    }
}
