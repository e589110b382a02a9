//! Row decoding shared by several repositories.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::service::Service;
use gymhub_domain::time::Timestamp;
use gymhub_domain::trainer::Trainer;

pub(crate) fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Read an RFC 3339 text column.
pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.to_utc())
        .map_err(decode_error)
}

/// Read a nullable RFC 3339 text column.
pub(crate) fn optional_timestamp(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| {
        chrono::DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.to_utc())
            .map_err(decode_error)
    })
    .transpose()
}

/// A `services` row.
pub(crate) struct ServiceRow(pub Service);

impl<'r> FromRow<'r, SqliteRow> for ServiceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Service {
            id: ServiceId::new(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            image: row.try_get("image")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

/// A `trainers` row.
pub(crate) struct TrainerRow(pub Trainer);

impl<'r> FromRow<'r, SqliteRow> for TrainerRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Trainer {
            id: TrainerId::new(row.try_get("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            description: row.try_get("description")?,
            photo: row.try_get("photo")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}
