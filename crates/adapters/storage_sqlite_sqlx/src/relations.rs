//! The `service_trainer` pivot table.

use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::service::Service;
use gymhub_domain::trainer::Trainer;

use crate::rows::{ServiceRow, TrainerRow};

const ATTACH: &str = "INSERT OR IGNORE INTO service_trainer (service_id, trainer_id) VALUES (?, ?)";
const DETACH_SERVICE: &str = "DELETE FROM service_trainer WHERE service_id = ?";
const DETACH_TRAINER: &str = "DELETE FROM service_trainer WHERE trainer_id = ?";

/// Insert the given pairs, ignoring the ones already present.
pub(crate) async fn attach(
    conn: &mut SqliteConnection,
    pairs: &[(ServiceId, TrainerId)],
) -> Result<(), sqlx::Error> {
    for &(service, trainer) in pairs {
        sqlx::query(ATTACH)
            .bind(service.get())
            .bind(trainer.get())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub(crate) async fn detach_service(
    conn: &mut SqliteConnection,
    service: ServiceId,
) -> Result<(), sqlx::Error> {
    sqlx::query(DETACH_SERVICE)
        .bind(service.get())
        .execute(conn)
        .await?;
    Ok(())
}

pub(crate) async fn detach_trainer(
    conn: &mut SqliteConnection,
    trainer: TrainerId,
) -> Result<(), sqlx::Error> {
    sqlx::query(DETACH_TRAINER)
        .bind(trainer.get())
        .execute(conn)
        .await?;
    Ok(())
}

fn push_id_list<'args>(builder: &mut QueryBuilder<'args, Sqlite>, ids: &[i64]) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Trainers of each of `services`, ordered by trainer id.
pub(crate) async fn trainers_by_service(
    pool: &SqlitePool,
    services: &[ServiceId],
) -> Result<HashMap<ServiceId, Vec<Trainer>>, sqlx::Error> {
    let mut grouped: HashMap<ServiceId, Vec<Trainer>> = HashMap::new();
    if services.is_empty() {
        return Ok(grouped);
    }

    let ids: Vec<i64> = services.iter().map(|id| id.get()).collect();
    let mut builder = QueryBuilder::new(
        "SELECT service_trainer.service_id AS pivot_id, trainers.* FROM service_trainer \
         JOIN trainers ON trainers.id = service_trainer.trainer_id \
         WHERE service_trainer.service_id IN (",
    );
    push_id_list(&mut builder, &ids);
    builder.push(" ORDER BY trainers.id");

    for row in builder.build().fetch_all(pool).await? {
        let pivot: i64 = row.try_get("pivot_id")?;
        let TrainerRow(trainer) = TrainerRow::from_row(&row)?;
        grouped.entry(ServiceId::new(pivot)).or_default().push(trainer);
    }
    Ok(grouped)
}

/// Services of each of `trainers`, ordered by service id.
pub(crate) async fn services_by_trainer(
    pool: &SqlitePool,
    trainers: &[TrainerId],
) -> Result<HashMap<TrainerId, Vec<Service>>, sqlx::Error> {
    let mut grouped: HashMap<TrainerId, Vec<Service>> = HashMap::new();
    if trainers.is_empty() {
        return Ok(grouped);
    }

    let ids: Vec<i64> = trainers.iter().map(|id| id.get()).collect();
    let mut builder = QueryBuilder::new(
        "SELECT service_trainer.trainer_id AS pivot_id, services.* FROM service_trainer \
         JOIN services ON services.id = service_trainer.service_id \
         WHERE service_trainer.trainer_id IN (",
    );
    push_id_list(&mut builder, &ids);
    builder.push(" ORDER BY services.id");

    for row in builder.build().fetch_all(pool).await? {
        let pivot: i64 = row.try_get("pivot_id")?;
        let ServiceRow(service) = ServiceRow::from_row(&row)?;
        grouped.entry(TrainerId::new(pivot)).or_default().push(service);
    }
    Ok(grouped)
}

/// The ids among `ids` with no row in `table`.
pub(crate) async fn missing_ids(
    pool: &SqlitePool,
    table: &'static str,
    ids: &[i64],
) -> Result<Vec<i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
    push_id_list(&mut builder, ids);
    let existing: Vec<i64> = builder.build_query_scalar().fetch_all(pool).await?;

    Ok(ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect())
}
