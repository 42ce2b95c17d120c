use super::CountRecord;
use crate::error::DBError;
use abejanet_core::{Hive, HiveDependencies, HivePatch, NewHive};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};

/// Every hive read goes through this projection so the apiary name is
/// always joined in.
const SELECT_HIVES: &str = r#"SELECT c.id, c.apiario_id, a.nombre AS apiario, c.nombre,
        c.descripcion_especifica, c.fecha_creacion
    FROM colmenas c
    JOIN apiarios a ON a.id = c.apiario_id"#;

#[derive(sqlx::FromRow, Debug)]
pub struct HiveDao {
    pub(crate) id: i32,
    pub(crate) apiario_id: i32,
    pub(crate) apiario: String,
    pub(crate) nombre: String,
    pub(crate) descripcion_especifica: Option<String>,
    pub(crate) fecha_creacion: DateTime<Utc>,
}

impl From<HiveDao> for Hive {
    fn from(val: HiveDao) -> Self {
        Hive {
            id: val.id,
            apiary_id: val.apiario_id,
            apiary_name: val.apiario,
            name: val.nombre,
            description: val.descripcion_especifica,
            created_at: val.fecha_creacion,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DependencyRecord {
    sensores: Option<i64>,
    lecturas: Option<i64>,
}

/// READ hives, newest first
pub async fn read(conn: &sqlx::PgPool) -> Result<Vec<HiveDao>, DBError> {
    let stmt = format!("{} ORDER BY c.id DESC", SELECT_HIVES);
    Ok(sqlx::query_as::<_, HiveDao>(&stmt).fetch_all(conn).await?)
}

pub async fn get(conn: &sqlx::PgPool, hive_id: i32) -> Result<Option<HiveDao>, DBError> {
    let stmt = format!("{} WHERE c.id = $1", SELECT_HIVES);
    Ok(sqlx::query_as::<_, HiveDao>(&stmt)
        .bind(hive_id)
        .fetch_optional(conn)
        .await?)
}

pub async fn exists(conn: &sqlx::PgPool, hive_id: i32) -> Result<bool, DBError> {
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM colmenas WHERE id = $1",
        hive_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count() > 0)
}

pub async fn insert(conn: &sqlx::PgPool, hive: &NewHive) -> Result<HiveDao, DBError> {
    Ok(sql_stmnt!(
        HiveDao,
        r#"WITH inserted AS (
                INSERT INTO colmenas (apiario_id, nombre, descripcion_especifica)
                VALUES ($1, $2, $3) RETURNING *
            )
            SELECT i.id, i.apiario_id, a.nombre AS apiario, i.nombre,
                i.descripcion_especifica, i.fecha_creacion
            FROM inserted i
            JOIN apiarios a ON a.id = i.apiario_id"#,
        hive.apiary_id,
        &hive.name,
        &hive.description
    )
    .fetch_one(conn)
    .await?)
}

/// UPDATE only the columns present in the patch
pub async fn update(
    conn: &sqlx::PgPool,
    hive_id: i32,
    patch: &HivePatch,
) -> Result<Option<HiveDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("WITH updated AS (UPDATE colmenas SET ");
    let mut columns = builder.separated(", ");
    if let Some(apiary_id) = patch.apiary_id {
        columns.push("apiario_id = ");
        columns.push_bind_unseparated(apiary_id);
    }
    if let Some(name) = &patch.name {
        columns.push("nombre = ");
        columns.push_bind_unseparated(name.clone());
    }
    if let Some(description) = &patch.description {
        columns.push("descripcion_especifica = ");
        columns.push_bind_unseparated(description.clone());
    }
    builder.push(" WHERE id = ");
    builder.push_bind(hive_id);
    builder.push(
        r#" RETURNING *)
        SELECT u.id, u.apiario_id, a.nombre AS apiario, u.nombre,
            u.descripcion_especifica, u.fecha_creacion
        FROM updated u
        JOIN apiarios a ON a.id = u.apiario_id"#,
    );

    Ok(builder
        .build_query_as::<HiveDao>()
        .fetch_optional(conn)
        .await?)
}

/// Counts sensors mounted on the hive and the readings taken by them in
/// one statement.
pub async fn dependencies<'e, E>(conn: E, hive_id: i32) -> Result<HiveDependencies, DBError>
where
    E: sqlx::PgExecutor<'e>,
{
    let record = sql_stmnt!(
        DependencyRecord,
        r#"SELECT
            (SELECT count(*) FROM sensores WHERE colmena_id = $1) AS sensores,
            (SELECT count(*) FROM lecturas_ambientales l
                JOIN sensores s ON s.id = l.sensor_id
                WHERE s.colmena_id = $1) AS lecturas"#,
        hive_id
    )
    .fetch_one(conn)
    .await?;
    Ok(HiveDependencies {
        sensores: record.sensores.unwrap_or(0),
        lecturas: record.lecturas.unwrap_or(0),
    })
}

/// DELETE the hive unless a sensor is still mounted on it
pub async fn delete_unreferenced(conn: &sqlx::PgPool, hive_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!(
        r#"DELETE FROM colmenas WHERE id = $1
            AND NOT EXISTS (SELECT 1 FROM sensores WHERE colmena_id = $1)"#,
        hive_id
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Row-locks the hive for the rest of the transaction. `false` if it is gone.
pub async fn lock(conn: &mut PgConnection, hive_id: i32) -> Result<bool, DBError> {
    let row = sql_stmnt!("SELECT id FROM colmenas WHERE id = $1 FOR UPDATE", hive_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

pub async fn delete_readings(conn: &mut PgConnection, hive_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!(
        r#"DELETE FROM lecturas_ambientales
            WHERE sensor_id IN (SELECT id FROM sensores WHERE colmena_id = $1)"#,
        hive_id
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_sensors(conn: &mut PgConnection, hive_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!("DELETE FROM sensores WHERE colmena_id = $1", hive_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut PgConnection, hive_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!("DELETE FROM colmenas WHERE id = $1", hive_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
