use super::CountRecord;
use crate::error::DBError;
use abejanet_core::{NewSensor, Sensor, SensorFilter, SensorPatch, SensorState};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};

#[derive(sqlx::FromRow, Debug)]
pub struct SensorDao {
    pub(crate) id: i32,
    pub(crate) colmena_id: Option<i32>,
    pub(crate) tipo_sensor: String,
    pub(crate) mac_address: Option<String>,
    #[sqlx(try_from = "String")]
    pub(crate) estado: SensorState,
    pub(crate) fecha_instalacion: Option<NaiveDate>,
    pub(crate) ultima_lectura: Option<DateTime<Utc>>,
}

impl From<SensorDao> for Sensor {
    fn from(val: SensorDao) -> Self {
        Sensor {
            id: val.id,
            hive_id: val.colmena_id,
            kind: val.tipo_sensor,
            mac_address: val.mac_address,
            state: val.estado,
            installed_on: val.fecha_instalacion,
            last_reading_at: val.ultima_lectura,
        }
    }
}

/// READ sensors matching the filter, by id
pub async fn read(conn: &sqlx::PgPool, filter: &SensorFilter) -> Result<Vec<SensorDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM sensores WHERE 1 = 1");
    if let Some(hive_id) = filter.hive_id {
        builder.push(" AND colmena_id = ");
        builder.push_bind(hive_id);
    }
    if let Some(mac) = &filter.mac {
        builder.push(" AND mac_address ILIKE ");
        builder.push_bind(super::contains_pattern(mac));
        builder.push(" ESCAPE '\\'");
    }
    builder.push(" ORDER BY id ASC");

    Ok(builder
        .build_query_as::<SensorDao>()
        .fetch_all(conn)
        .await?)
}

pub async fn get(conn: &sqlx::PgPool, sensor_id: i32) -> Result<Option<SensorDao>, DBError> {
    Ok(
        sql_stmnt!(SensorDao, "SELECT * FROM sensores WHERE id = $1", sensor_id)
            .fetch_optional(conn)
            .await?,
    )
}

pub async fn exists(conn: &sqlx::PgPool, sensor_id: i32) -> Result<bool, DBError> {
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM sensores WHERE id = $1",
        sensor_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count() > 0)
}

pub async fn insert(conn: &sqlx::PgPool, sensor: &NewSensor) -> Result<SensorDao, DBError> {
    Ok(sql_stmnt!(
        SensorDao,
        r#"INSERT INTO sensores
                (colmena_id, tipo_sensor, mac_address, estado, fecha_instalacion)
                VALUES ($1, $2, $3, $4, $5) RETURNING *"#,
        sensor.hive_id,
        &sensor.kind,
        &sensor.mac_address,
        sensor.state.as_str(),
        sensor.installed_on
    )
    .fetch_one(conn)
    .await?)
}

/// UPDATE only the columns present in the patch
pub async fn update(
    conn: &sqlx::PgPool,
    sensor_id: i32,
    patch: &SensorPatch,
) -> Result<Option<SensorDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE sensores SET ");
    let mut columns = builder.separated(", ");
    if let Some(hive_id) = patch.hive_id {
        columns.push("colmena_id = ");
        columns.push_bind_unseparated(hive_id);
    }
    if let Some(kind) = &patch.kind {
        columns.push("tipo_sensor = ");
        columns.push_bind_unseparated(kind.clone());
    }
    if let Some(mac) = &patch.mac_address {
        columns.push("mac_address = ");
        columns.push_bind_unseparated(mac.clone());
    }
    if let Some(state) = patch.state {
        columns.push("estado = ");
        columns.push_bind_unseparated(state.as_str());
    }
    if let Some(installed_on) = patch.installed_on {
        columns.push("fecha_instalacion = ");
        columns.push_bind_unseparated(installed_on);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(sensor_id);
    builder.push(" RETURNING *");

    Ok(builder
        .build_query_as::<SensorDao>()
        .fetch_optional(conn)
        .await?)
}

pub async fn count_readings<'e, E>(conn: E, sensor_id: i32) -> Result<i64, DBError>
where
    E: sqlx::PgExecutor<'e>,
{
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM lecturas_ambientales WHERE sensor_id = $1",
        sensor_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count())
}

/// DELETE the sensor unless it has readings
pub async fn delete_unreferenced(conn: &sqlx::PgPool, sensor_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!(
        r#"DELETE FROM sensores WHERE id = $1
            AND NOT EXISTS (SELECT 1 FROM lecturas_ambientales WHERE sensor_id = $1)"#,
        sensor_id
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn lock(conn: &mut PgConnection, sensor_id: i32) -> Result<bool, DBError> {
    let row = sql_stmnt!("SELECT id FROM sensores WHERE id = $1 FOR UPDATE", sensor_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

pub async fn delete_readings(conn: &mut PgConnection, sensor_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!(
        "DELETE FROM lecturas_ambientales WHERE sensor_id = $1",
        sensor_id
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut PgConnection, sensor_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!("DELETE FROM sensores WHERE id = $1", sensor_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
