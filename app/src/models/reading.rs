use crate::error::DBError;
use abejanet_core::{NewReading, Reading};
use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow, Debug)]
pub struct ReadingDao {
    pub(crate) id: i32,
    pub(crate) sensor_id: i32,
    pub(crate) temperatura: f64,
    pub(crate) humedad: Option<f64>,
    pub(crate) peso: Option<f64>,
    pub(crate) sonido: Option<f64>,
    pub(crate) lluvia: Option<bool>,
    pub(crate) fecha_registro: DateTime<Utc>,
}

impl From<ReadingDao> for Reading {
    fn from(val: ReadingDao) -> Self {
        Reading {
            id: val.id,
            sensor_id: val.sensor_id,
            temperature: val.temperatura,
            humidity: val.humedad,
            weight: val.peso,
            sound: val.sonido,
            rain: val.lluvia,
            recorded_at: val.fecha_registro,
        }
    }
}

/// INSERT a reading and stamp the sensor's `ultima_lectura` with it
pub async fn insert(conn: &sqlx::PgPool, reading: &NewReading) -> Result<ReadingDao, DBError> {
    Ok(sql_stmnt!(
        ReadingDao,
        r#"WITH inserted AS (
                INSERT INTO lecturas_ambientales
                    (sensor_id, temperatura, humedad, peso, sonido, lluvia)
                    VALUES ($1, $2, $3, $4, $5, $6) RETURNING *
            ), touched AS (
                UPDATE sensores SET ultima_lectura = inserted.fecha_registro
                FROM inserted WHERE sensores.id = inserted.sensor_id
            )
            SELECT * FROM inserted"#,
        reading.sensor_id,
        reading.temperature,
        reading.humidity,
        reading.weight,
        reading.sound,
        reading.rain
    )
    .fetch_one(conn)
    .await?)
}

/// Latest readings of all sensors mounted on a hive
pub async fn latest_for_hive(
    conn: &sqlx::PgPool,
    hive_id: i32,
    limit: i64,
) -> Result<Vec<ReadingDao>, DBError> {
    Ok(sql_stmnt!(
        ReadingDao,
        r#"SELECT l.* FROM lecturas_ambientales l
            JOIN sensores s ON s.id = l.sensor_id
            WHERE s.colmena_id = $1
            ORDER BY l.fecha_registro DESC, l.id DESC
            LIMIT $2"#,
        hive_id,
        limit
    )
    .fetch_all(conn)
    .await?)
}
