use super::CountRecord;
use crate::error::DBError;
use abejanet_core::{Apiary, ApiaryPatch, NewApiary};
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

#[derive(sqlx::FromRow, Debug)]
pub struct ApiaryDao {
    pub(crate) id: i32,
    pub(crate) nombre: String,
    pub(crate) ubicacion: Option<String>,
    pub(crate) descripcion: Option<String>,
    pub(crate) fecha_creacion: DateTime<Utc>,
}

impl From<ApiaryDao> for Apiary {
    fn from(val: ApiaryDao) -> Self {
        Apiary {
            id: val.id,
            name: val.nombre,
            location: val.ubicacion,
            description: val.descripcion,
            created_at: val.fecha_creacion,
        }
    }
}

/// READ apiaries, optionally filtered by a case-insensitive name fragment
pub async fn read(conn: &sqlx::PgPool, search: Option<&str>) -> Result<Vec<ApiaryDao>, DBError> {
    let rows = match search {
        Some(search) => {
            sql_stmnt!(
                ApiaryDao,
                "SELECT * FROM apiarios WHERE nombre ILIKE $1 ESCAPE '\\' ORDER BY nombre ASC",
                super::contains_pattern(search)
            )
            .fetch_all(conn)
            .await?
        }
        None => {
            sql_stmnt!(ApiaryDao, "SELECT * FROM apiarios ORDER BY nombre ASC")
                .fetch_all(conn)
                .await?
        }
    };
    Ok(rows)
}

pub async fn get(conn: &sqlx::PgPool, apiary_id: i32) -> Result<Option<ApiaryDao>, DBError> {
    Ok(
        sql_stmnt!(ApiaryDao, "SELECT * FROM apiarios WHERE id = $1", apiary_id)
            .fetch_optional(conn)
            .await?,
    )
}

pub async fn exists(conn: &sqlx::PgPool, apiary_id: i32) -> Result<bool, DBError> {
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM apiarios WHERE id = $1",
        apiary_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count() > 0)
}

pub async fn insert(conn: &sqlx::PgPool, apiary: &NewApiary) -> Result<ApiaryDao, DBError> {
    Ok(sql_stmnt!(
        ApiaryDao,
        r#"INSERT INTO apiarios (nombre, ubicacion, descripcion)
            VALUES ($1, $2, $3) RETURNING *"#,
        &apiary.name,
        &apiary.location,
        &apiary.description
    )
    .fetch_one(conn)
    .await?)
}

/// UPDATE only the columns present in the patch
pub async fn update(
    conn: &sqlx::PgPool,
    apiary_id: i32,
    patch: &ApiaryPatch,
) -> Result<Option<ApiaryDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE apiarios SET ");
    let mut columns = builder.separated(", ");
    if let Some(name) = &patch.name {
        columns.push("nombre = ");
        columns.push_bind_unseparated(name.clone());
    }
    if let Some(location) = &patch.location {
        columns.push("ubicacion = ");
        columns.push_bind_unseparated(location.clone());
    }
    if let Some(description) = &patch.description {
        columns.push("descripcion = ");
        columns.push_bind_unseparated(description.clone());
    }
    builder.push(" WHERE id = ");
    builder.push_bind(apiary_id);
    builder.push(" RETURNING *");

    Ok(builder
        .build_query_as::<ApiaryDao>()
        .fetch_optional(conn)
        .await?)
}

pub async fn count_hives(conn: &sqlx::PgPool, apiary_id: i32) -> Result<i64, DBError> {
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM colmenas WHERE apiario_id = $1",
        apiary_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count())
}

/// DELETE the apiary unless a hive still references it
pub async fn delete_unreferenced(conn: &sqlx::PgPool, apiary_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!(
        r#"DELETE FROM apiarios WHERE id = $1
            AND NOT EXISTS (SELECT 1 FROM colmenas WHERE apiario_id = $1)"#,
        apiary_id
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
