//! Read-only aggregate queries behind `/api/reportes`.

use crate::error::DBError;
use abejanet_core::{percent_change, DateRange, ReportFilter};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiaryOption {
    pub id: i32,
    pub nombre: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HiveOption {
    pub id: i32,
    pub apiario_id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub activas: i64,
    #[serde(rename = "promPeso")]
    pub prom_peso: f64,
    pub variacion7d: f64,
    pub alertas: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeightPoint {
    pub fecha: String,
    pub colmena: String,
    pub peso: Option<f64>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClimatePoint {
    pub fecha: String,
    pub temperatura: f64,
    pub humedad: Option<f64>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleCount {
    pub rol: String,
    pub cantidad: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub total: i64,
    pub activos: i64,
    pub inactivos: i64,
    #[serde(rename = "porRol")]
    pub por_rol: Vec<RoleCount>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthCount {
    pub mes: String,
    pub altas: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserListing {
    pub id: i32,
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub correo_electronico: String,
    pub esta_activo: bool,
    pub fecha_creacion: String,
    pub rol: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HiveSummary {
    pub total: i64,
    pub con_sensor: i64,
    pub sin_sensor: i64,
    pub activas_7d: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiaryHiveCount {
    pub apiario: String,
    pub colmenas: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminSummary {
    pub apiarios: i64,
    pub colmenas: i64,
    pub sensores: i64,
    pub lecturas_7d: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiaryActivity {
    pub apiario: String,
    pub lecturas: i64,
}

#[derive(sqlx::FromRow)]
struct ActivityRecord {
    activas: Option<i64>,
    prom_peso: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct TotalsRecord {
    total: Option<i64>,
    activos: Option<i64>,
    inactivos: Option<i64>,
}

/// Readings joined up to their hive, restricted to the filter's scope.
fn scoped_readings<'a>(select: &str, filter: &ReportFilter, range: &DateRange) -> QueryBuilder<'a, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(select);
    builder.push(
        r#" FROM lecturas_ambientales l
            JOIN sensores s ON s.id = l.sensor_id
            JOIN colmenas c ON c.id = s.colmena_id
            WHERE l.fecha_registro >= "#,
    );
    builder.push_bind(range.start);
    builder.push(" AND l.fecha_registro < ");
    builder.push_bind(range.end);
    push_scope(&mut builder, filter);
    builder
}

fn push_scope(builder: &mut QueryBuilder<Postgres>, filter: &ReportFilter) {
    if let Some(apiary_id) = filter.apiary_id {
        builder.push(" AND c.apiario_id = ");
        builder.push_bind(apiary_id);
    }
    if let Some(hive_id) = filter.hive_id {
        builder.push(" AND c.id = ");
        builder.push_bind(hive_id);
    }
}

pub async fn apiary_options(conn: &sqlx::PgPool) -> Result<Vec<ApiaryOption>, DBError> {
    Ok(sql_stmnt!(ApiaryOption, "SELECT id, nombre FROM apiarios ORDER BY nombre")
        .fetch_all(conn)
        .await?)
}

pub async fn hive_options(conn: &sqlx::PgPool) -> Result<Vec<HiveOption>, DBError> {
    Ok(sql_stmnt!(
        HiveOption,
        "SELECT id, apiario_id, nombre FROM colmenas ORDER BY nombre"
    )
    .fetch_all(conn)
    .await?)
}

async fn activity(
    conn: &sqlx::PgPool,
    filter: &ReportFilter,
    range: &DateRange,
) -> Result<ActivityRecord, DBError> {
    let mut builder = scoped_readings(
        "SELECT COUNT(DISTINCT c.id) AS activas, AVG(l.peso) AS prom_peso",
        filter,
        range,
    );
    Ok(builder
        .build_query_as::<ActivityRecord>()
        .fetch_one(conn)
        .await?)
}

async fn alerts(conn: &sqlx::PgPool, filter: &ReportFilter) -> Result<i64, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"SELECT count(*) AS count FROM sensores s
            LEFT JOIN colmenas c ON c.id = s.colmena_id
            WHERE s.estado IN ('inactivo', 'mantenimiento')"#,
    );
    push_scope(&mut builder, filter);
    let count = builder
        .build_query_as::<super::CountRecord>()
        .fetch_one(conn)
        .await?;
    Ok(count.count())
}

/// Operational KPIs of the filtered scope
pub async fn summary(conn: &sqlx::PgPool, filter: &ReportFilter) -> Result<Summary, DBError> {
    let in_range = activity(conn, filter, &filter.range).await?;
    let recent = activity(conn, filter, &filter.range.recent_week()).await?;
    let previous = activity(conn, filter, &filter.range.previous_week()).await?;

    Ok(Summary {
        activas: in_range.activas.unwrap_or(0),
        prom_peso: in_range.prom_peso.unwrap_or(0.0),
        variacion7d: percent_change(previous.prom_peso, recent.prom_peso),
        alertas: alerts(conn, filter).await?,
    })
}

pub async fn weight_series(
    conn: &sqlx::PgPool,
    filter: &ReportFilter,
) -> Result<Vec<WeightPoint>, DBError> {
    let mut builder = scoped_readings(
        r#"SELECT to_char(l.fecha_registro, 'YYYY-MM-DD HH24:MI') AS fecha,
            c.nombre AS colmena, l.peso"#,
        filter,
        &filter.range,
    );
    builder.push(" ORDER BY l.fecha_registro");
    Ok(builder.build_query_as::<WeightPoint>().fetch_all(conn).await?)
}

pub async fn climate_series(
    conn: &sqlx::PgPool,
    filter: &ReportFilter,
) -> Result<Vec<ClimatePoint>, DBError> {
    let mut builder = scoped_readings(
        r#"SELECT to_char(l.fecha_registro, 'YYYY-MM-DD HH24:MI') AS fecha,
            l.temperatura, l.humedad"#,
        filter,
        &filter.range,
    );
    builder.push(" ORDER BY l.fecha_registro");
    Ok(builder.build_query_as::<ClimatePoint>().fetch_all(conn).await?)
}

pub async fn user_summary(conn: &sqlx::PgPool) -> Result<UserSummary, DBError> {
    let totals = sql_stmnt!(
        TotalsRecord,
        r#"SELECT count(*) AS total,
            count(*) FILTER (WHERE esta_activo) AS activos,
            count(*) FILTER (WHERE NOT esta_activo) AS inactivos
            FROM usuarios"#
    )
    .fetch_one(conn)
    .await?;
    let por_rol = sql_stmnt!(
        RoleCount,
        r#"SELECT r.nombre AS rol, count(*) AS cantidad
            FROM usuarios u
            JOIN roles r ON r.id = u.rol_id
            GROUP BY r.id, r.nombre
            ORDER BY cantidad DESC"#
    )
    .fetch_all(conn)
    .await?;

    Ok(UserSummary {
        total: totals.total.unwrap_or(0),
        activos: totals.activos.unwrap_or(0),
        inactivos: totals.inactivos.unwrap_or(0),
        por_rol,
    })
}

pub async fn user_growth(conn: &sqlx::PgPool, range: &DateRange) -> Result<Vec<MonthCount>, DBError> {
    Ok(sql_stmnt!(
        MonthCount,
        r#"SELECT to_char(fecha_creacion, 'YYYY-MM') AS mes, count(*) AS altas
            FROM usuarios
            WHERE fecha_creacion >= $1 AND fecha_creacion < $2
            GROUP BY to_char(fecha_creacion, 'YYYY-MM')
            ORDER BY mes"#,
        range.start,
        range.end
    )
    .fetch_all(conn)
    .await?)
}

pub async fn user_listing(conn: &sqlx::PgPool) -> Result<Vec<UserListing>, DBError> {
    Ok(sql_stmnt!(
        UserListing,
        r#"SELECT u.id, u.nombre, u.apellido_paterno, u.correo_electronico, u.esta_activo,
            to_char(u.fecha_creacion, 'YYYY-MM-DD HH24:MI') AS fecha_creacion,
            r.nombre AS rol
            FROM usuarios u
            LEFT JOIN roles r ON r.id = u.rol_id
            ORDER BY u.fecha_creacion DESC
            LIMIT 100"#
    )
    .fetch_all(conn)
    .await?)
}

pub async fn hive_summary(conn: &sqlx::PgPool) -> Result<HiveSummary, DBError> {
    Ok(sql_stmnt!(
        HiveSummary,
        r#"SELECT
            (SELECT count(*) FROM colmenas) AS total,
            (SELECT count(DISTINCT colmena_id) FROM sensores
                WHERE colmena_id IS NOT NULL) AS con_sensor,
            (SELECT count(*) FROM colmenas c
                WHERE NOT EXISTS (SELECT 1 FROM sensores s WHERE s.colmena_id = c.id)) AS sin_sensor,
            (SELECT count(DISTINCT s.colmena_id) FROM lecturas_ambientales l
                JOIN sensores s ON s.id = l.sensor_id
                WHERE s.colmena_id IS NOT NULL
                AND l.fecha_registro >= now() - interval '7 days') AS activas_7d"#
    )
    .fetch_one(conn)
    .await?)
}

pub async fn hives_per_apiary(conn: &sqlx::PgPool) -> Result<Vec<ApiaryHiveCount>, DBError> {
    Ok(sql_stmnt!(
        ApiaryHiveCount,
        r#"SELECT a.nombre AS apiario, count(*) AS colmenas
            FROM colmenas c
            JOIN apiarios a ON a.id = c.apiario_id
            GROUP BY a.id, a.nombre
            ORDER BY colmenas DESC"#
    )
    .fetch_all(conn)
    .await?)
}

pub async fn admin_summary(conn: &sqlx::PgPool) -> Result<AdminSummary, DBError> {
    Ok(sql_stmnt!(
        AdminSummary,
        r#"SELECT
            (SELECT count(*) FROM apiarios) AS apiarios,
            (SELECT count(*) FROM colmenas) AS colmenas,
            (SELECT count(*) FROM sensores) AS sensores,
            (SELECT count(*) FROM lecturas_ambientales
                WHERE fecha_registro >= now() - interval '7 days') AS lecturas_7d"#
    )
    .fetch_one(conn)
    .await?)
}

pub async fn top_activity(
    conn: &sqlx::PgPool,
    range: &DateRange,
) -> Result<Vec<ApiaryActivity>, DBError> {
    Ok(sql_stmnt!(
        ApiaryActivity,
        r#"SELECT a.nombre AS apiario, count(*) AS lecturas
            FROM lecturas_ambientales l
            JOIN sensores s ON s.id = l.sensor_id
            JOIN colmenas c ON c.id = s.colmena_id
            JOIN apiarios a ON a.id = c.apiario_id
            WHERE l.fecha_registro >= $1 AND l.fecha_registro < $2
            GROUP BY a.id, a.nombre
            ORDER BY lecturas DESC"#,
        range.start,
        range.end
    )
    .fetch_all(conn)
    .await?)
}
