//! GET /api/reportes/...
//!
//! Ranged reports take `desde` and `hasta` as `YYYY-MM-DD`, both inclusive.
//! The hive reports also accept `apiarioId` and `colmenaId`.

use super::{build_response, ErrorDto, Route};
use crate::farm::FarmService;
use crate::models::report::{
    AdminSummary, ApiaryActivity, ApiaryHiveCount, ApiaryOption, ClimatePoint, HiveOption,
    HiveSummary, MonthCount, RoleCount, Summary, UserListing, UserSummary, WeightPoint,
};
use abejanet_core::ReportQuery;
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    apiary_options(farm.clone())
        .or(hive_options(farm.clone()))
        .unify()
        .or(summary(farm.clone()))
        .unify()
        .or(weight_series(farm.clone()))
        .unify()
        .or(climate_series(farm.clone()))
        .unify()
        .or(user_summary(farm.clone()))
        .unify()
        .or(user_growth(farm.clone()))
        .unify()
        .or(user_listing(farm.clone()))
        .unify()
        .or(hive_summary(farm.clone()))
        .unify()
        .or(hives_per_apiary(farm.clone()))
        .unify()
        .or(admin_summary(farm.clone()))
        .unify()
        .or(top_activity(farm.clone()))
        .unify()
        .boxed()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        apiary_options,
        hive_options,
        summary,
        weight_series,
        climate_series,
        user_summary,
        user_growth,
        user_listing,
        hive_summary,
        hives_per_apiary,
        admin_summary,
        top_activity
    ),
    components(schemas(
        ApiaryOption,
        HiveOption,
        Summary,
        WeightPoint,
        ClimatePoint,
        UserSummary,
        RoleCount,
        MonthCount,
        UserListing,
        HiveSummary,
        ApiaryHiveCount,
        AdminSummary,
        ApiaryActivity,
        ErrorDto
    )),
    tags((name = "reportes", description = "Aggregated reports"))
)]
pub struct ReportApi;

/// GET /api/reportes/apiarios
#[utoipa::path(get, path = "/api/reportes/apiarios", tag = "reportes", responses((status = 200, body = [ApiaryOption])))]
fn apiary_options(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "apiarios"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_apiaries().await)
        })
        .boxed()
}

/// GET /api/reportes/colmenas
#[utoipa::path(get, path = "/api/reportes/colmenas", tag = "reportes", responses((status = 200, body = [HiveOption])))]
fn hive_options(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "colmenas"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_hives().await)
        })
        .boxed()
}

/// GET /api/reportes/resumen?desde=&hasta=&apiarioId=&colmenaId=
///
/// Active hives, mean weight, 7-day weight variation and sensor alerts
#[utoipa::path(
    get,
    path = "/api/reportes/resumen",
    tag = "reportes",
    responses((status = 200, body = Summary), (status = 400, body = ErrorDto))
)]
fn summary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "resumen"))
        .and(warp::get())
        .and(warp::query::<ReportQuery>())
        .and_then(|farm: Arc<FarmService>, query: ReportQuery| async move {
            build_response(farm.report_summary(query).await)
        })
        .boxed()
}

/// GET /api/reportes/serie-peso?desde=&hasta=&apiarioId=&colmenaId=
#[utoipa::path(
    get,
    path = "/api/reportes/serie-peso",
    tag = "reportes",
    responses((status = 200, body = [WeightPoint]), (status = 400, body = ErrorDto))
)]
fn weight_series(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "serie-peso"))
        .and(warp::get())
        .and(warp::query::<ReportQuery>())
        .and_then(|farm: Arc<FarmService>, query: ReportQuery| async move {
            build_response(farm.report_weight(query).await)
        })
        .boxed()
}

/// GET /api/reportes/serie-ambiente?desde=&hasta=&apiarioId=&colmenaId=
#[utoipa::path(
    get,
    path = "/api/reportes/serie-ambiente",
    tag = "reportes",
    responses((status = 200, body = [ClimatePoint]), (status = 400, body = ErrorDto))
)]
fn climate_series(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "serie-ambiente"))
        .and(warp::get())
        .and(warp::query::<ReportQuery>())
        .and_then(|farm: Arc<FarmService>, query: ReportQuery| async move {
            build_response(farm.report_climate(query).await)
        })
        .boxed()
}

/// GET /api/reportes/usuarios/resumen
#[utoipa::path(get, path = "/api/reportes/usuarios/resumen", tag = "reportes", responses((status = 200, body = UserSummary)))]
fn user_summary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "usuarios" / "resumen"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_user_summary().await)
        })
        .boxed()
}

/// GET /api/reportes/usuarios/crecimiento?desde=&hasta=
///
/// New users per month
#[utoipa::path(
    get,
    path = "/api/reportes/usuarios/crecimiento",
    tag = "reportes",
    responses((status = 200, body = [MonthCount]), (status = 400, body = ErrorDto))
)]
fn user_growth(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "usuarios" / "crecimiento"))
        .and(warp::get())
        .and(warp::query::<ReportQuery>())
        .and_then(|farm: Arc<FarmService>, query: ReportQuery| async move {
            build_response(farm.report_user_growth(query).await)
        })
        .boxed()
}

/// GET /api/reportes/usuarios/listado
#[utoipa::path(get, path = "/api/reportes/usuarios/listado", tag = "reportes", responses((status = 200, body = [UserListing])))]
fn user_listing(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "usuarios" / "listado"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_user_listing().await)
        })
        .boxed()
}

/// GET /api/reportes/colmenas/resumen
#[utoipa::path(get, path = "/api/reportes/colmenas/resumen", tag = "reportes", responses((status = 200, body = HiveSummary)))]
fn hive_summary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "colmenas" / "resumen"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_hive_summary().await)
        })
        .boxed()
}

/// GET /api/reportes/colmenas/por-apiario
#[utoipa::path(get, path = "/api/reportes/colmenas/por-apiario", tag = "reportes", responses((status = 200, body = [ApiaryHiveCount])))]
fn hives_per_apiary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "colmenas" / "por-apiario"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_hives_per_apiary().await)
        })
        .boxed()
}

/// GET /api/reportes/apiarios/resumen-admin
#[utoipa::path(get, path = "/api/reportes/apiarios/resumen-admin", tag = "reportes", responses((status = 200, body = AdminSummary)))]
fn admin_summary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "apiarios" / "resumen-admin"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.report_admin_summary().await)
        })
        .boxed()
}

/// GET /api/reportes/apiarios/top-actividad?desde=&hasta=
///
/// Apiaries ranked by the number of readings in the range
#[utoipa::path(
    get,
    path = "/api/reportes/apiarios/top-actividad",
    tag = "reportes",
    responses((status = 200, body = [ApiaryActivity]), (status = 400, body = ErrorDto))
)]
fn top_activity(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "reportes" / "apiarios" / "top-actividad"))
        .and(warp::get())
        .and(warp::query::<ReportQuery>())
        .and_then(|farm: Arc<FarmService>, query: ReportQuery| async move {
            build_response(farm.report_top_activity(query).await)
        })
        .boxed()
}
