use super::apiary_routes::ApiaryApi;
use super::hive_routes::HiveApi;
use super::metric_routes::MetricApi;
use super::reading_routes::ReadingApi;
use super::report_routes::ReportApi;
use super::sensor_routes::SensorApi;
use super::user_routes::UserApi;
use super::Route;
use std::sync::Arc;
use utoipa::openapi::{Info, OpenApi as OpenApiDoc};
use utoipa::OpenApi;
use warp::{Filter, Reply};

/// Merges the fragments of every route module into one document.
pub fn merged_api() -> OpenApiDoc {
    let fragments = vec![
        ApiaryApi::openapi(),
        HiveApi::openapi(),
        SensorApi::openapi(),
        ReadingApi::openapi(),
        UserApi::openapi(),
        ReportApi::openapi(),
        MetricApi::openapi(),
    ];

    let mut api = OpenApiDoc::new(
        Info::new("AbejaNet", abejanet_core::CORE_VERSION),
        utoipa::openapi::Paths::new(),
    );
    for fragment in fragments {
        api.merge(fragment);
    }
    api
}

/// GET /api/doc/api.json
pub fn routes() -> Route {
    let api = Arc::new(merged_api());
    warp::path!("api" / "doc" / "api.json")
        .and(warp::get())
        .map(move || warp::reply::json(api.as_ref()).into_response())
        .boxed()
}
