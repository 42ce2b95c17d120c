use super::{build_response, Route};
use crate::farm::FarmService;
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    health(farm.clone())
}

#[derive(OpenApi)]
#[openapi(
    paths(health),
    components(schemas(dto::HealthyDto)),
    tags((name = "metricas", description = "Liveness"))
)]
pub struct MetricApi;

/// GET /api/health
///
/// Always 200 while the server runs; `database_state` reports the pool
#[utoipa::path(get, path = "/api/health", tag = "metricas", responses((status = 200, body = dto::HealthyDto)))]
fn health(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "health"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            let ret = dto::HealthyDto {
                healthy: true,
                database_state: farm.check_db().await,
                version: abejanet_core::CORE_VERSION.to_owned(),
            };
            build_response(Ok(ret))
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub database_state: String,
        pub version: String,
    }
}
