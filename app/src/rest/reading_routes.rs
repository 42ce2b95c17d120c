use super::{build_created, json_body, ErrorDto, Route};
use crate::farm::FarmService;
use abejanet_core::{Reading, ReadingCreated, ReadingMessage};
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    record_reading(farm.clone())
}

#[derive(OpenApi)]
#[openapi(
    paths(record_reading),
    components(schemas(Reading, ReadingCreated, ErrorDto)),
    tags((name = "lecturas", description = "Environmental readings sent by devices"))
)]
pub struct ReadingApi;

/// POST /api/lecturas
///
/// Stores one reading. Numbers may be sent as strings, `lluvia` as a boolean
/// or `0`/`1`.
#[utoipa::path(
    post,
    path = "/api/lecturas",
    tag = "lecturas",
    responses(
        (status = 201, body = ReadingCreated),
        (status = 400, body = ErrorDto),
        (status = 404, body = ErrorDto)
    )
)]
fn record_reading(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "lecturas"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: ReadingMessage| async move {
            build_created(farm.record_reading(body).await)
        })
        .boxed()
}
