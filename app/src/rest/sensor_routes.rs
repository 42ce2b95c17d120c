use super::{build_created, build_response, json_body, ErrorDto, Route};
use crate::farm::FarmService;
use abejanet_core::{
    DeleteQuery, Deletion, Sensor, SensorMessage, SensorQuery, SensorState, SensorUpdateMessage,
};
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    list_sensors(farm.clone())
        .or(get_sensor(farm.clone()))
        .unify()
        .or(create_sensor(farm.clone()))
        .unify()
        .or(update_sensor(farm.clone()))
        .unify()
        .or(delete_sensor(farm.clone()))
        .unify()
        .boxed()
}

#[derive(OpenApi)]
#[openapi(
    paths(list_sensors, get_sensor, create_sensor, update_sensor, delete_sensor),
    components(schemas(Sensor, SensorState, Deletion, ErrorDto)),
    tags((name = "sensores", description = "Sensors mounted on hives"))
)]
pub struct SensorApi;

/// GET /api/sensores?colmena=&mac=
#[utoipa::path(
    get,
    path = "/api/sensores",
    tag = "sensores",
    params(
        ("colmena" = Option<i32>, Query, description = "Hive id"),
        ("mac" = Option<String>, Query, description = "MAC address fragment")
    ),
    responses((status = 200, body = [Sensor]))
)]
fn list_sensors(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sensores"))
        .and(warp::get())
        .and(warp::query::<SensorQuery>())
        .and_then(|farm: Arc<FarmService>, query: SensorQuery| async move {
            build_response(farm.list_sensors(query).await)
        })
        .boxed()
}

/// GET /api/sensores/:id
#[utoipa::path(
    get,
    path = "/api/sensores/{id}",
    tag = "sensores",
    params(("id" = i32, Path, description = "Sensor id")),
    responses((status = 200, body = Sensor), (status = 404, body = ErrorDto))
)]
fn get_sensor(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sensores" / i32))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>, sensor_id: i32| async move {
            build_response(farm.get_sensor(sensor_id).await)
        })
        .boxed()
}

/// POST /api/sensores
///
/// A sensor without `estado` starts `activo` when mounted on a hive and
/// `no_asignado` otherwise
#[utoipa::path(
    post,
    path = "/api/sensores",
    tag = "sensores",
    responses(
        (status = 201, body = Sensor),
        (status = 400, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn create_sensor(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sensores"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: SensorMessage| async move {
            build_created(farm.create_sensor(body).await)
        })
        .boxed()
}

/// PUT /api/sensores/:id
#[utoipa::path(
    put,
    path = "/api/sensores/{id}",
    tag = "sensores",
    params(("id" = i32, Path, description = "Sensor id")),
    responses(
        (status = 200, body = Sensor),
        (status = 400, body = ErrorDto),
        (status = 404, body = ErrorDto)
    )
)]
fn update_sensor(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sensores" / i32))
        .and(warp::put())
        .and(json_body())
        .and_then(
            |farm: Arc<FarmService>, sensor_id: i32, body: SensorUpdateMessage| async move {
                build_response(farm.update_sensor(sensor_id, body).await)
            },
        )
        .boxed()
}

/// DELETE /api/sensores/:id?force=1
///
/// Refused with 409 while readings exist, unless forced
#[utoipa::path(
    delete,
    path = "/api/sensores/{id}",
    tag = "sensores",
    params(("id" = i32, Path, description = "Sensor id"), ("force" = Option<String>, Query, description = "`1` or `true` also deletes dependents")),
    responses(
        (status = 200, body = Deletion),
        (status = 404, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn delete_sensor(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sensores" / i32))
        .and(warp::delete())
        .and(warp::query::<DeleteQuery>())
        .and_then(
            |farm: Arc<FarmService>, sensor_id: i32, query: DeleteQuery| async move {
                build_response(farm.delete_sensor(sensor_id, query.forced()).await)
            },
        )
        .boxed()
}
