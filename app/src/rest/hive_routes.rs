use super::{build_created, build_response, json_body, ErrorDto, Route};
use crate::farm::FarmService;
use abejanet_core::{DeleteQuery, Deletion, Hive, HiveDetail, HiveMessage, HiveUpdateMessage};
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    list_hives(farm.clone())
        .or(get_hive(farm.clone()))
        .unify()
        .or(hive_detail(farm.clone()))
        .unify()
        .or(create_hive(farm.clone()))
        .unify()
        .or(update_hive(farm.clone()))
        .unify()
        .or(delete_hive(farm.clone()))
        .unify()
        .boxed()
}

#[derive(OpenApi)]
#[openapi(
    paths(list_hives, get_hive, hive_detail, create_hive, update_hive, delete_hive),
    components(schemas(Hive, HiveDetail, Deletion, ErrorDto)),
    tags((name = "colmenas", description = "Hives and the deletion protocol"))
)]
pub struct HiveApi;

/// GET /api/colmenas
///
/// All hives with the name of their apiary, newest first
#[utoipa::path(get, path = "/api/colmenas", tag = "colmenas", responses((status = 200, body = [Hive])))]
fn list_hives(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.list_hives().await)
        })
        .boxed()
}

/// GET /api/colmenas/:id
#[utoipa::path(
    get,
    path = "/api/colmenas/{id}",
    tag = "colmenas",
    params(("id" = i32, Path, description = "Hive id")),
    responses((status = 200, body = Hive), (status = 404, body = ErrorDto))
)]
fn get_hive(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas" / i32))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>, hive_id: i32| async move {
            build_response(farm.get_hive(hive_id).await)
        })
        .boxed()
}

/// GET /api/colmenas/:id/detalle
///
/// The hive, its sensors and its latest readings
#[utoipa::path(
    get,
    path = "/api/colmenas/{id}/detalle",
    tag = "colmenas",
    params(("id" = i32, Path, description = "Hive id")),
    responses((status = 200, body = HiveDetail), (status = 404, body = ErrorDto))
)]
fn hive_detail(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas" / i32 / "detalle"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>, hive_id: i32| async move {
            build_response(farm.hive_detail(hive_id).await)
        })
        .boxed()
}

/// POST /api/colmenas
///
/// Returns 201 and the stored hive. An unknown `apiario_id` is a 400, a
/// taken name a 409.
#[utoipa::path(
    post,
    path = "/api/colmenas",
    tag = "colmenas",
    responses(
        (status = 201, body = Hive),
        (status = 400, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn create_hive(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: HiveMessage| async move {
            build_created(farm.create_hive(body).await)
        })
        .boxed()
}

/// PUT /api/colmenas/:id
#[utoipa::path(
    put,
    path = "/api/colmenas/{id}",
    tag = "colmenas",
    params(("id" = i32, Path, description = "Hive id")),
    responses(
        (status = 200, body = Hive),
        (status = 400, body = ErrorDto),
        (status = 404, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn update_hive(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas" / i32))
        .and(warp::put())
        .and(json_body())
        .and_then(
            |farm: Arc<FarmService>, hive_id: i32, body: HiveUpdateMessage| async move {
                build_response(farm.update_hive(hive_id, body).await)
            },
        )
        .boxed()
}

/// DELETE /api/colmenas/:id?force=1
///
/// Without `force` the delete is refused with 409 while sensors or readings
/// depend on the hive. With `force=1` or `force=true` the readings, the
/// sensors and the hive are removed in one transaction.
#[utoipa::path(
    delete,
    path = "/api/colmenas/{id}",
    tag = "colmenas",
    params(
        ("id" = i32, Path, description = "Hive id"),
        ("force" = Option<String>, Query, description = "1 or true to cascade")
    ),
    responses(
        (status = 200, body = Deletion),
        (status = 404, body = ErrorDto),
        (status = 409, body = ErrorDto),
        (status = 500, body = ErrorDto)
    )
)]
fn delete_hive(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "colmenas" / i32))
        .and(warp::delete())
        .and(warp::query::<DeleteQuery>())
        .and_then(
            |farm: Arc<FarmService>, hive_id: i32, query: DeleteQuery| async move {
                build_response(farm.delete_hive(hive_id, query.forced()).await)
            },
        )
        .boxed()
}
