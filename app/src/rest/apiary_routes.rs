use super::{build_created, build_response, json_body, ErrorDto, Route};
use crate::farm::FarmService;
use abejanet_core::{Apiary, ApiaryMessage, ApiaryUpdateMessage, Deletion};
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    list_apiaries(farm.clone())
        .or(get_apiary(farm.clone()))
        .unify()
        .or(create_apiary(farm.clone()))
        .unify()
        .or(update_apiary(farm.clone()))
        .unify()
        .or(delete_apiary(farm.clone()))
        .unify()
        .boxed()
}

#[derive(OpenApi)]
#[openapi(
    paths(list_apiaries, get_apiary, create_apiary, update_apiary, delete_apiary),
    components(schemas(Apiary, Deletion, ErrorDto)),
    tags((name = "apiarios", description = "Apiaries"))
)]
pub struct ApiaryApi;

/// GET /api/apiarios?q=
///
/// Apiaries ordered by name, optionally filtered by a case-insensitive
/// name fragment
#[utoipa::path(
    get,
    path = "/api/apiarios",
    tag = "apiarios",
    params(("q" = Option<String>, Query, description = "Name fragment")),
    responses((status = 200, body = [Apiary]))
)]
fn list_apiaries(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "apiarios"))
        .and(warp::get())
        .and(warp::query::<dto::SearchQuery>())
        .and_then(|farm: Arc<FarmService>, query: dto::SearchQuery| async move {
            build_response(farm.list_apiaries(query.q).await)
        })
        .boxed()
}

/// GET /api/apiarios/:id
#[utoipa::path(
    get,
    path = "/api/apiarios/{id}",
    tag = "apiarios",
    params(("id" = i32, Path, description = "Apiary id")),
    responses((status = 200, body = Apiary), (status = 404, body = ErrorDto))
)]
fn get_apiary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "apiarios" / i32))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>, apiary_id: i32| async move {
            build_response(farm.get_apiary(apiary_id).await)
        })
        .boxed()
}

/// POST /api/apiarios
///
/// Returns 201 and the stored apiary, 409 if the name is taken
#[utoipa::path(
    post,
    path = "/api/apiarios",
    tag = "apiarios",
    responses(
        (status = 201, body = Apiary),
        (status = 400, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn create_apiary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "apiarios"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: ApiaryMessage| async move {
            build_created(farm.create_apiary(body).await)
        })
        .boxed()
}

/// PUT /api/apiarios/:id
///
/// Only the fields present in the body are written
#[utoipa::path(
    put,
    path = "/api/apiarios/{id}",
    tag = "apiarios",
    params(("id" = i32, Path, description = "Apiary id")),
    responses((status = 200, body = Apiary), (status = 404, body = ErrorDto))
)]
fn update_apiary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "apiarios" / i32))
        .and(warp::put())
        .and(json_body())
        .and_then(
            |farm: Arc<FarmService>, apiary_id: i32, body: ApiaryUpdateMessage| async move {
                build_response(farm.update_apiary(apiary_id, body).await)
            },
        )
        .boxed()
}

/// DELETE /api/apiarios/:id
///
/// Refused with 409 while hives belong to the apiary. There is no forced
/// mode, a `force` parameter is ignored.
#[utoipa::path(
    delete,
    path = "/api/apiarios/{id}",
    tag = "apiarios",
    params(("id" = i32, Path, description = "Apiary id")),
    responses(
        (status = 200, body = Deletion),
        (status = 404, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn delete_apiary(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "apiarios" / i32))
        .and(warp::delete())
        .and_then(|farm: Arc<FarmService>, apiary_id: i32| async move {
            build_response(farm.delete_apiary(apiary_id).await)
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SearchQuery {
        pub q: Option<String>,
    }
}
