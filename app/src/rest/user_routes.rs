use super::{build_created, build_response, json_body, ErrorDto, Route};
use crate::auth::Claims;
use crate::farm::FarmService;
use abejanet_core::{
    Deletion, LoginMessage, LoginResponse, Role, User, UserMessage, UserUpdateMessage,
};
use std::sync::Arc;
use utoipa::OpenApi;
use warp::Filter;

pub fn routes(farm: &Arc<FarmService>) -> Route {
    login(farm.clone())
        .or(session(farm.clone()))
        .unify()
        .or(list_users(farm.clone()))
        .unify()
        .or(get_user(farm.clone()))
        .unify()
        .or(create_user(farm.clone()))
        .unify()
        .or(update_user(farm.clone()))
        .unify()
        .or(delete_user(farm.clone()))
        .unify()
        .or(list_roles(farm.clone()))
        .unify()
        .boxed()
}

#[derive(OpenApi)]
#[openapi(
    paths(login, session, list_users, get_user, create_user, update_user, delete_user, list_roles),
    components(schemas(User, Role, LoginResponse, Claims, Deletion, ErrorDto)),
    tags((name = "usuarios", description = "Users, roles and sessions"))
)]
pub struct UserApi;

/// POST /api/login
///
/// Checks the credentials of an active user and returns a session token
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "usuarios",
    responses((status = 200, body = LoginResponse), (status = 401, body = ErrorDto))
)]
fn login(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "login"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: LoginMessage| async move {
            build_response(farm.login(body).await)
        })
        .boxed()
}

/// GET /api/sesion
///
/// Decodes the `Authorization: Bearer <token>` header
#[utoipa::path(
    get,
    path = "/api/sesion",
    tag = "usuarios",
    responses((status = 200, body = Claims), (status = 401, body = ErrorDto))
)]
fn session(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "sesion"))
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and_then(
            |farm: Arc<FarmService>, authorization: Option<String>| async move {
                build_response(farm.session(authorization.as_deref()))
            },
        )
        .boxed()
}

/// GET /api/usuarios?correo=
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "usuarios",
    params(("correo" = Option<String>, Query, description = "E-mail fragment")),
    responses((status = 200, body = [User]))
)]
fn list_users(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "usuarios"))
        .and(warp::get())
        .and(warp::query::<dto::UserQuery>())
        .and_then(|farm: Arc<FarmService>, query: dto::UserQuery| async move {
            build_response(farm.list_users(query.correo).await)
        })
        .boxed()
}

/// GET /api/usuarios/:correo
#[utoipa::path(
    get,
    path = "/api/usuarios/{correo}",
    tag = "usuarios",
    params(("correo" = String, Path, description = "User e-mail")),
    responses((status = 200, body = User), (status = 404, body = ErrorDto))
)]
fn get_user(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "usuarios" / String))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>, email: String| async move {
            build_response(farm.get_user(&email).await)
        })
        .boxed()
}

/// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "usuarios",
    responses(
        (status = 201, body = User),
        (status = 400, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn create_user(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "usuarios"))
        .and(warp::post())
        .and(json_body())
        .and_then(|farm: Arc<FarmService>, body: UserMessage| async move {
            build_created(farm.create_user(body).await)
        })
        .boxed()
}

/// PUT /api/usuarios/:id
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "usuarios",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, body = User),
        (status = 400, body = ErrorDto),
        (status = 404, body = ErrorDto),
        (status = 409, body = ErrorDto)
    )
)]
fn update_user(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "usuarios" / i32))
        .and(warp::put())
        .and(json_body())
        .and_then(
            |farm: Arc<FarmService>, user_id: i32, body: UserUpdateMessage| async move {
                build_response(farm.update_user(user_id, body).await)
            },
        )
        .boxed()
}

/// DELETE /api/usuarios/:id
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "usuarios",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = Deletion), (status = 404, body = ErrorDto))
)]
fn delete_user(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "usuarios" / i32))
        .and(warp::delete())
        .and_then(|farm: Arc<FarmService>, user_id: i32| async move {
            build_response(farm.delete_user(user_id).await)
        })
        .boxed()
}

/// GET /api/roles
#[utoipa::path(get, path = "/api/roles", tag = "usuarios", responses((status = 200, body = [Role])))]
fn list_roles(farm: Arc<FarmService>) -> Route {
    warp::any()
        .map(move || farm.clone())
        .and(warp::path!("api" / "roles"))
        .and(warp::get())
        .and_then(|farm: Arc<FarmService>| async move {
            build_response(farm.list_roles().await)
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserQuery {
        pub correo: Option<String>,
    }
}
