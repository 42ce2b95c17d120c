//! HTTP surface of the service, built from warp filters.
//!
//! Every resource module exposes `routes(&Arc<FarmService>) -> Route` and an
//! OpenAPI fragment; [`api`] combines them with CORS, request tracing and the
//! JSON rejection handler.

use crate::error::FarmError;
use crate::farm::FarmService;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

mod apiary_routes;
mod doc_routes;
mod hive_routes;
mod metric_routes;
mod reading_routes;
mod report_routes;
mod sensor_routes;
mod user_routes;


pub type Route = BoxedFilter<(Response,)>;

/// Largest accepted JSON body.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

const SERVER_ERROR: &str = "Error del servidor";

/// Error body shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalles: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorDto {
    fn new(error: impl Into<String>) -> Self {
        ErrorDto {
            error: error.into(),
            detalles: None,
            hint: None,
        }
    }
}

pub fn build_response<T: Serialize>(resp: Result<T, FarmError>) -> Result<Response, Infallible> {
    Ok(reply(resp, StatusCode::OK))
}

/// Like [`build_response`], answering 201 on success.
pub fn build_created<T: Serialize>(resp: Result<T, FarmError>) -> Result<Response, Infallible> {
    Ok(reply(resp, StatusCode::CREATED))
}

fn reply<T: Serialize>(resp: Result<T, FarmError>, status: StatusCode) -> Response {
    match resp {
        Ok(data) => json_reply(&data, status),
        Err(err) => error_reply(err),
    }
}

fn json_reply<T: Serialize>(data: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(data), status).into_response()
}

fn error_reply(err: FarmError) -> Response {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        FarmError::Internal(_) | FarmError::Token(_) | FarmError::TokenLifetime => {
            error!("{}", err);
            ErrorDto::new(SERVER_ERROR)
        }
        FarmError::Conflict {
            message,
            details,
            hint,
        } => {
            warn!(status = status.as_u16(), "{}", message);
            ErrorDto {
                error: message,
                detalles: details,
                hint,
            }
        }
        err => {
            warn!(status = status.as_u16(), "{}", err);
            ErrorDto::new(err.to_string())
        }
    };
    json_reply(&body, status)
}

/// A size-limited JSON body.
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Turns every rejection into a JSON error body.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Recurso no encontrado".to_owned())
    } else if let Some(cause) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("JSON inválido: {}", cause))
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Parámetros de consulta inválidos".to_owned())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "El cuerpo de la petición es demasiado grande".to_owned())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Falta el encabezado Content-Length".to_owned())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Se espera un cuerpo JSON".to_owned())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Método no permitido".to_owned())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_owned())
    };
    Ok(json_reply(&ErrorDto::new(message), status))
}

/// All resource routes, without the outer middleware.
pub fn routes(farm: &Arc<FarmService>) -> Route {
    apiary_routes::routes(farm)
        .or(hive_routes::routes(farm))
        .unify()
        .or(sensor_routes::routes(farm))
        .unify()
        .or(reading_routes::routes(farm))
        .unify()
        .or(user_routes::routes(farm))
        .unify()
        .or(report_routes::routes(farm))
        .unify()
        .or(metric_routes::routes(farm))
        .unify()
        .or(doc_routes::routes())
        .unify()
        .boxed()
}

fn into_response<R: Reply>(reply: R) -> Response {
    reply.into_response()
}

/// The complete API: routes, CORS, JSON rejections and a per-request span.
pub fn api(farm: &Arc<FarmService>) -> Route {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]);

    routes(farm)
        .with(cors)
        .map(into_response)
        .recover(handle_rejection)
        .unify()
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4()
            )
        }))
        .map(into_response)
        .boxed()
}

/// Serves the API until `shutdown` resolves.
pub async fn dispatch_server<S>(
    farm: Arc<FarmService>,
    port: u16,
    shutdown: S,
) -> Result<(), warp::Error>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let (bound, server) = warp::serve(api(&farm)).try_bind_with_graceful_shutdown(addr, shutdown)?;
    info!("Starting webserver at: {}", bound);
    server.await;
    info!("Webserver stopped");
    Ok(())
}
