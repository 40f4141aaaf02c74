//! HTTP routes over the datasource query contract.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::datasource::DatasourceError;
use crate::query::Datasources;

const USAGE: &str = "\
Dujour - JSON/CSV Data Server
=============================

Usage
=====
GET /                   - Text format help page
GET /list               - JSON array of all loaded datasources
GET /{datasource}       - JSON representing all elements/rows for requested {datasource} or 404
GET /{datasource}/{id}  - JSON representing element/row matching {id} from requested {datasource} or 404
";

#[derive(Clone)]
struct AppState {
    datasources: Datasources,
}

/// Build the router. Every response allows any origin.
pub fn router(datasources: Datasources) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/list", get(list))
        .route("/{datasource}", get(get_all))
        .route("/{datasource}/{id}", get(get_by_id))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(AppState { datasources })
}

enum ApiError {
    NotFound,
    Internal(DatasourceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(e) => {
                tracing::error!("[http] {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Internal(DatasourceError::Internal(e.to_string())))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn served<T>(route: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    let status = match &result {
        Ok(_) => "200 OK",
        Err(ApiError::NotFound) => "404 Not Found",
        Err(ApiError::Internal(_)) => "500 Internal Server Error",
    };
    crate::log_event!("http", "served", "GET {route} - {status}");
    result
}

async fn home() -> impl IntoResponse {
    crate::log_event!("http", "served", "GET / - 200 OK");
    ([(header::CONTENT_TYPE, "text/plain")], USAGE)
}

async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    served("/list", pretty_json(&state.datasources.list_datasources()))
}

async fn get_all(
    State(state): State<AppState>,
    Path(datasource): Path<String>,
) -> Result<Response, ApiError> {
    let name = datasource.to_lowercase();
    let result = match state.datasources.get_all(&name) {
        Some(ds) => pretty_json(ds.payload()),
        None => Err(ApiError::NotFound),
    };
    served(&format!("/{name}"), result)
}

async fn get_by_id(
    State(state): State<AppState>,
    Path((datasource, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let name = datasource.to_lowercase();
    let result = match state.datasources.get_by_id(&name, &id) {
        Some(record) => pretty_json(&record),
        None => Err(ApiError::NotFound),
    };
    served(&format!("/{name}/{id}"), result)
}
