//! Pages API endpoints.
//!
//! Thin wrappers over [`PageService`](folio_site::PageService). Request bodies
//! are JSON; a body that fails to parse is reported with the same error
//! envelope as service errors.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_site::{PageInput, Record};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /pages.
pub(crate) async fn list_pages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ServerError> {
    Ok(Json(state.pages.list()?))
}

/// Handle GET /pages/ (root node).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Record>, ServerError> {
    Ok(Json(state.pages.get("")?))
}

/// Handle GET /pages/{*route}.
pub(crate) async fn get_page(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Record>, ServerError> {
    Ok(Json(state.pages.get(&route)?))
}

/// Handle POST /pages.
pub(crate) async fn create_page(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PageInput>, JsonRejection>,
) -> Result<Json<Record>, ServerError> {
    let Json(input) = body?;
    Ok(Json(state.pages.create(&input)?))
}

/// Handle PUT and PATCH /pages/{*route}.
pub(crate) async fn update_page(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<PageInput>, JsonRejection>,
) -> Result<Json<Record>, ServerError> {
    let Json(input) = body?;
    Ok(Json(state.pages.update(&route, &input)?))
}

/// Handle DELETE /pages/{*route}.
pub(crate) async fn delete_page(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ServerError> {
    state.pages.delete(&route)?;
    Ok(StatusCode::NO_CONTENT)
}
