//! Users API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use folio_site::Record;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /users.
pub(crate) async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ServerError> {
    Ok(Json(state.users.list()?))
}

/// Handle GET /users/{username}.
pub(crate) async fn get_user(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Record>, ServerError> {
    Ok(Json(state.users.get(&username)?))
}
