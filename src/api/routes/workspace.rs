//! Liveness and workspace summary endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::state::ApiState;
use crate::api::types::GetWorkspaceOutput;

/// GET /
///
/// Liveness probe; always 200 with an empty body.
pub async fn index() -> StatusCode {
    StatusCode::OK
}

/// GET /api/workspace/{wsid}
pub async fn get_workspace(
    State(state): State<Arc<ApiState>>,
    Path(wsid): Path<String>,
) -> Result<Json<GetWorkspaceOutput>, ApiError> {
    let workspace = state.workspace(&wsid).await?;
    Ok(Json(GetWorkspaceOutput {
        url: workspace.url().to_string(),
    }))
}
