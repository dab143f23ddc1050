//! Artifact endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::state::ApiState;
use crate::api::types::ArtifactInfo;

/// GET /api/workspace/{wsid}/artifact/{aid}
///
/// `aid` is the artifact path within a step result, e.g. `/sqlite/test`.
/// Returns metadata only.
// TODO: stream the artifact file once step result storage is readable here
pub async fn get_artifact(
    State(state): State<Arc<ApiState>>,
    Path((wsid, aid)): Path<(String, String)>,
) -> Result<Json<ArtifactInfo>, ApiError> {
    let workspace = state.workspace(&wsid).await?;
    Ok(Json(ArtifactInfo {
        id: aid,
        workspace: workspace.url().to_string(),
        available: false,
    }))
}
