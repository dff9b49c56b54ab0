use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::a001_flow_artifact::service;
use crate::shared::error::AppResult;
use crate::shared::extract::{AppJson, AppQuery};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use contracts::domain::a001_flow_artifact::aggregate::{
    ArtifactSort, FlowArtifact, PublishArtifactRequest,
};
use contracts::shared::viewer::SandboxPreview;

#[derive(Debug, Deserialize)]
pub struct ArtifactListParams {
    pub category: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub sort: Option<String>,
}

/// POST /api/artifacts/publish
pub async fn publish(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    AppJson(request): AppJson<PublishArtifactRequest>,
) -> AppResult<(StatusCode, Json<FlowArtifact>)> {
    let artifact = service::publish(state.db(), request, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// GET /api/artifacts/public
pub async fn list_public(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArtifactListParams>,
) -> AppResult<Json<Vec<FlowArtifact>>> {
    let items = service::list_published(
        state.db(),
        params.category.as_deref(),
        params.limit,
        params.skip,
        ArtifactSort::from_param(params.sort.as_deref()),
    )
    .await?;
    Ok(Json(items))
}

/// GET /api/artifacts/public/:artifact_id
pub async fn get_public(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<Json<FlowArtifact>> {
    Ok(Json(service::get_published(state.db(), &artifact_id).await?))
}

/// GET /api/artifacts/public/:artifact_id/preview
pub async fn preview(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<Json<SandboxPreview>> {
    Ok(Json(service::preview(state.db(), &artifact_id).await?))
}

/// POST /api/artifacts/:artifact_id/play, /api/artifacts/public/:artifact_id/play
pub async fn play(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<Json<Value>> {
    service::record_play(state.db(), &artifact_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/artifacts/:artifact_id/like, /api/artifacts/public/:artifact_id/like
pub async fn like(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<Json<Value>> {
    service::record_like(state.db(), &artifact_id).await?;
    Ok(Json(json!({ "success": true })))
}
