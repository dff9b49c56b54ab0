use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::domain::a002_artifact_session::service;
use crate::shared::error::{AppError, AppResult};
use crate::shared::extract::{AppJson, AppQuery};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use contracts::domain::a002_artifact_session::aggregate::{
    ArtifactAnalytics, ArtifactSession, CreateSessionRequest, UpdateSessionRequest,
};

#[derive(Debug, Deserialize)]
pub struct SessionListParams {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

/// POST /api/artifacts/:artifact_id/sessions
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(artifact_id): Path<String>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ArtifactSession>)> {
    let request = parse_create_body(&body)?;
    let session = service::create(state.db(), &artifact_id, Some(claims.sub), request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

// Пустое тело означает запрос по умолчанию, любое другое должно быть валидным JSON
fn parse_create_body(body: &[u8]) -> AppResult<CreateSessionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateSessionRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationFailed(format!("Invalid session body: {}", e)))
}

/// PATCH /api/artifacts/sessions/:session_id
pub async fn update(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    AppJson(patch): AppJson<UpdateSessionRequest>,
) -> AppResult<Json<ArtifactSession>> {
    Ok(Json(service::update(state.db(), &session_id, patch).await?))
}

/// GET /api/artifacts/:artifact_id/sessions
pub async fn list(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
    AppQuery(params): AppQuery<SessionListParams>,
) -> AppResult<Json<Vec<ArtifactSession>>> {
    let sessions = service::list(state.db(), &artifact_id, params.limit, params.skip).await?;
    Ok(Json(sessions))
}

/// GET /api/artifacts/:artifact_id/analytics
pub async fn analytics(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<Json<ArtifactAnalytics>> {
    Ok(Json(service::analytics(state.db(), &artifact_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body() {
        assert!(parse_create_body(b"").unwrap().start_time.is_none());
        assert!(parse_create_body(b"  \n").unwrap().start_time.is_none());
        assert!(parse_create_body(b"{}").unwrap().start_time.is_none());
        assert!(parse_create_body(br#"{"startTime":"2025-01-01T10:00:00Z"}"#)
            .unwrap()
            .start_time
            .is_some());
        assert!(matches!(
            parse_create_body(b"{not json"),
            Err(AppError::ValidationFailed(_))
        ));
        assert!(matches!(
            parse_create_body(br#"{"startTime":"yesterday"}"#),
            Err(AppError::ValidationFailed(_))
        ));
    }
}
