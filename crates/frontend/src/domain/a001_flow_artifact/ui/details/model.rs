use crate::shared::api_utils::{api_base, error_message};
use crate::system::auth::storage::get_auth_header;
use contracts::domain::a001_flow_artifact::aggregate::FlowArtifact;
use contracts::domain::a002_artifact_session::aggregate::{
    ArtifactSession, CreateSessionRequest, UpdateSessionRequest,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::viewer::SandboxPreview;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

async fn read_json<T: DeserializeOwned>(response: Response, expected: u16) -> Result<T, String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    if status != expected {
        return Err(error_message(status, &text));
    }

    serde_json::from_str::<T>(&text).map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_artifact(id: &str) -> Result<FlowArtifact, String> {
    let url = format!("{}/api/artifacts/public/{}", api_base(), id);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch: {}", e))?;

    read_json(response, 200).await
}

pub async fn fetch_preview(id: &str) -> Result<SandboxPreview, String> {
    let url = format!("{}/api/artifacts/public/{}/preview", api_base(), id);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch: {}", e))?;

    read_json(response, 200).await
}

/// +1 к plays или likes через публичный маршрут
pub async fn record_stat(id: &str, action: &str) -> Result<(), String> {
    let url = format!("{}/api/artifacts/public/{}/{}", api_base(), id, action);

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to send: {}", e))?;

    read_json::<serde_json::Value>(response, 200).await.map(|_| ())
}

/// Открыть сессию прохождения. Без токена сессии не ведутся.
pub async fn start_session(
    artifact_id: &str,
    request: &CreateSessionRequest,
) -> Result<Option<String>, String> {
    let Some(auth_header) = get_auth_header() else {
        return Ok(None);
    };
    let url = format!("{}/api/artifacts/{}/sessions", api_base(), artifact_id);

    let response = Request::post(&url)
        .header("Authorization", &auth_header)
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send: {}", e))?;

    let session: ArtifactSession = read_json(response, 201).await?;
    Ok(Some(session.id_string()))
}

pub async fn update_session(session_id: &str, patch: &UpdateSessionRequest) -> Result<(), String> {
    let auth_header = get_auth_header().ok_or("Not authenticated")?;
    let url = format!("{}/api/artifacts/sessions/{}", api_base(), session_id);

    let response = Request::patch(&url)
        .header("Authorization", &auth_header)
        .json(patch)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send: {}", e))?;

    read_json::<ArtifactSession>(response, 200).await.map(|_| ())
}
