use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::shared::state::AppState;
use crate::system::auth::middleware::require_auth;
use crate::system::middleware::request_logger::request_logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/artifacts", artifact_routes(state.clone()))
        .route(
            "/api/agents/flow-experiment",
            get(handlers::a003_flow_agent::get_flow_agent)
                .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .route("/api/messages/parse", post(handlers::messages::parse))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

fn artifact_routes(state: AppState) -> Router<AppState> {
    // ========================================
    // PUBLIC
    // ========================================
    let public = Router::new()
        .route("/public", get(handlers::a001_flow_artifact::list_public))
        .route(
            "/public/:artifact_id",
            get(handlers::a001_flow_artifact::get_public),
        )
        .route(
            "/public/:artifact_id/preview",
            get(handlers::a001_flow_artifact::preview),
        )
        .route(
            "/public/:artifact_id/play",
            post(handlers::a001_flow_artifact::play),
        )
        .route(
            "/public/:artifact_id/like",
            post(handlers::a001_flow_artifact::like),
        );

    // ========================================
    // PROTECTED (JWT)
    // ========================================
    let protected = Router::new()
        .route("/publish", post(handlers::a001_flow_artifact::publish))
        .route("/:artifact_id/play", post(handlers::a001_flow_artifact::play))
        .route("/:artifact_id/like", post(handlers::a001_flow_artifact::like))
        .route(
            "/:artifact_id/sessions",
            get(handlers::a002_artifact_session::list).post(handlers::a002_artifact_session::create),
        )
        .route(
            "/:artifact_id/analytics",
            get(handlers::a002_artifact_session::analytics),
        )
        .route(
            "/sessions/:session_id",
            patch(handlers::a002_artifact_session::update),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use crate::system::auth::jwt::generate_access_token;
    use crate::system::initialization::ensure_flow_agent_exists;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn app() -> (Router, String) {
        let db = test_connection().await;
        ensure_flow_agent_exists(&db, None).await.unwrap();
        let state = AppState::new(db, SECRET);
        let token = generate_access_token(state.jwt(), "user-42", "tester").unwrap();
        (configure_routes(state), token)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn publish_body() -> Value {
        json!({
            "title": "Color Drift",
            "description": "Mix colors until they match",
            "instructions": "Drag the sliders",
            "conversationId": "conv-9",
            "category": "Games",
            "artifactCode": ":::artifact{type=\"text/html\"}\n```html\n<div>drift</div>\n```\n:::"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (app, _) = app().await;
        let (status, body) = send(&app, Method::POST, "/api/artifacts/publish", None, Some(publish_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/agents/flow-experiment",
            Some("not-a-jwt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_publish_and_gallery_flow() {
        let (app, token) = app().await;

        let (status, artifact) = send(
            &app,
            Method::POST,
            "/api/artifacts/publish",
            Some(&token),
            Some(publish_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(artifact["author"], "user-42");
        assert_eq!(artifact["likes"], 0);
        let id = artifact["artifactId"].as_str().unwrap().to_string();

        let (status, list) = send(&app, Method::GET, "/api/artifacts/public?category=All&sort=plays", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::POST, &format!("/api/artifacts/public/{id}/play"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
        let (status, _) = send(&app, Method::POST, &format!("/api/artifacts/{id}/like"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, fetched) = send(&app, Method::GET, &format!("/api/artifacts/public/{id}"), None, None).await;
        assert_eq!(fetched["plays"], 1);
        assert_eq!(fetched["likes"], 1);

        let (status, preview) = send(&app, Method::GET, &format!("/api/artifacts/public/{id}/preview"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["template"], "static");
        assert_eq!(preview["code"], "<div>drift</div>");
    }

    #[tokio::test]
    async fn test_publish_without_type_is_rejected() {
        let (app, token) = app().await;
        let mut body = publish_body();
        body["artifactCode"] = json!("<div>no wrapper</div>");
        let (status, error) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("type"));
    }

    #[tokio::test]
    async fn test_missing_artifacts_are_404() {
        let (app, token) = app().await;
        let missing = uuid::Uuid::new_v4();

        let (status, body) = send(&app, Method::GET, &format!("/api/artifacts/public/{missing}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Artifact not found");

        let (status, _) = send(&app, Method::POST, &format!("/api/artifacts/public/{missing}/play"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::POST, "/api/artifacts/garbage/like", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sessions_and_analytics() {
        let (app, token) = app().await;
        let (_, artifact) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(publish_body())).await;
        let id = artifact["artifactId"].as_str().unwrap().to_string();

        let (status, session) = send(
            &app,
            Method::POST,
            &format!("/api/artifacts/{id}/sessions"),
            Some(&token),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(session["userId"], "user-42");
        assert_eq!(session["completed"], false);
        let session_id = session["sessionId"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            Method::PATCH,
            &format!("/api/artifacts/sessions/{session_id}"),
            Some(&token),
            Some(json!({ "duration": 95, "completed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["duration"], 95);

        let (status, sessions) = send(&app, Method::GET, &format!("/api/artifacts/{id}/sessions"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sessions.as_array().unwrap().len(), 1);

        let (status, analytics) = send(&app, Method::GET, &format!("/api/artifacts/{id}/analytics"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analytics["totalSessions"], 1);
        assert_eq!(analytics["completedSessions"], 1);
        assert_eq!(analytics["averageDuration"], 95.0);
        assert_eq!(analytics["completionRate"], 100.0);
    }

    #[tokio::test]
    async fn test_flow_agent_and_message_parse() {
        let (app, token) = app().await;

        let (status, agent) = send(&app, Method::GET, "/api/agents/flow-experiment", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(agent["id"], "flow_experiment_ai");
        assert_eq!(agent["isPromoted"], true);

        let (status, parsed) = send(
            &app,
            Method::POST,
            "/api/messages/parse",
            None,
            Some(json!({ "content": "Pick a goal\n====\n{\"options\": [\"Make music\", \"Relax\"]}" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parsed["message"], "Pick a goal");
        assert_eq!(parsed["options"], json!(["Make music", "Relax"]));
        assert_eq!(parsed["artifact"], Value::Null);
    }

    #[tokio::test]
    async fn test_oversized_paging_is_clamped() {
        let (app, token) = app().await;
        let (_, artifact) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(publish_body())).await;
        let id = artifact["artifactId"].as_str().unwrap().to_string();

        let (status, list) = send(&app, Method::GET, "/api/artifacts/public?skip=18446744073709551615", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));

        let (status, list) = send(
            &app,
            Method::GET,
            "/api/artifacts/public?limit=18446744073709551615&skip=0",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, sessions) = send(
            &app,
            Method::GET,
            &format!("/api/artifacts/{id}/sessions?limit=18446744073709551615&skip=18446744073709551615"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sessions, json!([]));
    }

    #[tokio::test]
    async fn test_oversized_duration_is_rejected() {
        let (app, token) = app().await;
        let (_, artifact) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(publish_body())).await;
        let id = artifact["artifactId"].as_str().unwrap().to_string();
        let (_, session) = send(&app, Method::POST, &format!("/api/artifacts/{id}/sessions"), Some(&token), None).await;
        let session_id = session["sessionId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/artifacts/sessions/{session_id}"),
            Some(&token),
            Some(json!({ "duration": u64::MAX, "completed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("duration"));

        let (status, analytics) = send(&app, Method::GET, &format!("/api/artifacts/{id}/analytics"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analytics["totalSessions"], 1);
        assert_eq!(analytics["completedSessions"], 0);
    }

    #[tokio::test]
    async fn test_malformed_input_gets_json_error() {
        let (app, token) = app().await;

        let mut body = publish_body();
        body["difficulty"] = json!("Expert");
        let (status, error) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("difficulty"));

        let (status, error) = send(&app, Method::GET, "/api/artifacts/public?limit=abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].is_string());

        let (status, error) = send(&app, Method::POST, "/api/messages/parse", None, Some(json!({ "text": "hi" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].is_string());
    }

    #[tokio::test]
    async fn test_session_create_rejects_malformed_body() {
        let (app, token) = app().await;
        let (_, artifact) = send(&app, Method::POST, "/api/artifacts/publish", Some(&token), Some(publish_body())).await;
        let id = artifact["artifactId"].as_str().unwrap().to_string();

        let (status, error) = send(
            &app,
            Method::POST,
            &format!("/api/artifacts/{id}/sessions"),
            Some(&token),
            Some(json!({ "startTime": "not a date" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].is_string());

        let (status, _) = send(&app, Method::POST, &format!("/api/artifacts/{id}/sessions"), Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
