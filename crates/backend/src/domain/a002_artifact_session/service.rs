use super::repository;
use crate::domain::a001_flow_artifact::{repository as artifact_repository, service::parse_artifact_id};
use crate::shared::data::db::MAX_SQL_OFFSET;
use crate::shared::error::{AppError, AppResult};
use chrono::Utc;
use contracts::domain::a002_artifact_session::aggregate::{
    ArtifactAnalytics, ArtifactSession, ArtifactSessionId, CreateSessionRequest,
    UpdateSessionRequest,
};
use contracts::domain::common::AggregateId;
use sea_orm::DatabaseConnection;

pub const DEFAULT_SESSION_LIMIT: u64 = 100;
pub const MAX_SESSION_LIMIT: u64 = 1000;

fn parse_session_id(id: &str) -> AppResult<ArtifactSessionId> {
    ArtifactSessionId::from_string(id).map_err(|_| AppError::not_found("Session"))
}

/// Начать сессию прохождения существующего артефакта
pub async fn create(
    db: &DatabaseConnection,
    artifact_id: &str,
    user_id: Option<String>,
    request: CreateSessionRequest,
) -> AppResult<ArtifactSession> {
    let artifact_id = parse_artifact_id(artifact_id)?;
    if artifact_repository::find_by_id(db, &artifact_id).await?.is_none() {
        return Err(AppError::not_found("Artifact"));
    }

    let start_time = request.start_time.unwrap_or_else(Utc::now);
    let mut aggregate = ArtifactSession::new_for_insert(artifact_id, user_id, start_time);
    aggregate.validate().map_err(AppError::ValidationFailed)?;
    aggregate.before_write();

    repository::insert(db, &aggregate).await?;
    tracing::debug!(
        "Session {} started for artifact {}",
        aggregate.to_string_id(),
        artifact_id.as_string()
    );
    Ok(aggregate)
}

/// Частичное обновление: меняются только переданные поля
pub async fn update(
    db: &DatabaseConnection,
    session_id: &str,
    patch: UpdateSessionRequest,
) -> AppResult<ArtifactSession> {
    if patch.is_empty() {
        return Err(AppError::ValidationFailed("Nothing to update".to_string()));
    }

    let session_id = parse_session_id(session_id)?;
    let mut aggregate = repository::find_by_id(db, &session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session"))?;

    aggregate.apply(patch);
    aggregate.validate().map_err(AppError::ValidationFailed)?;
    aggregate.before_write();

    repository::update(db, &aggregate).await?;
    Ok(aggregate)
}

pub async fn list(
    db: &DatabaseConnection,
    artifact_id: &str,
    limit: Option<u64>,
    skip: Option<u64>,
) -> AppResult<Vec<ArtifactSession>> {
    let artifact_id = parse_artifact_id(artifact_id)?;
    Ok(repository::list_by_artifact(
        db,
        &artifact_id,
        limit.unwrap_or(DEFAULT_SESSION_LIMIT).clamp(1, MAX_SESSION_LIMIT),
        skip.unwrap_or(0).min(MAX_SQL_OFFSET),
    )
    .await?)
}

/// Сводка по всем сессиям артефакта. Нет сессий: все нули.
pub async fn analytics(db: &DatabaseConnection, artifact_id: &str) -> AppResult<ArtifactAnalytics> {
    let artifact_id = parse_artifact_id(artifact_id)?;
    let sessions = repository::list_all_by_artifact(db, &artifact_id).await?;
    Ok(ArtifactAnalytics::from_sessions(&sessions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_flow_artifact::service::publish;
    use crate::shared::data::db::test_connection;
    use chrono::Duration;
    use contracts::domain::a001_flow_artifact::aggregate::{FlowArtifactId, PublishArtifactRequest};
    use serde_json::json;

    async fn published_artifact(db: &DatabaseConnection) -> String {
        let request = PublishArtifactRequest {
            title: "Focus".into(),
            description: "d".into(),
            instructions: "i".into(),
            conversation_id: "c".into(),
            category: "Productivity".into(),
            artifact_code: Some(":::artifact{type=\"text/html\"}\n<p>go</p>\n:::".into()),
            ..Default::default()
        };
        publish(db, request, "author").await.unwrap().to_string_id()
    }

    #[tokio::test]
    async fn test_create_requires_existing_artifact() {
        let db = test_connection().await;
        let missing = FlowArtifactId::new_v4().as_string();
        assert!(matches!(
            create(&db, &missing, None, CreateSessionRequest::default()).await,
            Err(AppError::NotFound(_))
        ));

        let id = published_artifact(&db).await;
        let session = create(&db, &id, Some("u1".into()), CreateSessionRequest::default())
            .await
            .unwrap();
        assert!(!session.completed);
        assert_eq!(session.end_time, None);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let db = test_connection().await;
        let id = published_artifact(&db).await;
        let session = create(&db, &id, None, CreateSessionRequest::default())
            .await
            .unwrap();
        let sid = session.to_string_id();

        let updated = update(
            &db,
            &sid,
            UpdateSessionRequest {
                duration: Some(42),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.duration, Some(42));
        assert!(!updated.completed);

        let updated = update(
            &db,
            &sid,
            UpdateSessionRequest {
                completed: Some(true),
                questionnaire_responses: Some(json!({ "flowExperience": "yes" })),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.duration, Some(42));
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_patches() {
        let db = test_connection().await;
        let id = published_artifact(&db).await;
        let session = create(&db, &id, None, CreateSessionRequest::default())
            .await
            .unwrap();
        let sid = session.to_string_id();

        assert!(matches!(
            update(&db, &sid, UpdateSessionRequest::default()).await,
            Err(AppError::ValidationFailed(_))
        ));
        assert!(matches!(
            update(
                &db,
                &sid,
                UpdateSessionRequest {
                    end_time: Some(session.start_time - Duration::minutes(5)),
                    ..Default::default()
                }
            )
            .await,
            Err(AppError::ValidationFailed(_))
        ));
        assert!(matches!(
            update(
                &db,
                &ArtifactSessionId::new_v4().as_string(),
                UpdateSessionRequest {
                    completed: Some(true),
                    ..Default::default()
                }
            )
            .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_analytics() {
        let db = test_connection().await;
        let id = published_artifact(&db).await;

        let empty = analytics(&db, &id).await.unwrap();
        assert_eq!(empty, ArtifactAnalytics::default());

        for (duration, completed) in [(60, true), (120, true), (0, false), (30, false)] {
            let s = create(&db, &id, None, CreateSessionRequest::default())
                .await
                .unwrap();
            update(
                &db,
                &s.to_string_id(),
                UpdateSessionRequest {
                    duration: Some(duration),
                    completed: Some(completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let stats = analytics(&db, &id).await.unwrap();
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.average_duration, 70.0);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(list(&db, &id, Some(2), None).await.unwrap().len(), 2);
    }
}
