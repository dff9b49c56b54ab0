use super::repository::{self, ArtifactFilter, ListOptions};
use crate::shared::data::db::MAX_SQL_OFFSET;
use crate::shared::error::{AppError, AppResult};
use contracts::domain::a001_flow_artifact::aggregate::{
    ArtifactDraft, ArtifactSort, FlowArtifact, FlowArtifactId, PublishArtifactRequest,
    StatsIncrement, ALL_CATEGORIES, DEFAULT_DURATION, DEFAULT_THUMBNAIL,
};
use contracts::domain::common::AggregateId;
use contracts::shared::message::{find_latest_artifact_block, parse_artifact, ParsedArtifact};
use contracts::shared::viewer::sandbox::{is_supported_type, SUPPORTED_TYPES};
use contracts::shared::viewer::SandboxPreview;
use sea_orm::DatabaseConnection;

pub const DEFAULT_LIST_LIMIT: u64 = 50;
pub const MAX_LIST_LIMIT: u64 = 200;

/// ID из пути. Невалидный ID не может существовать, поэтому это NotFound.
pub fn parse_artifact_id(id: &str) -> AppResult<FlowArtifactId> {
    FlowArtifactId::from_string(id).map_err(|_| AppError::not_found("Artifact"))
}

/// Публикация артефакта; автор берётся из токена
pub async fn publish(
    db: &DatabaseConnection,
    request: PublishArtifactRequest,
    author: &str,
) -> AppResult<FlowArtifact> {
    let artifact_code = resolve_artifact_code(&request)?;

    let draft = ArtifactDraft {
        title: request.title.trim().to_string(),
        description: request.description.trim().to_string(),
        instructions: request.instructions.trim().to_string(),
        artifact_code,
        conversation_id: request.conversation_id.trim().to_string(),
        category: request.category.trim().to_string(),
        difficulty: request.difficulty.unwrap_or_default(),
        duration: non_blank(request.duration).unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        thumbnail: non_blank(request.thumbnail).unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string()),
    };

    let mut aggregate = FlowArtifact::new_for_insert(draft, author.to_string());
    aggregate.validate().map_err(AppError::ValidationFailed)?;
    aggregate.before_write();

    repository::insert(db, &aggregate).await?;

    tracing::info!(
        "Artifact published: {} '{}' by {}",
        aggregate.artifact_id.as_string(),
        aggregate.title,
        aggregate.author
    );
    Ok(aggregate)
}

/// Код артефакта с обязательным явным типом.
///
/// Блок сохраняется как есть, если тип уже в нём. Иначе блок пересобирается
/// с типом из запроса.
fn resolve_artifact_code(request: &PublishArtifactRequest) -> AppResult<String> {
    let code = match non_blank(request.artifact_code.clone()) {
        Some(code) => code,
        None => find_latest_artifact_block(&request.messages).ok_or_else(|| {
            AppError::ValidationFailed("artifactCode is required".to_string())
        })?,
    };

    let parsed = parse_artifact(&code);
    let requested_type = non_blank(request.artifact_type.clone());
    let artifact_type = requested_type
        .clone()
        .or_else(|| parsed.as_ref().and_then(|p| p.artifact_type.clone()))
        .ok_or_else(|| {
            AppError::ValidationFailed(
                "Artifact type is required: add type=\"...\" to the artifact block or send artifactType"
                    .to_string(),
            )
        })?;

    if !is_supported_type(&artifact_type) {
        return Err(AppError::ValidationFailed(format!(
            "Unsupported artifact type '{}', expected one of: {}",
            artifact_type,
            SUPPORTED_TYPES.join(", ")
        )));
    }

    match parsed {
        Some(p) if p.artifact_type.as_deref() == Some(artifact_type.as_str()) => Ok(code),
        Some(p) => Ok(p.with_type(&artifact_type).to_block()),
        None => Ok(ParsedArtifact {
            content: code.trim().to_string(),
            artifact_type: Some(artifact_type),
            identifier: None,
            title: None,
            language: None,
        }
        .to_block()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Опубликованные артефакты для галереи
pub async fn list_published(
    db: &DatabaseConnection,
    category: Option<&str>,
    limit: Option<u64>,
    skip: Option<u64>,
    sort: ArtifactSort,
) -> AppResult<Vec<FlowArtifact>> {
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
        .map(str::to_string);

    let filter = ArtifactFilter {
        category,
        published_only: true,
    };
    let options = ListOptions {
        limit: limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
        skip: skip.unwrap_or(0).min(MAX_SQL_OFFSET),
        sort,
    };

    Ok(repository::list(db, &filter, options).await?)
}

/// Артефакт по ID, только опубликованный
pub async fn get_published(db: &DatabaseConnection, id: &str) -> AppResult<FlowArtifact> {
    let id = parse_artifact_id(id)?;
    repository::find_by_id(db, &id)
        .await?
        .filter(|a| a.is_published)
        .ok_or_else(|| AppError::not_found("Artifact"))
}

/// Данные для песочницы опубликованного артефакта
pub async fn preview(db: &DatabaseConnection, id: &str) -> AppResult<SandboxPreview> {
    let artifact = get_published(db, id).await?;
    Ok(SandboxPreview::from_artifact_code(&artifact.artifact_code))
}

pub async fn record_play(db: &DatabaseConnection, id: &str) -> AppResult<FlowArtifact> {
    update_stats(db, id, StatsIncrement::play()).await
}

pub async fn record_like(db: &DatabaseConnection, id: &str) -> AppResult<FlowArtifact> {
    update_stats(db, id, StatsIncrement::like()).await
}

/// Атомарное приращение счётчиков; возвращает артефакт после обновления
pub async fn update_stats(
    db: &DatabaseConnection,
    id: &str,
    increment: StatsIncrement,
) -> AppResult<FlowArtifact> {
    let id = parse_artifact_id(id)?;
    if !increment.is_empty() && repository::increment_stats(db, &id, increment).await? == 0 {
        return Err(AppError::not_found("Artifact"));
    }
    repository::find_by_id(db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Artifact"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use contracts::domain::a001_flow_artifact::aggregate::Difficulty;
    use contracts::shared::message::MessageContent;

    fn request() -> PublishArtifactRequest {
        PublishArtifactRequest {
            title: "  Breath Game ".into(),
            description: "Slow breathing".into(),
            instructions: "Follow the circle".into(),
            conversation_id: "conv-1".into(),
            category: "Wellness".into(),
            artifact_code: Some(
                ":::artifact{type=\"text/html\"}\n```\n<div>breathe</div>\n```\n:::".into(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_publish_applies_defaults() {
        let db = test_connection().await;
        let artifact = publish(&db, request(), "user-7").await.unwrap();
        assert_eq!(artifact.title, "Breath Game");
        assert_eq!(artifact.author, "user-7");
        assert_eq!(artifact.difficulty, Difficulty::Beginner);
        assert_eq!(artifact.duration, "10-15 min");
        assert_eq!(artifact.thumbnail, "🎯");
        assert!(artifact.is_published);
        assert_eq!(artifact.artifact_code, request().artifact_code.unwrap());
    }

    #[tokio::test]
    async fn test_publish_generates_unique_ids() {
        let db = test_connection().await;
        let a = publish(&db, request(), "u").await.unwrap();
        let b = publish(&db, request(), "u").await.unwrap();
        assert_ne!(a.artifact_id, b.artifact_id);
    }

    #[tokio::test]
    async fn test_publish_requires_fields() {
        let db = test_connection().await;
        let mut req = request();
        req.instructions = " ".into();
        match publish(&db, req, "u").await {
            Err(AppError::ValidationFailed(msg)) => assert_eq!(msg, "instructions is required"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_requires_explicit_type() {
        let db = test_connection().await;
        let mut req = request();
        req.artifact_code = Some("<div>untyped</div>".into());
        assert!(matches!(
            publish(&db, req.clone(), "u").await,
            Err(AppError::ValidationFailed(_))
        ));

        req.artifact_type = Some("text/html".into());
        let artifact = publish(&db, req, "u").await.unwrap();
        let parsed = artifact.parsed().unwrap();
        assert_eq!(parsed.artifact_type.as_deref(), Some("text/html"));
        assert_eq!(parsed.content, "<div>untyped</div>");
    }

    #[tokio::test]
    async fn test_publish_rejects_unknown_type() {
        let db = test_connection().await;
        let mut req = request();
        req.artifact_type = Some("application/x-shockwave-flash".into());
        assert!(matches!(
            publish(&db, req, "u").await,
            Err(AppError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_publish_from_conversation_messages() {
        let db = test_connection().await;
        let mut req = request();
        req.artifact_code = None;
        req.messages = vec![
            MessageContent::from(":::artifact{type=\"text/html\"}\n```\n<p>old</p>\n```\n:::"),
            MessageContent::from(":::artifact{type=\"application/vnd.react\"}\n```tsx\nexport default () => null\n```\n:::"),
            MessageContent::from("Looks great!"),
        ];
        let artifact = publish(&db, req, "u").await.unwrap();
        assert!(artifact.artifact_code.contains("application/vnd.react"));

        let mut empty = request();
        empty.artifact_code = None;
        assert!(matches!(
            publish(&db, empty, "u").await,
            Err(AppError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_list_ignores_all_category_and_clamps_limit() {
        let db = test_connection().await;
        publish(&db, request(), "u").await.unwrap();
        let mut other = request();
        other.category = "Games".into();
        publish(&db, other, "u").await.unwrap();

        let all = list_published(&db, Some("All"), None, None, ArtifactSort::CreatedAt)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let games = list_published(&db, Some("Games"), Some(0), None, ArtifactSort::Likes)
            .await
            .unwrap();
        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn test_unpublished_is_not_found() {
        let db = test_connection().await;
        let mut hidden = FlowArtifact::new_for_insert(
            ArtifactDraft {
                title: "t".into(),
                description: "d".into(),
                instructions: "i".into(),
                artifact_code: "c".into(),
                conversation_id: "c".into(),
                category: "General".into(),
                difficulty: Difficulty::Beginner,
                duration: DEFAULT_DURATION.into(),
                thumbnail: DEFAULT_THUMBNAIL.into(),
            },
            "u".into(),
        );
        hidden.is_published = false;
        repository::insert(&db, &hidden).await.unwrap();

        let id = hidden.artifact_id.as_string();
        assert!(matches!(
            get_published(&db, &id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            get_published(&db, "not-a-uuid").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_counters() {
        let db = test_connection().await;
        let artifact = publish(&db, request(), "u").await.unwrap();
        let id = artifact.artifact_id.as_string();

        for _ in 0..3 {
            record_play(&db, &id).await.unwrap();
        }
        let updated = record_like(&db, &id).await.unwrap();
        assert_eq!(updated.plays, 3);
        assert_eq!(updated.likes, 1);

        let missing = FlowArtifactId::new_v4().as_string();
        assert!(matches!(
            record_play(&db, &missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_preview_uses_block_type() {
        let db = test_connection().await;
        let artifact = publish(&db, request(), "u").await.unwrap();
        let preview = preview(&db, &artifact.artifact_id.as_string()).await.unwrap();
        assert_eq!(preview.file_key, "index.html");
        assert_eq!(preview.code, "<div>breathe</div>");
    }
}
