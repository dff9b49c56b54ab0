use chrono::Utc;
use contracts::domain::a001_flow_artifact::aggregate::{
    ArtifactSort, Difficulty, FlowArtifact, FlowArtifactId, StatsIncrement,
};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Expr;
use sea_orm::{ActiveValue::Set, QueryOrder, QuerySelect};

mod artifact {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a001_flow_artifact")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub artifact_id: String,
        pub title: String,
        pub description: String,
        pub instructions: String,
        pub artifact_code: String,
        pub conversation_id: String,
        pub author: String,
        pub category: String,
        pub difficulty: String,
        pub duration: String,
        pub thumbnail: String,
        pub likes: i64,
        pub plays: i64,
        pub is_published: bool,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl TryFrom<artifact::Model> for FlowArtifact {
    type Error = DbErr;

    fn try_from(m: artifact::Model) -> Result<Self, Self::Error> {
        let artifact_id = FlowArtifactId::from_string(&m.artifact_id).map_err(DbErr::Type)?;
        // Неизвестное значение в старых строках читается как значение по умолчанию
        let difficulty = Difficulty::from_str(&m.difficulty).unwrap_or_default();

        Ok(FlowArtifact {
            artifact_id,
            title: m.title,
            description: m.description,
            instructions: m.instructions,
            category: m.category,
            difficulty,
            duration: m.duration,
            thumbnail: m.thumbnail,
            artifact_code: m.artifact_code,
            conversation_id: m.conversation_id,
            author: m.author,
            likes: m.likes,
            plays: m.plays,
            is_published: m.is_published,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        })
    }
}

fn into_aggregates(models: Vec<artifact::Model>) -> Result<Vec<FlowArtifact>, DbErr> {
    models.into_iter().map(FlowArtifact::try_from).collect()
}

/// Фильтр списка артефактов
#[derive(Debug, Clone, Default)]
pub struct ArtifactFilter {
    pub category: Option<String>,
    pub published_only: bool,
}

/// Пагинация и сортировка списка
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub limit: u64,
    pub skip: u64,
    pub sort: ArtifactSort,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            skip: 0,
            sort: ArtifactSort::CreatedAt,
        }
    }
}

// ============================================================================
// Artifact Repository Functions
// ============================================================================

/// Вставить новый артефакт
pub async fn insert(db: &DatabaseConnection, aggregate: &FlowArtifact) -> Result<(), DbErr> {
    let active = artifact::ActiveModel {
        artifact_id: Set(aggregate.to_string_id()),
        title: Set(aggregate.title.clone()),
        description: Set(aggregate.description.clone()),
        instructions: Set(aggregate.instructions.clone()),
        artifact_code: Set(aggregate.artifact_code.clone()),
        conversation_id: Set(aggregate.conversation_id.clone()),
        author: Set(aggregate.author.clone()),
        category: Set(aggregate.category.clone()),
        difficulty: Set(aggregate.difficulty.as_str().to_string()),
        duration: Set(aggregate.duration.clone()),
        thumbnail: Set(aggregate.thumbnail.clone()),
        likes: Set(aggregate.likes),
        plays: Set(aggregate.plays),
        is_published: Set(aggregate.is_published),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
    };

    artifact::Entity::insert(active).exec(db).await?;
    Ok(())
}

/// Найти артефакт по ID
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &FlowArtifactId,
) -> Result<Option<FlowArtifact>, DbErr> {
    artifact::Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(FlowArtifact::try_from)
        .transpose()
}

/// Список артефактов с фильтром, пагинацией и сортировкой (по убыванию)
pub async fn list(
    db: &DatabaseConnection,
    filter: &ArtifactFilter,
    options: ListOptions,
) -> Result<Vec<FlowArtifact>, DbErr> {
    let mut query = artifact::Entity::find();

    if filter.published_only {
        query = query.filter(artifact::Column::IsPublished.eq(true));
    }
    if let Some(category) = &filter.category {
        query = query.filter(artifact::Column::Category.eq(category.as_str()));
    }

    query = match options.sort {
        ArtifactSort::CreatedAt => query.order_by_desc(artifact::Column::CreatedAt),
        ArtifactSort::Likes => query
            .order_by_desc(artifact::Column::Likes)
            .order_by_desc(artifact::Column::CreatedAt),
        ArtifactSort::Plays => query
            .order_by_desc(artifact::Column::Plays)
            .order_by_desc(artifact::Column::CreatedAt),
    };

    let models = query
        .offset(options.skip)
        .limit(options.limit)
        .all(db)
        .await?;

    into_aggregates(models)
}

/// Атомарно увеличить счётчики одним UPDATE. Возвращает число затронутых строк.
pub async fn increment_stats(
    db: &DatabaseConnection,
    id: &FlowArtifactId,
    increment: StatsIncrement,
) -> Result<u64, DbErr> {
    let mut update = artifact::Entity::update_many()
        .col_expr(artifact::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(artifact::Column::ArtifactId.eq(id.as_string()));

    if increment.plays > 0 {
        update = update.col_expr(
            artifact::Column::Plays,
            Expr::col(artifact::Column::Plays).add(i64::from(increment.plays)),
        );
    }
    if increment.likes > 0 {
        update = update.col_expr(
            artifact::Column::Likes,
            Expr::col(artifact::Column::Likes).add(i64::from(increment.likes)),
        );
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use contracts::domain::a001_flow_artifact::aggregate::ArtifactDraft;

    fn sample(title: &str, category: &str) -> FlowArtifact {
        FlowArtifact::new_for_insert(
            ArtifactDraft {
                title: title.into(),
                description: "desc".into(),
                instructions: "do it".into(),
                artifact_code: ":::artifact{type=\"text/html\"}\n```\n<p/>\n```\n:::".into(),
                conversation_id: "conv".into(),
                category: category.into(),
                difficulty: Difficulty::Intermediate,
                duration: "5 min".into(),
                thumbnail: "🎵".into(),
            },
            "author-1".into(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_connection().await;
        let artifact = sample("Rhythm", "Music");
        insert(&db, &artifact).await.unwrap();

        let found = find_by_id(&db, &artifact.artifact_id).await.unwrap().unwrap();
        assert_eq!(found.artifact_id, artifact.artifact_id);
        assert_eq!(found.title, "Rhythm");
        assert_eq!(found.difficulty, Difficulty::Intermediate);
        assert_eq!(found.thumbnail, "🎵");
        assert!(found.is_published);
        let drift = found.metadata.created_at - artifact.metadata.created_at;
        assert!(drift.num_seconds().abs() < 1);
        assert!(find_by_id(&db, &FlowArtifactId::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let db = test_connection().await;
        let mut popular = sample("Popular", "Games");
        popular.likes = 10;
        let mut hidden = sample("Hidden", "Games");
        hidden.is_published = false;
        hidden.likes = 100;
        let other = sample("Other", "Art");
        for a in [&popular, &hidden, &other] {
            insert(&db, a).await.unwrap();
        }

        let filter = ArtifactFilter {
            category: Some("Games".into()),
            published_only: true,
        };
        let games = list(&db, &filter, ListOptions::default()).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Popular");

        let by_likes = list(
            &db,
            &ArtifactFilter {
                published_only: true,
                ..Default::default()
            },
            ListOptions {
                sort: ArtifactSort::Likes,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let titles: Vec<_> = by_likes.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Popular", "Other"]);

        let page = list(
            &db,
            &ArtifactFilter::default(),
            ListOptions {
                limit: 1,
                skip: 1,
                sort: ArtifactSort::Likes,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Popular");
    }

    #[tokio::test]
    async fn test_increment_is_cumulative() {
        let db = test_connection().await;
        let artifact = sample("Counter", "Games");
        insert(&db, &artifact).await.unwrap();

        let n = 25;
        let tasks: Vec<_> = (0..n)
            .map(|_| {
                let db = db.clone();
                let id = artifact.artifact_id;
                tokio::spawn(async move { increment_stats(&db, &id, StatsIncrement::play()).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 1);
        }
        increment_stats(&db, &artifact.artifact_id, StatsIncrement::like())
            .await
            .unwrap();

        let stored = find_by_id(&db, &artifact.artifact_id).await.unwrap().unwrap();
        assert_eq!(stored.plays, n);
        assert_eq!(stored.likes, 1);
    }

    #[tokio::test]
    async fn test_increment_unknown_touches_nothing() {
        let db = test_connection().await;
        let rows = increment_stats(&db, &FlowArtifactId::new_v4(), StatsIncrement::play())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }
}
