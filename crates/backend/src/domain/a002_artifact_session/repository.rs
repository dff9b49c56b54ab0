use contracts::domain::a001_flow_artifact::aggregate::FlowArtifactId;
use contracts::domain::a002_artifact_session::aggregate::{ArtifactSession, ArtifactSessionId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder, QuerySelect};

mod session {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a002_artifact_session")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub session_id: String,
        pub artifact_id: String,
        pub user_id: Option<String>,
        pub start_time: chrono::DateTime<chrono::Utc>,
        pub end_time: Option<chrono::DateTime<chrono::Utc>>,
        pub duration: Option<i64>,
        pub completed: bool,
        pub questionnaire_responses: Option<Json>,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl TryFrom<session::Model> for ArtifactSession {
    type Error = DbErr;

    fn try_from(m: session::Model) -> Result<Self, Self::Error> {
        Ok(ArtifactSession {
            session_id: ArtifactSessionId::from_string(&m.session_id).map_err(DbErr::Type)?,
            artifact_id: FlowArtifactId::from_string(&m.artifact_id).map_err(DbErr::Type)?,
            user_id: m.user_id,
            start_time: m.start_time,
            end_time: m.end_time,
            duration: m.duration.map(|d| d.max(0) as u64),
            completed: m.completed,
            questionnaire_responses: m.questionnaire_responses,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        })
    }
}

fn to_active(aggregate: &ArtifactSession) -> session::ActiveModel {
    session::ActiveModel {
        session_id: Set(aggregate.to_string_id()),
        artifact_id: Set(aggregate.artifact_id.as_string()),
        user_id: Set(aggregate.user_id.clone()),
        start_time: Set(aggregate.start_time),
        end_time: Set(aggregate.end_time),
        duration: Set(aggregate.duration.map(|d| d.min(i64::MAX as u64) as i64)),
        completed: Set(aggregate.completed),
        questionnaire_responses: Set(aggregate.questionnaire_responses.clone()),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
    }
}

// ============================================================================
// Session Repository Functions
// ============================================================================

pub async fn insert(db: &DatabaseConnection, aggregate: &ArtifactSession) -> Result<(), DbErr> {
    session::Entity::insert(to_active(aggregate)).exec(db).await?;
    Ok(())
}

/// Перезаписать изменяемые поля сессии
pub async fn update(db: &DatabaseConnection, aggregate: &ArtifactSession) -> Result<(), DbErr> {
    let mut active = to_active(aggregate);
    // created_at и привязка к артефакту не меняются
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.artifact_id = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &ArtifactSessionId,
) -> Result<Option<ArtifactSession>, DbErr> {
    session::Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(ArtifactSession::try_from)
        .transpose()
}

/// Сессии артефакта, новые первыми
pub async fn list_by_artifact(
    db: &DatabaseConnection,
    artifact_id: &FlowArtifactId,
    limit: u64,
    skip: u64,
) -> Result<Vec<ArtifactSession>, DbErr> {
    session::Entity::find()
        .filter(session::Column::ArtifactId.eq(artifact_id.as_string()))
        .order_by_desc(session::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(ArtifactSession::try_from)
        .collect()
}

/// Все сессии артефакта, для аналитики
pub async fn list_all_by_artifact(
    db: &DatabaseConnection,
    artifact_id: &FlowArtifactId,
) -> Result<Vec<ArtifactSession>, DbErr> {
    session::Entity::find()
        .filter(session::Column::ArtifactId.eq(artifact_id.as_string()))
        .all(db)
        .await?
        .into_iter()
        .map(ArtifactSession::try_from)
        .collect()
}
