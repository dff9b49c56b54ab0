use chrono::Utc;
use contracts::domain::a003_flow_agent::aggregate::{FlowAgent, FlowAgentId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

mod agent {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_flow_agent")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub description: String,
        pub instructions: String,
        pub provider: String,
        pub endpoint: String,
        pub model: String,
        pub category: String,
        pub is_promoted: bool,
        pub created_at: chrono::DateTime<chrono::Utc>,
        pub updated_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<agent::Model> for FlowAgent {
    fn from(m: agent::Model) -> Self {
        FlowAgent {
            id: FlowAgentId(m.id),
            name: m.name,
            description: m.description,
            instructions: m.instructions,
            provider: m.provider,
            endpoint: m.endpoint,
            model: m.model,
            category: m.category,
            is_promoted: m.is_promoted,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        }
    }
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &FlowAgentId,
) -> Result<Option<FlowAgent>, DbErr> {
    Ok(agent::Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(FlowAgent::from))
}

/// Вставить или обновить агента по ID. `created_at` существующей записи не меняется.
///
/// Возвращает сохранённую запись и признак того, что она была создана.
pub async fn upsert(db: &DatabaseConnection, aggregate: &FlowAgent) -> Result<(FlowAgent, bool), DbErr> {
    let now = Utc::now();
    let existing = agent::Entity::find_by_id(aggregate.id.as_string()).one(db).await?;
    let created = existing.is_none();

    let active = agent::ActiveModel {
        id: Set(aggregate.id.as_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        instructions: Set(aggregate.instructions.clone()),
        provider: Set(aggregate.provider.clone()),
        endpoint: Set(aggregate.endpoint.clone()),
        model: Set(aggregate.model.clone()),
        category: Set(aggregate.category.clone()),
        is_promoted: Set(aggregate.is_promoted),
        created_at: if created { Set(now) } else { NotSet },
        updated_at: Set(now),
    };

    if created {
        agent::Entity::insert(active).exec(db).await?;
    } else {
        active.update(db).await?;
    }

    let stored = find_by_id(db, &aggregate.id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(aggregate.id.as_string()))?;
    Ok((stored, created))
}
