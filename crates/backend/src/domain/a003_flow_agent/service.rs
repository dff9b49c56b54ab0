use super::repository;
use crate::shared::error::{AppError, AppResult};
use contracts::domain::a003_flow_agent::aggregate::{FlowAgent, FlowAgentId};
use sea_orm::DatabaseConnection;

/// Определение Flow Architect, засеянное при старте
pub async fn get_flow_agent(db: &DatabaseConnection) -> AppResult<FlowAgent> {
    repository::find_by_id(db, &FlowAgentId::flow_architect())
        .await?
        .ok_or_else(|| AppError::not_found("Agent"))
}
