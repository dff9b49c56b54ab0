use axum::{extract::State, Json};

use crate::domain::a003_flow_agent::service;
use crate::shared::error::AppResult;
use crate::shared::state::AppState;
use contracts::domain::a003_flow_agent::aggregate::FlowAgent;

/// GET /api/agents/flow-experiment
pub async fn get_flow_agent(State(state): State<AppState>) -> AppResult<Json<FlowAgent>> {
    Ok(Json(service::get_flow_agent(state.db()).await?))
}
