use anyhow::{Context, Result};
use contracts::domain::a003_flow_agent::aggregate::FlowAgent;
use sea_orm::DatabaseConnection;

use crate::domain::a003_flow_agent::{prompt, repository};

/// Ensure the Flow Architect agent exists and carries the current prompt
///
/// Повторный запуск обновляет все поля, кроме `created_at`.
pub async fn ensure_flow_agent_exists(
    db: &DatabaseConnection,
    prompt_override: Option<&str>,
) -> Result<FlowAgent> {
    let instructions = prompt::resolve_prompt(prompt_override);
    let agent = FlowAgent::flow_architect(instructions);
    agent
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid flow agent definition: {}", e))?;

    let (stored, created) = repository::upsert(db, &agent)
        .await
        .context("Failed to upsert flow agent")?;

    if created {
        tracing::info!("Agent created: {} ({})", stored.name, stored.id.0);
    } else {
        tracing::info!("Agent updated: {} ({})", stored.name, stored.id.0);
    }
    if prompt_override.is_some_and(|p| !p.trim().is_empty()) {
        tracing::info!("Flow agent uses an overridden prompt");
    }

    Ok(stored)
}
