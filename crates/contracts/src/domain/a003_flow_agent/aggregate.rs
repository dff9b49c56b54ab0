use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use serde::{Deserialize, Serialize};

pub const FLOW_AGENT_ID: &str = "flow_experiment_ai";
pub const FLOW_AGENT_NAME: &str = "Flow Architect AI";
pub const FLOW_AGENT_DESCRIPTION: &str = "Guides users through creating structured flow experiments with multiple-choice steps and optional customization.";

/// ID агента: стабильная строка, а не UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowAgentId(pub String);

impl FlowAgentId {
    pub fn flow_architect() -> Self {
        Self(FLOW_AGENT_ID.to_string())
    }
}

impl AggregateId for FlowAgentId {
    fn as_string(&self) -> String {
        self.0.clone()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("Agent id cannot be empty".into());
        }
        Ok(Self(s.to_string()))
    }
}

/// Описание агента для внешней подсистемы вызова LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowAgent {
    pub id: FlowAgentId,
    pub name: String,
    pub description: String,
    /// Системный промпт
    pub instructions: String,
    pub provider: String,
    pub endpoint: String,
    /// Пусто: модель выбирается пользователем при запуске
    pub model: String,
    pub category: String,
    pub is_promoted: bool,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl FlowAgent {
    /// Определение Flow Architect с заданным промптом
    pub fn flow_architect(instructions: String) -> Self {
        Self {
            id: FlowAgentId::flow_architect(),
            name: FLOW_AGENT_NAME.to_string(),
            description: FLOW_AGENT_DESCRIPTION.to_string(),
            instructions,
            provider: "openai".to_string(),
            endpoint: "openai".to_string(),
            model: String::new(),
            category: "experiments".to_string(),
            is_promoted: true,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Agent name cannot be empty".into());
        }
        if self.instructions.trim().is_empty() {
            return Err("Agent instructions cannot be empty".into());
        }
        Ok(())
    }
}

impl AggregateRoot for FlowAgent {
    type Id = FlowAgentId;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "flow_agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_architect_definition() {
        let agent = FlowAgent::flow_architect("You are Flow Architect AI".into());
        assert_eq!(agent.id_string(), "flow_experiment_ai");
        assert_eq!(agent.category, "experiments");
        assert!(agent.is_promoted);
        assert!(agent.model.is_empty());
        assert!(agent.validate().is_ok());

        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["id"], "flow_experiment_ai");
        assert_eq!(json["isPromoted"], true);
    }

    #[test]
    fn test_empty_prompt_is_invalid() {
        assert!(FlowAgent::flow_architect("  ".into()).validate().is_err());
    }
}
