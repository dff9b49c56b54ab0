use crate::domain::a001_flow_artifact::aggregate::FlowArtifactId;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ID типа для агрегата Artifact Session
/// Верхняя граница длительности сессии, секунды (сутки)
pub const MAX_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSessionId(pub Uuid);

impl ArtifactSessionId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ArtifactSessionId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ArtifactSessionId::new)
            .map_err(|e| format!("Invalid session id: {}", e))
    }
}

/// Агрегат Artifact Session: одно прохождение артефакта
///
/// `artifact_id` хранится по значению, целостность ссылки не проверяется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSession {
    pub session_id: ArtifactSessionId,
    pub artifact_id: FlowArtifactId,
    /// Пусто для анонимных прохождений
    pub user_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Длительность в секундах
    pub duration: Option<u64>,
    pub completed: bool,
    pub questionnaire_responses: Option<serde_json::Value>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl ArtifactSession {
    pub fn new_for_insert(
        artifact_id: FlowArtifactId,
        user_id: Option<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: ArtifactSessionId::new_v4(),
            artifact_id,
            user_id,
            start_time,
            end_time: None,
            duration: None,
            completed: false,
            questionnaire_responses: None,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.session_id.as_string()
    }

    /// Применить частичное обновление
    pub fn apply(&mut self, patch: UpdateSessionRequest) {
        if let Some(end_time) = patch.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(duration) = patch.duration {
            self.duration = Some(duration);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(responses) = patch.questionnaire_responses {
            self.questionnaire_responses = Some(responses);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.duration.is_some_and(|d| d > MAX_SESSION_DURATION_SECS) {
            return Err(format!(
                "duration cannot exceed {} seconds",
                MAX_SESSION_DURATION_SECS
            ));
        }
        if let Some(end_time) = self.end_time {
            if end_time < self.start_time {
                return Err("endTime cannot be before startTime".into());
            }
        }
        if let Some(user_id) = &self.user_id {
            if user_id.trim().is_empty() {
                return Err("userId cannot be blank".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

impl AggregateRoot for ArtifactSession {
    type Id = ArtifactSessionId;

    fn id(&self) -> Self::Id {
        self.session_id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "artifact_session"
    }
}

/// Тело запроса POST /:artifactId/sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Если не указано, берётся текущее время
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// Тело запроса PATCH /sessions/:sessionId
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire_responses: Option<serde_json::Value>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.end_time.is_none()
            && self.duration.is_none()
            && self.completed.is_none()
            && self.questionnaire_responses.is_none()
    }
}

/// Сводка по прохождениям артефакта
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactAnalytics {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    /// Среднее по сессиям, у которых есть ненулевая длительность
    pub average_duration: f64,
    /// Процент завершённых, 0..=100
    pub completion_rate: f64,
}

impl ArtifactAnalytics {
    /// Посчитать сводку полным проходом по сессиям
    pub fn from_sessions(sessions: &[ArtifactSession]) -> Self {
        let total_sessions = sessions.len() as u64;
        if total_sessions == 0 {
            return Self::default();
        }

        let completed_sessions = sessions.iter().filter(|s| s.completed).count() as u64;

        let durations: Vec<u64> = sessions
            .iter()
            .filter_map(|s| s.duration)
            .filter(|d| *d > 0)
            .collect();
        let average_duration = if durations.is_empty() {
            0.0
        } else {
            durations.iter().map(|d| u128::from(*d)).sum::<u128>() as f64 / durations.len() as f64
        };

        Self {
            total_sessions,
            completed_sessions,
            average_duration,
            completion_rate: completed_sessions as f64 / total_sessions as f64 * 100.0,
        }
    }
}
