use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::shared::message::{parse_artifact, MessageContent, ParsedArtifact};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_DURATION: &str = "10-15 min";
pub const DEFAULT_THUMBNAIL: &str = "🎯";
/// Значение фильтра категории, означающее "без фильтра"
pub const ALL_CATEGORIES: &str = "All";

/// ID типа для агрегата Flow Artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowArtifactId(pub Uuid);

impl FlowArtifactId {
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

impl AggregateId for FlowArtifactId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(FlowArtifactId::new)
            .map_err(|e| format!("Invalid artifact id: {}", e))
    }
}

/// Сложность эксперимента
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "Beginner" => Ok(Difficulty::Beginner),
            "Intermediate" => Ok(Difficulty::Intermediate),
            "Advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// Агрегат Flow Artifact: опубликованный эксперимент из чата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowArtifact {
    pub artifact_id: FlowArtifactId,

    // Карточка в галерее
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub thumbnail: String,

    // Происхождение
    /// Полный блок `:::artifact ... :::` из переписки
    pub artifact_code: String,
    pub conversation_id: String,
    pub author: String,

    // Статистика
    pub likes: i64,
    pub plays: i64,
    pub is_published: bool,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl FlowArtifact {
    /// Создать новый артефакт для вставки в БД
    pub fn new_for_insert(draft: ArtifactDraft, author: String) -> Self {
        Self {
            artifact_id: FlowArtifactId::new_v4(),
            title: draft.title,
            description: draft.description,
            instructions: draft.instructions,
            category: draft.category,
            difficulty: draft.difficulty,
            duration: draft.duration,
            thumbnail: draft.thumbnail,
            artifact_code: draft.artifact_code,
            conversation_id: draft.conversation_id,
            author,
            likes: 0,
            plays: 0,
            is_published: true,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.artifact_id.as_string()
    }

    /// Разобранный блок артефакта
    pub fn parsed(&self) -> Option<ParsedArtifact> {
        parse_artifact(&self.artifact_code)
    }

    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("instructions", &self.instructions),
            ("artifactCode", &self.artifact_code),
            ("conversationId", &self.conversation_id),
            ("author", &self.author),
            ("category", &self.category),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", name));
            }
        }
        if self.likes < 0 || self.plays < 0 {
            return Err("Counters cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

impl AggregateRoot for FlowArtifact {
    type Id = FlowArtifactId;

    fn id(&self) -> Self::Id {
        self.artifact_id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "flow_artifact"
    }
}

/// Проверенные данные для публикации (автор берётся из токена)
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDraft {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub artifact_code: String,
    pub conversation_id: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub thumbnail: String,
}

/// Тело запроса POST /publish
///
/// Код берётся из `artifactCode`, а если его нет, то из последнего блока в `messages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishArtifactRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub artifact_code: Option<String>,
    /// Явный тип, если блок его не содержит
    #[serde(default)]
    pub artifact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageContent>,
}

/// Сортировка списка артефактов (всегда по убыванию)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactSort {
    #[default]
    CreatedAt,
    Likes,
    Plays,
}

impl ArtifactSort {
    /// Неизвестное значение означает сортировку по дате
    pub fn from_param(s: Option<&str>) -> Self {
        match s {
            Some("likes") => ArtifactSort::Likes,
            Some("plays") => ArtifactSort::Plays,
            _ => ArtifactSort::CreatedAt,
        }
    }
}

/// Приращения счётчиков
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsIncrement {
    pub plays: u32,
    pub likes: u32,
}

impl StatsIncrement {
    pub fn play() -> Self {
        Self { plays: 1, likes: 0 }
    }

    pub fn like() -> Self {
        Self { plays: 0, likes: 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.plays == 0 && self.likes == 0
    }
}
