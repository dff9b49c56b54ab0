//! Анкеты: после прохождения эксперимента и при публикации.
//! Значения шкал сериализуются в kebab-case.

use serde::{Deserialize, Serialize};

/// Насколько пользователь был "в потоке"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowExperience {
    NotAtAll,
    ALittle,
    Moderately,
    VeryMuch,
    Completely,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreativityLevel {
    NotCreative,
    SlightlyCreative,
    ModeratelyCreative,
    VeryCreative,
    HighlyCreative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Satisfaction {
    VeryDissatisfied,
    Dissatisfied,
    Neutral,
    Satisfied,
    VerySatisfied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WouldRecommend {
    DefinitelyNot,
    ProbablyNot,
    Maybe,
    ProbablyYes,
    DefinitelyYes,
}

/// Анкета после прохождения, сохраняется в `questionnaireResponses` сессии
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostExperimentQuestionnaire {
    pub flow_experience: Option<FlowExperience>,
    pub creativity_level: Option<CreativityLevel>,
    pub satisfaction: Option<Satisfaction>,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub insights: String,
    pub would_recommend: Option<WouldRecommend>,
}

impl PostExperimentQuestionnaire {
    /// Все шкалы заполнены
    pub fn is_complete(&self) -> bool {
        self.flow_experience.is_some()
            && self.creativity_level.is_some()
            && self.satisfaction.is_some()
            && self.would_recommend.is_some()
    }

    pub fn to_responses(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Анкета автора на втором шаге публикации
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationQuestionnaire {
    pub flow_experience: Option<FlowExperience>,
    pub creativity_level: Option<CreativityLevel>,
    pub satisfaction: Option<Satisfaction>,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub additional_notes: String,
}

impl CreationQuestionnaire {
    pub fn is_complete(&self) -> bool {
        self.flow_experience.is_some()
            && self.creativity_level.is_some()
            && self.satisfaction.is_some()
    }
}
