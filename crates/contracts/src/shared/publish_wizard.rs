//! Двухшаговая публикация артефакта из чата: карточка, затем анкета автора

use crate::domain::a001_flow_artifact::aggregate::{
    Difficulty, PublishArtifactRequest, DEFAULT_CATEGORY, DEFAULT_DURATION, DEFAULT_THUMBNAIL,
};
use crate::domain::a002_artifact_session::questionnaire::CreationQuestionnaire;
use crate::shared::message::{find_latest_artifact_block, MessageContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Configure,
    Questionnaire,
}

/// Поля карточки артефакта
#[derive(Debug, Clone, PartialEq)]
pub struct PublishForm {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub thumbnail: String,
}

impl Default for PublishForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            instructions: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            difficulty: Difficulty::default(),
            duration: DEFAULT_DURATION.to_string(),
            thumbnail: DEFAULT_THUMBNAIL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PublishWizard {
    step: PublishStep,
    conversation_id: String,
    artifact_code: Option<String>,
    pub form: PublishForm,
    pub questionnaire: CreationQuestionnaire,
}

impl PublishWizard {
    /// Мастер для переписки; код берётся из последнего блока артефакта,
    /// название карточки из заголовка переписки
    pub fn new(
        conversation_id: impl Into<String>,
        conversation_title: Option<&str>,
        messages: &[MessageContent],
    ) -> Self {
        let form = PublishForm {
            title: conversation_title.unwrap_or_default().trim().to_string(),
            ..PublishForm::default()
        };
        Self {
            step: PublishStep::Configure,
            conversation_id: conversation_id.into(),
            artifact_code: find_latest_artifact_block(messages),
            form,
            questionnaire: CreationQuestionnaire::default(),
        }
    }

    pub fn step(&self) -> PublishStep {
        self.step
    }

    pub fn artifact_code(&self) -> Option<&str> {
        self.artifact_code.as_deref()
    }

    /// Переход к анкете
    pub fn next(&mut self) -> Result<(), String> {
        if self.artifact_code.is_none() {
            return Err("No artifact found in this conversation".into());
        }
        for (name, value) in [
            ("Title", &self.form.title),
            ("Description", &self.form.description),
            ("Instructions", &self.form.instructions),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} is required", name));
            }
        }
        self.step = PublishStep::Questionnaire;
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = PublishStep::Configure;
    }

    /// Тело запроса публикации
    pub fn submit(&self) -> Result<PublishArtifactRequest, String> {
        if self.step != PublishStep::Questionnaire {
            return Err("Complete the artifact details first".into());
        }
        if !self.questionnaire.is_complete() {
            return Err("Please answer all rating questions".into());
        }
        let form = &self.form;
        Ok(PublishArtifactRequest {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            instructions: form.instructions.trim().to_string(),
            conversation_id: self.conversation_id.clone(),
            category: form.category.clone(),
            difficulty: Some(form.difficulty),
            duration: Some(form.duration.clone()),
            thumbnail: Some(form.thumbnail.clone()),
            artifact_code: self.artifact_code.clone(),
            artifact_type: None,
            messages: Vec::new(),
        })
    }
}
