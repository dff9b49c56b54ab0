use chrono::{DateTime, Utc};
use contracts::domain::a001_flow_artifact::aggregate::FlowArtifact;
use contracts::domain::a002_artifact_session::questionnaire::PostExperimentQuestionnaire;
use contracts::shared::viewer::{ExperimentRun, SandboxPreview, SandboxTemplate};
use crate::domain::a001_flow_artifact::ui::options::parse_scale;
use leptos::prelude::*;

/// Документ для `srcdoc` статической песочницы. React-артефакты в iframe не исполняются.
pub fn sandbox_srcdoc(preview: &SandboxPreview) -> Option<String> {
    if preview.template != SandboxTemplate::Static {
        return None;
    }
    let code = preview.code.trim();
    if code.to_ascii_lowercase().contains("<html") {
        Some(code.to_string())
    } else {
        Some(format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            code
        ))
    }
}

#[derive(Clone, Copy)]
pub struct ArtifactViewerVm {
    pub artifact: RwSignal<Option<FlowArtifact>>,
    pub preview: RwSignal<Option<SandboxPreview>>,
    pub run: RwSignal<ExperimentRun>,
    pub now: RwSignal<DateTime<Utc>>,
    pub session_id: RwSignal<Option<String>>,
    pub liked: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    // Анкета после прохождения
    pub flow_experience: RwSignal<String>,
    pub creativity_level: RwSignal<String>,
    pub satisfaction: RwSignal<String>,
    pub challenges: RwSignal<String>,
    pub insights: RwSignal<String>,
    pub would_recommend: RwSignal<String>,
    pub questionnaire_sent: RwSignal<bool>,
}

impl ArtifactViewerVm {
    pub fn new() -> Self {
        Self {
            artifact: RwSignal::new(None),
            preview: RwSignal::new(None),
            run: RwSignal::new(ExperimentRun::new()),
            now: RwSignal::new(Utc::now()),
            session_id: RwSignal::new(None),
            liked: RwSignal::new(false),
            error: RwSignal::new(None),
            flow_experience: RwSignal::new(String::new()),
            creativity_level: RwSignal::new(String::new()),
            satisfaction: RwSignal::new(String::new()),
            challenges: RwSignal::new(String::new()),
            insights: RwSignal::new(String::new()),
            would_recommend: RwSignal::new(String::new()),
            questionnaire_sent: RwSignal::new(false),
        }
    }

    pub fn questionnaire(&self) -> PostExperimentQuestionnaire {
        PostExperimentQuestionnaire {
            flow_experience: parse_scale(&self.flow_experience.get_untracked()),
            creativity_level: parse_scale(&self.creativity_level.get_untracked()),
            satisfaction: parse_scale(&self.satisfaction.get_untracked()),
            challenges: self.challenges.get_untracked().trim().to_string(),
            insights: self.insights.get_untracked().trim().to_string(),
            would_recommend: parse_scale(&self.would_recommend.get_untracked()),
        }
    }

    /// Сбросить анкету перед повторным прохождением
    pub fn reset_questionnaire(&self) {
        for field in [
            self.flow_experience,
            self.creativity_level,
            self.satisfaction,
            self.challenges,
            self.insights,
            self.would_recommend,
        ] {
            field.set(String::new());
        }
        self.questionnaire_sent.set(false);
    }
}

impl Default for ArtifactViewerVm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_srcdoc() {
        let fragment = SandboxPreview::from_artifact_code(
            ":::artifact{type=\"text/html\"}\n<h1>Breathe</h1>\n:::",
        );
        let doc = sandbox_srcdoc(&fragment).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<body><h1>Breathe</h1></body>"));

        let full = SandboxPreview::from_artifact_code("<html><body>Hi</body></html>");
        assert_eq!(sandbox_srcdoc(&full).unwrap(), "<html><body>Hi</body></html>");

        let react = SandboxPreview::from_artifact_code(
            ":::artifact{type=\"application/vnd.react\"}\nexport default function App() { return null; }\n:::",
        );
        assert_eq!(sandbox_srcdoc(&react), None);
    }
}
