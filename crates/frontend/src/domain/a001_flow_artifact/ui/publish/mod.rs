//! Публикация артефакта из переписки: карточка, затем анкета автора

use super::options::{
    parse_scale, scale_select, CATEGORIES, CREATIVITY_OPTIONS, DIFFICULTIES, DURATIONS,
    FLOW_EXPERIENCE_OPTIONS, SATISFACTION_OPTIONS, THUMBNAILS,
};
use crate::shared::api_utils::{api_base, error_message};
use crate::system::auth::storage::get_auth_header;
use contracts::domain::a001_flow_artifact::aggregate::{
    Difficulty, FlowArtifact, PublishArtifactRequest,
};
use contracts::domain::a002_artifact_session::questionnaire::CreationQuestionnaire;
use contracts::shared::message::MessageContent;
use contracts::shared::publish_wizard::{PublishForm, PublishStep, PublishWizard};
use gloo_net::http::Request;
use leptos::logging::log;
use leptos::prelude::*;
use thaw::*;

async fn publish_artifact(request: &PublishArtifactRequest) -> Result<FlowArtifact, String> {
    let auth_header = get_auth_header().ok_or("Войдите, чтобы публиковать эксперименты")?;

    let response = Request::post(&format!("{}/api/artifacts/publish", api_base()))
        .header("Authorization", &auth_header)
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send: {}", e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    if status != 201 {
        return Err(error_message(status, &text));
    }

    serde_json::from_str::<FlowArtifact>(&text)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Значения полей анкеты автора в виде строк из формы
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreationAnswers {
    pub flow_experience: String,
    pub creativity_level: String,
    pub satisfaction: String,
    pub challenges: String,
    pub additional_notes: String,
}

impl CreationAnswers {
    pub fn to_questionnaire(&self) -> CreationQuestionnaire {
        CreationQuestionnaire {
            flow_experience: parse_scale(&self.flow_experience),
            creativity_level: parse_scale(&self.creativity_level),
            satisfaction: parse_scale(&self.satisfaction),
            challenges: self.challenges.trim().to_string(),
            additional_notes: self.additional_notes.trim().to_string(),
        }
    }
}

#[derive(Clone, Copy)]
struct PublishFormVm {
    title: RwSignal<String>,
    description: RwSignal<String>,
    instructions: RwSignal<String>,
    category: RwSignal<String>,
    difficulty: RwSignal<String>,
    duration: RwSignal<String>,
    thumbnail: RwSignal<String>,

    flow_experience: RwSignal<String>,
    creativity_level: RwSignal<String>,
    satisfaction: RwSignal<String>,
    challenges: RwSignal<String>,
    additional_notes: RwSignal<String>,
}

impl PublishFormVm {
    fn from_form(form: &PublishForm) -> Self {
        Self {
            title: RwSignal::new(form.title.clone()),
            description: RwSignal::new(form.description.clone()),
            instructions: RwSignal::new(form.instructions.clone()),
            category: RwSignal::new(form.category.clone()),
            difficulty: RwSignal::new(form.difficulty.as_str().to_string()),
            duration: RwSignal::new(form.duration.clone()),
            thumbnail: RwSignal::new(form.thumbnail.clone()),
            flow_experience: RwSignal::new(String::new()),
            creativity_level: RwSignal::new(String::new()),
            satisfaction: RwSignal::new(String::new()),
            challenges: RwSignal::new(String::new()),
            additional_notes: RwSignal::new(String::new()),
        }
    }

    fn to_form(&self) -> PublishForm {
        PublishForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            instructions: self.instructions.get_untracked(),
            category: self.category.get_untracked(),
            difficulty: Difficulty::from_str(&self.difficulty.get_untracked()).unwrap_or_default(),
            duration: self.duration.get_untracked(),
            thumbnail: self.thumbnail.get_untracked(),
        }
    }

    fn answers(&self) -> CreationAnswers {
        CreationAnswers {
            flow_experience: self.flow_experience.get_untracked(),
            creativity_level: self.creativity_level.get_untracked(),
            satisfaction: self.satisfaction.get_untracked(),
            challenges: self.challenges.get_untracked(),
            additional_notes: self.additional_notes.get_untracked(),
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn PublishModal(
    conversation_id: String,
    conversation_title: Option<String>,
    messages: Vec<MessageContent>,
    on_close: Callback<()>,
    on_published: Callback<FlowArtifact>,
) -> impl IntoView {
    let initial = PublishWizard::new(conversation_id, conversation_title.as_deref(), &messages);
    let fields = PublishFormVm::from_form(&initial.form);
    let has_artifact = initial.artifact_code().is_some();
    let wizard = RwSignal::new(initial);
    let error = RwSignal::new(None::<String>);
    let is_publishing = RwSignal::new(false);

    let handle_next = move |_| {
        let result = wizard
            .try_update(|w| {
                w.form = fields.to_form();
                w.next()
            })
            .unwrap_or(Ok(()));
        error.set(result.err());
    };

    let handle_back = move |_| {
        error.set(None);
        wizard.update(|w| w.back());
    };

    let handle_publish = move |_| {
        let request = wizard
            .try_update(|w| {
                w.questionnaire = fields.answers().to_questionnaire();
                w.submit()
            })
            .unwrap_or_else(|| Err("Форма закрыта".to_string()));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        error.set(None);
        is_publishing.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match publish_artifact(&request).await {
                Ok(artifact) => {
                    log!("✅ Artifact published: {}", artifact.title);
                    let _ = is_publishing.try_set(false);
                    on_published.run(artifact);
                }
                Err(e) => {
                    log!("❌ Failed to publish artifact: {}", e);
                    let _ = is_publishing.try_set(false);
                    let _ = error.try_set(Some(e));
                }
            }
        });
    };

    view! {
        <div
            class="modal-overlay"
            style="position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); display: flex; align-items: center; justify-content: center; z-index: 1000;"
        >
            <div
                class="modal"
                style="width: 640px; max-height: 90vh; overflow: auto; padding: 20px; border-radius: 8px; background: var(--colorNeutralBackground1); display: flex; flex-direction: column; gap: 12px;"
            >
                <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                    <h2 style="font-size: 18px; font-weight: bold;">
                        {move || match wizard.with(|w| w.step()) {
                            PublishStep::Configure => "Публикация: карточка эксперимента",
                            PublishStep::Questionnaire => "Публикация: анкета автора",
                        }}
                    </h2>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                        "✕"
                    </Button>
                </Flex>

                <Show when=move || !has_artifact>
                    <div style="color: var(--color-error);">"В этой переписке нет артефакта"</div>
                </Show>

                {move || error.get().map(|e| view! {
                    <div style="padding: 12px; background: var(--color-error-50); border: 1px solid var(--color-error-100); border-radius: 8px;">
                        <span style="color: var(--color-error);">{e}</span>
                    </div>
                })}

                {move || match wizard.with(|w| w.step()) {
                    PublishStep::Configure => view! {
                        <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 12px;">
                            <div class="form__group" style="grid-column: 1 / -1;">
                                <label class="form__label">"Название *"</label>
                                <Input value=fields.title placeholder="Название эксперимента" />
                            </div>
                            <div class="form__group" style="grid-column: 1 / -1;">
                                <label class="form__label">"Описание *"</label>
                                <Textarea value=fields.description placeholder="Что ждёт участника" />
                            </div>
                            <div class="form__group" style="grid-column: 1 / -1;">
                                <label class="form__label">"Инструкции *"</label>
                                <Textarea value=fields.instructions placeholder="Как проходить эксперимент" />
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Категория"</label>
                                <Select value=fields.category>
                                    {CATEGORIES.iter().map(|c| view! { <option value={*c}>{*c}</option> }).collect_view()}
                                </Select>
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Сложность"</label>
                                <Select value=fields.difficulty>
                                    {DIFFICULTIES
                                        .iter()
                                        .map(|d| view! { <option value={d.as_str()}>{d.as_str()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Длительность"</label>
                                <Select value=fields.duration>
                                    {DURATIONS.iter().map(|d| view! { <option value={*d}>{*d}</option> }).collect_view()}
                                </Select>
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Обложка"</label>
                                <Select value=fields.thumbnail>
                                    {THUMBNAILS
                                        .iter()
                                        .map(|(icon, label)| view! { <option value={*icon}>{format!("{} {}", icon, label)}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                        </div>
                        <Flex justify=FlexJustify::End style="gap: 8px;">
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                                "Отмена"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=!has_artifact
                                on_click=handle_next
                            >
                                "Далее"
                            </Button>
                        </Flex>
                    }.into_any(),
                    PublishStep::Questionnaire => view! {
                        <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 12px;">
                            {scale_select("Насколько вы были в потоке?", fields.flow_experience, &FLOW_EXPERIENCE_OPTIONS)}
                            {scale_select("Насколько творческим был процесс?", fields.creativity_level, &CREATIVITY_OPTIONS)}
                            {scale_select("Довольны ли вы результатом?", fields.satisfaction, &SATISFACTION_OPTIONS)}
                            <div class="form__group" style="grid-column: 1 / -1;">
                                <label class="form__label">"Сложности при создании"</label>
                                <Textarea value=fields.challenges placeholder="Опционально" />
                            </div>
                            <div class="form__group" style="grid-column: 1 / -1;">
                                <label class="form__label">"Заметки"</label>
                                <Textarea value=fields.additional_notes placeholder="Опционально" />
                            </div>
                        </div>
                        <Flex justify=FlexJustify::End style="gap: 8px;">
                            <Button appearance=ButtonAppearance::Secondary on_click=handle_back>
                                "Назад"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=Signal::derive(move || is_publishing.get())
                                on_click=handle_publish
                            >
                                {move || if is_publishing.get() { "Публикация..." } else { "Опубликовать" }}
                            </Button>
                        </Flex>
                    }.into_any(),
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_artifact_session::questionnaire::{
        CreativityLevel, FlowExperience, Satisfaction,
    };

    #[test]
    fn test_answers_complete_the_wizard() {
        let messages = vec![MessageContent::from(
            "Here it is\n:::artifact{type=\"text/html\" title=\"Breath\"}\n<p>in, out</p>\n:::",
        )];
        let mut wizard = PublishWizard::new("conv-1", Some(" Breathing lab "), &messages);
        assert_eq!(wizard.form.title, "Breathing lab");

        wizard.form.description = "Slow breathing".into();
        wizard.form.instructions = "Follow the circle".into();
        wizard.next().unwrap();

        let mut answers = CreationAnswers {
            flow_experience: "very-much".into(),
            creativity_level: "highly-creative".into(),
            satisfaction: String::new(),
            challenges: "  timing  ".into(),
            additional_notes: String::new(),
        };
        wizard.questionnaire = answers.to_questionnaire();
        assert!(wizard.submit().is_err());

        answers.satisfaction = "satisfied".into();
        let questionnaire = answers.to_questionnaire();
        assert_eq!(questionnaire.flow_experience, Some(FlowExperience::VeryMuch));
        assert_eq!(questionnaire.creativity_level, Some(CreativityLevel::HighlyCreative));
        assert_eq!(questionnaire.satisfaction, Some(Satisfaction::Satisfied));
        assert_eq!(questionnaire.challenges, "timing");

        wizard.questionnaire = questionnaire;
        let request = wizard.submit().unwrap();
        assert_eq!(request.title, "Breathing lab");
        assert_eq!(request.conversation_id, "conv-1");
        assert!(request
            .artifact_code
            .as_deref()
            .is_some_and(|code| code.starts_with(":::artifact")));
    }
}
