use contracts::shared::message::{
    find_artifact_block, parse_message, visible_text_while_streaming, MessageContent,
    OptionSelection, ParsedArtifact,
};
use leptos::prelude::*;
use thaw::*;

/// Что показать для сообщения агента
#[derive(Debug, Clone, PartialEq)]
pub struct MessageParts {
    pub text: String,
    pub options: Vec<String>,
    pub artifact: Option<ParsedArtifact>,
}

/// Во время стриминга варианты и блок артефакта ещё не разбираются
pub fn message_parts(text: &str, is_streaming: bool) -> MessageParts {
    if is_streaming {
        return MessageParts {
            text: visible_text_while_streaming(text).to_string(),
            options: Vec::new(),
            artifact: None,
        };
    }
    let parsed = parse_message(&MessageContent::from(text));
    let prose = match find_artifact_block(&parsed.message) {
        Some(block) => parsed.message.replacen(block, "", 1).trim().to_string(),
        None => parsed.message.clone(),
    };
    MessageParts {
        text: prose,
        options: parsed.options,
        artifact: parsed.artifact,
    }
}

#[component]
#[allow(non_snake_case)]
pub fn ArtifactChip(artifact: ParsedArtifact) -> impl IntoView {
    let title = artifact
        .title
        .clone()
        .unwrap_or_else(|| "Артефакт без названия".to_string());
    let artifact_type = artifact
        .artifact_type
        .clone()
        .unwrap_or_else(|| "тип не указан".to_string());
    let lines = artifact.content.lines().count();

    view! {
        <div style="margin-top: 12px; padding: 12px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px; background: var(--colorNeutralBackground2);">
            <strong>{title}</strong>
            <div style="margin-top: 4px; font-size: 11px; color: var(--colorNeutralForeground3);">
                {format!("{} • {} строк", artifact_type, lines)}
            </div>
        </div>
    }
}

/// Сообщение Flow Architect с кнопками выбора вариантов
#[component]
#[allow(non_snake_case)]
pub fn FlowMessage(
    text: Signal<String>,
    is_streaming: Signal<bool>,
    /// Варианты активны только у последнего ответа
    is_latest: Signal<bool>,
    on_reply: Callback<String>,
) -> impl IntoView {
    let parts = Memo::new(move |_| message_parts(&text.get(), is_streaming.get()));
    let selection = RwSignal::new(OptionSelection::default());

    // Новый набор вариантов сбрасывает выбор
    Effect::new(move |_| {
        let options = parts.with(|p| p.options.clone());
        selection.set(OptionSelection::new(options));
    });

    let handle_send = move |_| {
        let Some(reply) = selection.with_untracked(|s| s.reply_text()) else {
            return;
        };
        selection.update(|s| s.clear());
        on_reply.run(reply);
    };

    view! {
        <div style="padding: 12px; border-radius: 8px; background: var(--colorNeutralBackground1); border: 1px solid var(--colorNeutralStroke2);">
            <div style="white-space: pre-wrap; font-size: 14px;">{move || parts.with(|p| p.text.clone())}</div>

            {move || parts.with(|p| p.artifact.clone()).map(|artifact| view! { <ArtifactChip artifact=artifact /> })}

            <Show when=move || is_latest.get() && selection.with(|s| s.is_visible())>
                <div style="margin-top: 12px; display: flex; flex-wrap: wrap; gap: 8px;">
                    {move || {
                        selection
                            .with(|s| s.options().to_vec())
                            .into_iter()
                            .map(|option| {
                                let label = option.clone();
                                let checked = option.clone();
                                view! {
                                    <Button
                                        size=ButtonSize::Small
                                        appearance=Signal::derive(move || {
                                            if selection.with(|s| s.is_selected(&checked)) {
                                                ButtonAppearance::Primary
                                            } else {
                                                ButtonAppearance::Secondary
                                            }
                                        })
                                        on_click=move |_| {
                                            selection.update(|s| {
                                                s.toggle(&option);
                                            });
                                        }
                                    >
                                        {label}
                                    </Button>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <div style="margin-top: 8px;">
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || selection.with(|s| s.selected().is_empty()))
                        on_click=handle_send
                    >
                        "Отправить выбор"
                    </Button>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_hides_options_payload() {
        let partial = "Pick a mood:\n====\n{\"options\": [\"Cal";
        let parts = message_parts(partial, true);
        assert_eq!(parts.text, "Pick a mood:");
        assert!(parts.options.is_empty());

        let done = "Pick a mood:\n====\n{\"options\": [\"Calm\", \"Bold\"]}";
        let parts = message_parts(done, false);
        assert_eq!(parts.text, "Pick a mood:");
        assert_eq!(parts.options, vec!["Calm", "Bold"]);
    }

    #[test]
    fn test_artifact_block_moves_out_of_text() {
        let text = "Your experiment is ready.\n:::artifact{type=\"text/html\" title=\"Tide\"}\n<p>wave</p>\n:::\n====\n{\"options\": [\"Play\"]}";
        let parts = message_parts(text, false);
        assert_eq!(parts.text, "Your experiment is ready.");
        assert_eq!(parts.options, vec!["Play"]);
        let artifact = parts.artifact.unwrap();
        assert_eq!(artifact.title.as_deref(), Some("Tide"));
        assert_eq!(artifact.content, "<p>wave</p>");
    }
}
