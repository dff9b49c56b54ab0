//! Мастерская: переписка с Flow Architect и публикация результата.
//!
//! Ответы агента вставляются вручную и проигрываются как поток, чтобы
//! проверить разбор вариантов и блока артефакта до публикации.

mod flow_message;

pub use flow_message::{message_parts, FlowMessage, MessageParts};

use crate::domain::a001_flow_artifact::ui::PublishModal;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::api_utils::{api_base, error_message};
use crate::system::auth::storage::get_auth_header;
use chrono::Utc;
use contracts::domain::a001_flow_artifact::aggregate::FlowArtifact;
use contracts::domain::a003_flow_agent::aggregate::FlowAgent;
use contracts::domain::common::AggregateRoot;
use contracts::shared::message::MessageContent;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use leptos::logging::log;
use leptos::prelude::*;
use thaw::*;

/// Символов за один шаг проигрывания ответа
const STREAM_CHUNK_CHARS: usize = 12;
const STREAM_STEP_MS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

/// Переписка в виде сообщений для поиска артефакта
pub fn conversation_messages(entries: &[ChatEntry]) -> Vec<MessageContent> {
    entries
        .iter()
        .map(|e| MessageContent::from(e.text.as_str()))
        .collect()
}

/// Первые `chars` символов строки (по границам символов)
pub fn reveal_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

async fn fetch_flow_agent() -> Result<FlowAgent, String> {
    let auth_header = get_auth_header().ok_or("Not authenticated")?;

    let response = Request::get(&format!("{}/api/agents/flow-experiment", api_base()))
        .header("Authorization", &auth_header)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch: {}", e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    if status != 200 {
        return Err(error_message(status, &text));
    }

    serde_json::from_str::<FlowAgent>(&text).map_err(|e| format!("Failed to parse response: {}", e))
}

#[component]
#[allow(non_snake_case)]
pub fn FlowWorkshop() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let agent = RwSignal::new(None::<FlowAgent>);
    let agent_error = RwSignal::new(None::<String>);
    let entries = RwSignal::new(Vec::<ChatEntry>::new());
    // Индекс ответа, который сейчас проигрывается
    let streaming = RwSignal::new(None::<usize>);
    let draft = RwSignal::new(String::new());
    let title = RwSignal::new(String::new());
    let show_publish = RwSignal::new(false);
    let conversation_id = StoredValue::new(format!("workshop-{}", Utc::now().timestamp_millis()));

    Effect::new(move |_| {
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_flow_agent().await {
                Ok(a) => {
                    log!("✅ Flow agent loaded: {}", a.name);
                    agent.set(Some(a));
                }
                Err(e) => {
                    log!("❌ Failed to load flow agent: {}", e);
                    agent_error.set(Some(e));
                }
            }
        });
    });

    let push_user_reply = Callback::new(move |reply: String| {
        entries.update(|list| {
            list.push(ChatEntry {
                role: ChatRole::User,
                text: reply,
            })
        });
    });

    let handle_add_agent_reply = move |_| {
        let full = draft.get_untracked();
        if full.trim().is_empty() || streaming.get_untracked().is_some() {
            return;
        }
        draft.set(String::new());
        let index = entries.with_untracked(|list| list.len());
        entries.update(|list| {
            list.push(ChatEntry {
                role: ChatRole::Agent,
                text: String::new(),
            })
        });
        streaming.set(Some(index));

        wasm_bindgen_futures::spawn_local(async move {
            let total = full.chars().count();
            let mut shown = 0;
            while shown < total {
                shown = (shown + STREAM_CHUNK_CHARS).min(total);
                let partial = reveal_prefix(&full, shown).to_string();
                let alive = entries
                    .try_update(|list| {
                        if let Some(entry) = list.get_mut(index) {
                            entry.text = partial;
                        }
                    })
                    .is_some();
                if !alive {
                    return;
                }
                TimeoutFuture::new(STREAM_STEP_MS).await;
            }
            let _ = streaming.try_set(None);
        });
    };

    let entry_count = Memo::new(move |_| entries.with(|list| list.len()));
    let last_agent_index = Memo::new(move |_| {
        entries.with(|list| list.iter().rposition(|e| e.role == ChatRole::Agent))
    });

    view! {
        <div id="a003_flow_agent--workshop" style="display: flex; flex-direction: column; gap: 16px; max-width: 900px; margin: 0 auto;">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <div>
                    <h2 style="font-size: 18px; font-weight: bold;">
                        {move || agent.get().map(|a| a.name).unwrap_or_else(|| "Flow Architect".to_string())}
                    </h2>
                    <div style="font-size: 12px; color: var(--colorNeutralForeground3);">
                        {move || match (agent.get(), agent_error.get()) {
                            (Some(a), _) => format!(
                                "{} • с {}",
                                a.description,
                                a.metadata().created_at.format("%d.%m.%Y")
                            ),
                            (None, Some(e)) => format!("Агент недоступен: {}", e),
                            (None, None) => "Загрузка агента...".to_string(),
                        }}
                    </div>
                </div>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || entries.with(|l| l.is_empty()) || streaming.get().is_some())
                    on_click=move |_| show_publish.set(true)
                >
                    "Опубликовать"
                </Button>
            </Flex>

            <div class="form__group">
                <label class="form__label">"Название переписки"</label>
                <Input value=title placeholder="Станет названием эксперимента" />
            </div>

            <div style="display: flex; flex-direction: column; gap: 8px;">
                {move || {
                    (0..entry_count.get())
                        .map(|index| {
                            let role = entries.with_untracked(|list| list.get(index).map(|e| e.role));
                            match role {
                                Some(ChatRole::Agent) => {
                                    let text = Signal::derive(move || {
                                        entries.with(|list| {
                                            list.get(index).map(|e| e.text.clone()).unwrap_or_default()
                                        })
                                    });
                                    view! {
                                        <FlowMessage
                                            text=text
                                            is_streaming=Signal::derive(move || streaming.get() == Some(index))
                                            is_latest=Signal::derive(move || last_agent_index.get() == Some(index))
                                            on_reply=push_user_reply
                                        />
                                    }
                                    .into_any()
                                }
                                _ => {
                                    let text = entries.with_untracked(|list| {
                                        list.get(index).map(|e| e.text.clone()).unwrap_or_default()
                                    });
                                    view! {
                                        <div style="align-self: flex-end; padding: 8px 12px; border-radius: 8px; background: var(--colorBrandBackground2);">
                                            {text}
                                        </div>
                                    }
                                    .into_any()
                                }
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="form__group">
                <label class="form__label">"Ответ агента"</label>
                <Textarea value=draft placeholder="Вставьте ответ Flow Architect" />
            </div>
            <div>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || streaming.get().is_some())
                    on_click=handle_add_agent_reply
                >
                    "Добавить ответ"
                </Button>
            </div>

            <Show when=move || show_publish.get()>
                {
                    let messages = entries.with_untracked(|list| conversation_messages(list));
                    let conversation_title = Some(title.get_untracked()).filter(|t| !t.trim().is_empty());
                    view! {
                        <PublishModal
                            conversation_id=conversation_id.get_value()
                            conversation_title=conversation_title
                            messages=messages
                            on_close=Callback::new(move |_| show_publish.set(false))
                            on_published=Callback::new(move |artifact: FlowArtifact| {
                                show_publish.set(false);
                                ctx.open_artifact(&artifact.id_string());
                            })
                        />
                    }
                }
            </Show>
        </div>
    }
}
