//! Flow Artifact Viewer - View Component

use super::model::{fetch_artifact, fetch_preview, record_stat, start_session, update_session};
use super::view_model::{sandbox_srcdoc, ArtifactViewerVm};
use crate::domain::a001_flow_artifact::ui::options::{
    scale_select, CREATIVITY_OPTIONS, FLOW_EXPERIENCE_OPTIONS, RECOMMEND_OPTIONS,
    SATISFACTION_OPTIONS,
};
use crate::shared::date_utils::{format_date, format_timer};
use chrono::Utc;
use contracts::domain::a002_artifact_session::aggregate::{
    CreateSessionRequest, UpdateSessionRequest,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::viewer::{ExperimentPhase, SandboxPreview};
use gloo_timers::future::TimeoutFuture;
use leptos::logging::log;
use leptos::prelude::*;
use thaw::*;

fn send_session_patch(vm: ArtifactViewerVm, patch: Option<UpdateSessionRequest>) {
    let (Some(session_id), Some(patch)) = (vm.session_id.get_untracked(), patch) else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        match update_session(&session_id, &patch).await {
            Ok(()) => log!("✅ Session {} updated", session_id),
            Err(e) => {
                log!("❌ Failed to update session: {}", e);
                let _ = vm.error.try_set(Some(e));
            }
        }
    });
}

fn sandbox_view(preview: Option<SandboxPreview>) -> AnyView {
    let Some(preview) = preview else {
        return view! { <div>"Нет данных для песочницы"</div> }.into_any();
    };
    match sandbox_srcdoc(&preview) {
        Some(doc) => view! {
            <iframe
                title="artifact-sandbox"
                sandbox="allow-scripts allow-forms allow-modals"
                srcdoc=doc
                style="width: 100%; height: 640px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px; background: white;"
            ></iframe>
        }
        .into_any(),
        None => view! {
            <div>
                <div style="margin-bottom: 8px; font-size: 13px; color: var(--colorNeutralForeground3);">
                    {format!("Шаблон {} ({}): исходный код", preview.template.as_str(), preview.file_key)}
                </div>
                <pre style="padding: 12px; background: var(--colorNeutralBackground1); border-radius: 8px; font-size: 12px; white-space: pre-wrap; max-height: 640px; overflow: auto;">
                    {preview.code}
                </pre>
            </div>
        }
        .into_any(),
    }
}

#[component]
#[allow(non_snake_case)]
pub fn ArtifactViewer(id: String, on_close: Callback<()>) -> impl IntoView {
    let vm = ArtifactViewerVm::new();
    let artifact_id = StoredValue::new(id);

    // Load artifact and preview
    Effect::new(move |_| {
        let id = artifact_id.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            let loaded = match fetch_artifact(&id).await {
                Ok(artifact) => fetch_preview(&id).await.map(|preview| (artifact, preview)),
                Err(e) => Err(e),
            };
            match loaded {
                Ok((artifact, preview)) => {
                    log!("✅ Artifact loaded: {}", artifact.title);
                    vm.artifact.set(Some(artifact));
                    vm.preview.set(Some(preview));
                    vm.run.update(|r| r.loaded());
                }
                Err(e) => {
                    log!("❌ Failed to load artifact: {}", e);
                    vm.run.update(|r| r.failed(e.clone()));
                    vm.error.set(Some(e));
                }
            }
        });
    });

    // Секундомер живёт, пока идёт прохождение
    let run_ticker = move || {
        wasm_bindgen_futures::spawn_local(async move {
            while vm
                .run
                .try_with_untracked(|r| r.phase() == ExperimentPhase::Running)
                .unwrap_or(false)
            {
                let _ = vm.now.try_set(Utc::now());
                TimeoutFuture::new(1_000).await;
            }
        });
    };

    let handle_start = move |_| {
        let now = Utc::now();
        if !vm.run.try_update(|r| r.start(now)).unwrap_or(false) {
            return;
        }
        vm.now.set(now);
        vm.error.set(None);
        vm.reset_questionnaire();
        run_ticker();

        let id = artifact_id.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match record_stat(&id, "play").await {
                Ok(()) => {
                    let _ = vm.artifact.try_update(|a| {
                        if let Some(a) = a {
                            a.plays += 1;
                        }
                    });
                }
                Err(e) => log!("❌ Failed to record play: {}", e),
            }
            let request = CreateSessionRequest {
                start_time: Some(now),
            };
            match start_session(&id, &request).await {
                Ok(session_id) => {
                    let _ = vm.session_id.try_set(session_id);
                }
                Err(e) => log!("❌ Failed to start session: {}", e),
            }
        });
    };

    let handle_finish = move |_| {
        let Some(duration) = vm.run.try_update(|r| r.finish(Utc::now())).flatten() else {
            return;
        };
        log!("⏱ Experiment finished in {} s", duration);
        let patch = vm.run.with_untracked(|r| r.session_update(None));
        send_session_patch(vm, patch);
    };

    let handle_submit = move |_| {
        let questionnaire = vm.questionnaire();
        if !questionnaire.is_complete() {
            vm.error
                .set(Some("Ответьте на все вопросы со шкалами".to_string()));
            return;
        }
        vm.error.set(None);
        let patch = vm
            .run
            .with_untracked(|r| r.session_update(Some(questionnaire.to_responses())));
        send_session_patch(vm, patch);
        vm.questionnaire_sent.set(true);
    };

    let handle_restart = move |_| {
        vm.run.update(|r| r.reset());
        vm.session_id.set(None);
    };

    let handle_like = move |_| {
        if vm.liked.get_untracked() {
            return;
        }
        vm.liked.set(true);
        let id = artifact_id.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match record_stat(&id, "like").await {
                Ok(()) => {
                    let _ = vm.artifact.try_update(|a| {
                        if let Some(a) = a {
                            a.likes += 1;
                        }
                    });
                }
                Err(e) => {
                    log!("❌ Failed to record like: {}", e);
                    let _ = vm.liked.try_set(false);
                }
            }
        });
    };

    view! {
        <div id="a001_flow_artifact--viewer" style="display: flex; flex-direction: column; gap: 16px; max-width: 1100px; margin: 0 auto;">
            // Header
            <Flex
                justify=FlexJustify::SpaceBetween
                align=FlexAlign::Center
                style="padding-bottom: 12px; border-bottom: 1px solid var(--colorNeutralStroke2);"
            >
                <Flex align=FlexAlign::Center style="gap: 12px;">
                    <span style="font-size: 28px;">
                        {move || vm.artifact.get().map(|a| a.thumbnail).unwrap_or_default()}
                    </span>
                    <h2 style="font-size: 18px; font-weight: bold;">
                        {move || {
                            vm.artifact
                                .get()
                                .map(|a| a.title)
                                .unwrap_or_else(|| "Загрузка...".to_string())
                        }}
                    </h2>
                </Flex>
                <Space>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || vm.liked.get() || vm.artifact.get().is_none())
                        on_click=handle_like
                    >
                        {move || format!("♥ {}", vm.artifact.get().map(|a| a.likes).unwrap_or(0))}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        "Закрыть"
                    </Button>
                </Space>
            </Flex>

            // Error display
            {move || vm.error.get().map(|e| view! {
                <div style="padding: 12px; background: var(--color-error-50); border: 1px solid var(--color-error-100); border-radius: 8px;">
                    <span style="color: var(--color-error);">{e}</span>
                </div>
            })}

            {move || match vm.run.with(|r| r.phase()) {
                ExperimentPhase::Loading => view! {
                    <div style="padding: 40px; text-align: center;">"Загрузка эксперимента..."</div>
                }.into_any(),
                ExperimentPhase::Error => view! {
                    <div style="padding: 40px; text-align: center; color: var(--color-error);">
                        "Эксперимент недоступен"
                    </div>
                }.into_any(),
                ExperimentPhase::Instructions => {
                    let details = vm.artifact.get_untracked().map(|a| {
                        let meta = format!(
                            "{} • {} • {} • ▶ {} • {}",
                            a.category,
                            a.difficulty.as_str(),
                            a.duration,
                            a.plays,
                            format_date(&a.metadata().created_at),
                        );
                        view! {
                            <p style="font-size: 14px;">{a.description}</p>
                            <h3 style="margin-top: 16px; font-size: 15px; font-weight: 600;">"Инструкции"</h3>
                            <p style="white-space: pre-wrap; font-size: 14px;">{a.instructions}</p>
                            <div style="margin-top: 12px; font-size: 12px; color: var(--colorNeutralForeground3);">{meta}</div>
                        }
                    });
                    view! {
                        <div style="padding: 20px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px; background: var(--colorNeutralBackground1);">
                            {details}
                            <div style="margin-top: 20px;">
                                <Button appearance=ButtonAppearance::Primary on_click=handle_start>
                                    "▶ Начать эксперимент"
                                </Button>
                            </div>
                        </div>
                    }.into_any()
                }
                ExperimentPhase::Running => {
                    let preview = vm.preview.get_untracked();
                    view! {
                        <div style="display: flex; flex-direction: column; gap: 12px;">
                            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                                <span style="font-family: monospace; font-size: 20px;">
                                    {move || format_timer(vm.run.with(|r| r.elapsed_secs(vm.now.get())))}
                                </span>
                                <Button appearance=ButtonAppearance::Primary on_click=handle_finish>
                                    "■ Завершить"
                                </Button>
                            </Flex>
                            {sandbox_view(preview)}
                        </div>
                    }.into_any()
                }
                ExperimentPhase::Completed => {
                    let duration = vm.run.with_untracked(|r| r.duration_secs().unwrap_or(0));
                    view! {
                        <div style="padding: 20px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px; background: var(--colorNeutralBackground1); display: flex; flex-direction: column; gap: 12px;">
                            <h3 style="font-size: 16px; font-weight: 600;">"Эксперимент завершён"</h3>
                            <div>{format!("Длительность: {}", format_timer(duration))}</div>
                            <Show
                                when=move || !vm.questionnaire_sent.get()
                                fallback=|| view! { <div>"Спасибо за ответы!"</div> }
                            >
                                <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 12px;">
                                    {scale_select("Насколько вы были в потоке?", vm.flow_experience, &FLOW_EXPERIENCE_OPTIONS)}
                                    {scale_select("Насколько творческим был процесс?", vm.creativity_level, &CREATIVITY_OPTIONS)}
                                    {scale_select("Довольны ли вы результатом?", vm.satisfaction, &SATISFACTION_OPTIONS)}
                                    {scale_select("Порекомендуете ли вы эксперимент?", vm.would_recommend, &RECOMMEND_OPTIONS)}
                                    <div class="form__group" style="grid-column: 1 / -1;">
                                        <label class="form__label">"Что мешало?"</label>
                                        <Textarea value=vm.challenges placeholder="Опционально" />
                                    </div>
                                    <div class="form__group" style="grid-column: 1 / -1;">
                                        <label class="form__label">"Что нового вы заметили?"</label>
                                        <Textarea value=vm.insights placeholder="Опционально" />
                                    </div>
                                </div>
                                {move || vm.session_id.get().is_none().then(|| view! {
                                    <div style="font-size: 12px; color: var(--colorNeutralForeground3);">
                                        "Без входа в систему ответы не сохраняются"
                                    </div>
                                })}
                                <Space>
                                    <Button appearance=ButtonAppearance::Primary on_click=handle_submit>
                                        "Отправить ответы"
                                    </Button>
                                    <Button
                                        appearance=ButtonAppearance::Secondary
                                        on_click=move |_| vm.questionnaire_sent.set(true)
                                    >
                                        "Пропустить"
                                    </Button>
                                </Space>
                            </Show>
                            <div>
                                <Button appearance=ButtonAppearance::Secondary on_click=handle_restart>
                                    "↻ Пройти ещё раз"
                                </Button>
                            </div>
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
