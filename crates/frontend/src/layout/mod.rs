pub mod global_context;

use crate::domain::a001_flow_artifact::ui::{ArtifactGallery, ArtifactViewer};
use crate::domain::a003_flow_agent::ui::FlowWorkshop;
use global_context::{AppGlobalContext, Page};
use leptos::prelude::*;
use thaw::*;

/// Каркас: шапка с переключением страниц и текущая страница
#[component]
pub fn Shell() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let nav_button = move |page: Page| {
        let label = page.title();
        let target = page.clone();
        view! {
            <Button
                appearance=Signal::derive(move || {
                    if ctx.page.get() == target {
                        ButtonAppearance::Primary
                    } else {
                        ButtonAppearance::Subtle
                    }
                })
                on_click=move |_| ctx.page.set(page.clone())
            >
                {label}
            </Button>
        }
    };

    view! {
        <ConfigProvider>
            <div style="min-height: 100vh; display: flex; flex-direction: column; background: var(--colorNeutralBackground2);">
                <header style="display: flex; align-items: center; gap: 12px; padding: 12px 20px; border-bottom: 1px solid var(--colorNeutralStroke2); background: var(--colorNeutralBackground1);">
                    <strong style="font-size: 16px; margin-right: 12px;">"Flow Experiments"</strong>
                    {nav_button(Page::Gallery)}
                    {nav_button(Page::Workshop)}
                </header>
                <main style="flex: 1; padding: 20px;">
                    {move || match ctx.page.get() {
                        Page::Gallery => view! { <ArtifactGallery /> }.into_any(),
                        Page::Viewer(id) => view! {
                            <ArtifactViewer id=id on_close=Callback::new(move |_| ctx.open_gallery()) />
                        }.into_any(),
                        Page::Workshop => view! { <FlowWorkshop /> }.into_any(),
                    }}
                </main>
            </div>
        </ConfigProvider>
    }
}
