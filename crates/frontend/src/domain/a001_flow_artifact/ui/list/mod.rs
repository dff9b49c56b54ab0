use super::options::gallery_categories;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::api_utils::{api_base, error_message};
use crate::shared::date_utils::format_date;
use contracts::domain::a001_flow_artifact::aggregate::{ArtifactSort, FlowArtifact, ALL_CATEGORIES};
use contracts::domain::common::AggregateRoot;
use gloo_net::http::Request;
use leptos::logging::log;
use leptos::prelude::*;
use serde::Serialize;
use thaw::*;

const GALLERY_PAGE_SIZE: u64 = 50;

/// Параметры запроса галереи
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub sort: ArtifactSort,
    pub limit: u64,
}

impl GalleryQuery {
    /// `All` не передаётся на сервер
    pub fn new(category: &str, sort: ArtifactSort) -> Self {
        let category = Some(category.trim())
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        Self {
            category,
            sort,
            limit: GALLERY_PAGE_SIZE,
        }
    }

    pub fn to_query_string(&self) -> Result<String, String> {
        serde_qs::to_string(self).map_err(|e| format!("Failed to build query: {}", e))
    }
}

async fn fetch_gallery(query: &GalleryQuery) -> Result<Vec<FlowArtifact>, String> {
    let url = format!(
        "{}/api/artifacts/public?{}",
        api_base(),
        query.to_query_string()?
    );

    let response = Request::get(&url)
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

    serde_json::from_str::<Vec<FlowArtifact>>(&text)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

fn sort_from_value(value: &str) -> ArtifactSort {
    ArtifactSort::from_param(Some(value))
}

#[component]
#[allow(non_snake_case)]
pub fn ArtifactGallery() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let items = RwSignal::new(Vec::<FlowArtifact>::new());
    let error = RwSignal::new(None::<String>);
    let is_loading = RwSignal::new(false);
    let category = RwSignal::new(ALL_CATEGORIES.to_string());
    let sort = RwSignal::new("createdAt".to_string());

    let fetch = move || {
        let query = GalleryQuery::new(&category.get_untracked(), sort_from_value(&sort.get_untracked()));
        is_loading.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_gallery(&query).await {
                Ok(data) => {
                    log!("✅ Gallery loaded: {} artifacts", data.len());
                    items.set(data);
                    error.set(None);
                }
                Err(e) => {
                    log!("❌ Failed to load gallery: {}", e);
                    error.set(Some(e));
                }
            }
            is_loading.set(false);
        });
    };

    // Перезагрузка при смене фильтра или сортировки
    Effect::new(move |_| {
        category.track();
        sort.track();
        fetch();
    });

    view! {
        <div id="a001_flow_artifact--list" style="display: flex; flex-direction: column; gap: 16px;">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <h2 style="font-size: 20px; font-weight: bold;">"Flow-эксперименты"</h2>
                <Space>
                    <Select value=sort>
                        <option value="createdAt">"Новые"</option>
                        <option value="likes">"Популярные"</option>
                        <option value="plays">"Часто проходят"</option>
                    </Select>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| fetch()>
                        {move || if is_loading.get() { "Загрузка..." } else { "Обновить" }}
                    </Button>
                </Space>
            </Flex>

            <Flex style="gap: 8px; flex-wrap: wrap;">
                {gallery_categories()
                    .map(|c| {
                        let value = c.to_string();
                        let current = value.clone();
                        view! {
                            <Button
                                size=ButtonSize::Small
                                appearance=Signal::derive(move || {
                                    if category.get() == current {
                                        ButtonAppearance::Primary
                                    } else {
                                        ButtonAppearance::Secondary
                                    }
                                })
                                on_click=move |_| category.set(value.clone())
                            >
                                {c}
                            </Button>
                        }
                    })
                    .collect_view()}
            </Flex>

            {move || error.get().map(|e| view! {
                <div style="padding: 12px; background: var(--color-error-50); border: 1px solid var(--color-error-100); border-radius: 8px;">
                    <span style="color: var(--color-error);">{e}</span>
                </div>
            })}

            {move || {
                let list = items.get();
                if list.is_empty() && !is_loading.get() {
                    return view! {
                        <div style="padding: 40px; text-align: center; color: var(--colorNeutralForeground3);">
                            "В этой категории пока нет опубликованных экспериментов"
                        </div>
                    }.into_any();
                }
                view! {
                    <div style="display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px;">
                        {list.into_iter().map(|artifact| {
                            let id = artifact.id_string();
                            let created_at = format_date(&artifact.metadata().created_at);
                            view! {
                                <div
                                    style="padding: 16px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px; background: var(--colorNeutralBackground1); cursor: pointer;"
                                    on:click=move |_| ctx.open_artifact(&id)
                                >
                                    <div style="display: flex; justify-content: space-between; align-items: center;">
                                        <span style="font-size: 32px;">{artifact.thumbnail.clone()}</span>
                                        <span style="font-size: 12px; color: var(--colorNeutralForeground3);">
                                            {format!("{} • {}", artifact.category, artifact.difficulty.as_str())}
                                        </span>
                                    </div>
                                    <h3 style="margin-top: 8px; font-size: 16px; font-weight: 600;">{artifact.title.clone()}</h3>
                                    <p style="margin-top: 4px; font-size: 13px; color: var(--colorNeutralForeground2);">
                                        {artifact.description.clone()}
                                    </p>
                                    <div style="margin-top: 8px; font-size: 11px; color: var(--colorNeutralForeground3);">
                                        {format!(
                                            "{} • ♥ {} • ▶ {} • {}",
                                            artifact.duration, artifact.likes, artifact.plays, created_at
                                        )}
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_query_skips_all_category() {
        let query = GalleryQuery::new(ALL_CATEGORIES, ArtifactSort::CreatedAt);
        assert_eq!(query.category, None);
        assert_eq!(
            query.to_query_string().unwrap(),
            "sort=createdAt&limit=50"
        );

        let query = GalleryQuery::new(" Music ", ArtifactSort::Likes);
        assert_eq!(
            query.to_query_string().unwrap(),
            "category=Music&sort=likes&limit=50"
        );
    }

    #[test]
    fn test_sort_values_match_backend_params() {
        assert_eq!(sort_from_value("likes"), ArtifactSort::Likes);
        assert_eq!(sort_from_value("plays"), ArtifactSort::Plays);
        assert_eq!(sort_from_value("createdAt"), ArtifactSort::CreatedAt);
    }
}
