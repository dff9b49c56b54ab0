use leptos::prelude::*;

/// Открытая страница. Роутер не нужен: страниц три, и они не вложены.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Gallery,
    Viewer(String),
    Workshop,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Gallery => "Галерея",
            Page::Viewer(_) => "Эксперимент",
            Page::Workshop => "Мастерская",
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub page: RwSignal<Page>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            page: RwSignal::new(Page::Gallery),
        }
    }

    pub fn open_gallery(&self) {
        self.page.set(Page::Gallery);
    }

    pub fn open_artifact(&self, artifact_id: &str) {
        self.page.set(Page::Viewer(artifact_id.to_string()));
    }

    pub fn open_workshop(&self) {
        self.page.set(Page::Workshop);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
