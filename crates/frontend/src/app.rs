use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Навигация между галереей, просмотром и мастерской
    provide_context(AppGlobalContext::new());

    view! {
        <Shell />
    }
}
