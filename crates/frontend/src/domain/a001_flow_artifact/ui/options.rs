//! Справочники: фильтр галереи, карточка публикации, шкалы анкет

use contracts::domain::a001_flow_artifact::aggregate::{Difficulty, ALL_CATEGORIES};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use thaw::*;

pub const CATEGORIES: [&str; 9] = [
    "General",
    "Meditation",
    "Music",
    "Visual",
    "Writing",
    "Games",
    "Wellness",
    "Education",
    "Creative",
];

pub const DIFFICULTIES: [Difficulty; 3] = [
    Difficulty::Beginner,
    Difficulty::Intermediate,
    Difficulty::Advanced,
];

pub const DURATIONS: [&str; 5] = ["5-10 min", "10-15 min", "15-20 min", "20-30 min", "30+ min"];

pub const THUMBNAILS: [(&str, &str); 10] = [
    ("🎯", "Target"),
    ("🌱", "Growth"),
    ("🎵", "Music"),
    ("🎨", "Art"),
    ("✍️", "Writing"),
    ("🧩", "Puzzle"),
    ("🫁", "Wellness"),
    ("🧘", "Meditation"),
    ("🎮", "Game"),
    ("💡", "Idea"),
];

/// Категории фильтра галереи: `All` и все категории публикации
pub fn gallery_categories() -> impl Iterator<Item = &'static str> {
    std::iter::once(ALL_CATEGORIES).chain(CATEGORIES)
}

/// Варианты шкал анкеты: значение в kebab-case и подпись
pub const FLOW_EXPERIENCE_OPTIONS: [(&str, &str); 5] = [
    ("not-at-all", "Совсем нет"),
    ("a-little", "Немного"),
    ("moderately", "Умеренно"),
    ("very-much", "Сильно"),
    ("completely", "Полностью"),
];

pub const CREATIVITY_OPTIONS: [(&str, &str); 5] = [
    ("not-creative", "Не творчески"),
    ("slightly-creative", "Слегка творчески"),
    ("moderately-creative", "Умеренно творчески"),
    ("very-creative", "Очень творчески"),
    ("highly-creative", "Максимально творчески"),
];

pub const SATISFACTION_OPTIONS: [(&str, &str); 5] = [
    ("very-dissatisfied", "Очень недоволен"),
    ("dissatisfied", "Недоволен"),
    ("neutral", "Нейтрально"),
    ("satisfied", "Доволен"),
    ("very-satisfied", "Очень доволен"),
];

pub const RECOMMEND_OPTIONS: [(&str, &str); 5] = [
    ("definitely-not", "Точно нет"),
    ("probably-not", "Скорее нет"),
    ("maybe", "Возможно"),
    ("probably-yes", "Скорее да"),
    ("definitely-yes", "Точно да"),
];

/// Значение шкалы из `<select>`; пустая строка означает "не выбрано"
pub fn parse_scale<T: DeserializeOwned>(value: &str) -> Option<T> {
    if value.is_empty() {
        return None;
    }
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// Выпадающий список одной шкалы анкеты
pub fn scale_select(
    label: &'static str,
    value: RwSignal<String>,
    options: &'static [(&'static str, &'static str)],
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <Select value=value>
                <option value="">"Выберите..."</option>
                {options
                    .iter()
                    .map(|(v, l)| view! { <option value={*v}>{*l}</option> })
                    .collect_view()}
            </Select>
        </div>
    }
}
