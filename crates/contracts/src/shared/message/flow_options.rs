//! Хвост ответа агента с вариантами выбора.
//!
//! Ответ Flow Architect заканчивается маркером `====`, за которым идёт строгий JSON
//! `{"options": ["...", ...]}`. Всё до маркера показывается пользователю.

use serde::{Deserialize, Serialize};

pub const OPTIONS_SENTINEL: &str = "====";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsPayload {
    options: Vec<String>,
}

/// Ответ агента, разделённый на текст и варианты
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReply {
    pub message: String,
    pub options: Vec<String>,
}

impl FlowReply {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Разделить ответ на текст и варианты.
///
/// Маркеры перебираются с конца: берётся последний, после которого идёт
/// валидный payload (маркер может встретиться и внутри самих вариантов).
/// Если такого нет, возвращается исходный текст без вариантов.
pub fn split_options(text: &str) -> FlowReply {
    for (idx, _) in text.rmatch_indices(OPTIONS_SENTINEL) {
        let payload = text[idx + OPTIONS_SENTINEL.len()..].trim();
        if let Ok(parsed) = serde_json::from_str::<OptionsPayload>(payload) {
            return FlowReply {
                message: text[..idx].trim_end_matches('=').trim().to_string(),
                options: parsed.options,
            };
        }
    }

    FlowReply {
        message: text.to_string(),
        options: Vec::new(),
    }
}

/// Видимая часть ответа во время стриминга: JSON с вариантами не показывается
/// даже частично.
pub fn visible_text_while_streaming(text: &str) -> &str {
    let mut has_sentinel = false;
    for (idx, _) in text.match_indices(OPTIONS_SENTINEL) {
        has_sentinel = true;
        let after = text[idx + OPTIONS_SENTINEL.len()..].trim_start_matches('=').trim_start();
        if after.is_empty() || after.starts_with('{') {
            return text[..idx].trim_end_matches('=').trim_end();
        }
    }
    if has_sentinel {
        return text;
    }

    // Начало маркера в конце строки: "...\n==" ещё может стать "===="
    let without = text.trim_end_matches('=');
    let run = text.len() - without.len();
    if run > 0 && (without.is_empty() || without.ends_with('\n')) {
        return without.trim_end();
    }
    text
}

/// Состояние выбора вариантов пользователем
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSelection {
    options: Vec<String>,
    selected: Vec<String>,
}

impl OptionSelection {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: Vec::new(),
        }
    }

    pub fn from_reply(reply: &FlowReply) -> Self {
        Self::new(reply.options.clone())
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_visible(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }

    /// Переключить вариант. Возвращает, выбран ли он после переключения.
    /// Неизвестные варианты игнорируются.
    pub fn toggle(&mut self, option: &str) -> bool {
        if !self.options.iter().any(|o| o == option) {
            return false;
        }
        if self.is_selected(option) {
            self.selected.retain(|s| s != option);
            false
        } else {
            self.selected.push(option.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Текст ответа агенту из выбранных вариантов
    pub fn reply_text(&self) -> Option<String> {
        if self.selected.is_empty() {
            None
        } else {
            Some(self.selected.join(", "))
        }
    }
}
