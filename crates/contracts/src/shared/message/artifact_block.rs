//! Извлечение блока `:::artifact{...} ... :::` из текста сообщения.
//!
//! Единственный поддерживаемый формат:
//!
//! ````text
//! :::artifact{type="text/html" identifier="demo" title="Demo"}
//! ```html
//! <div>hi</div>
//! ```
//! :::
//! ````
//!
//! Блок атрибутов и fenced-обёртка необязательны.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const ARTIFACT_OPEN: &str = ":::artifact";
pub const ARTIFACT_CLOSE: &str = ":::";

static ARTIFACT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s):::artifact(?:\{(?P<attrs>(?:[^}"]|"[^"]*")*)\})?\s*(?:```(?P<lang>[^\n`]*)\n(?P<fenced>.*?)```|(?P<raw>.*?))\s*:::"#,
    )
    .expect("artifact block regex")
});

static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("artifact attribute regex"));

/// Результат разбора блока артефакта
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedArtifact {
    /// Код внутри блока (без fenced-обёртки)
    pub content: String,
    #[serde(rename = "type")]
    pub artifact_type: Option<String>,
    pub identifier: Option<String>,
    pub title: Option<String>,
    /// Язык fenced-блока, если указан
    pub language: Option<String>,
}

impl ParsedArtifact {
    /// Собрать обратно полноценный блок `:::artifact{...}`
    pub fn to_block(&self) -> String {
        let mut attrs = Vec::new();
        if let Some(t) = &self.artifact_type {
            attrs.push(format!("type=\"{}\"", t));
        }
        if let Some(id) = &self.identifier {
            attrs.push(format!("identifier=\"{}\"", id));
        }
        if let Some(title) = &self.title {
            attrs.push(format!("title=\"{}\"", title));
        }
        let attrs = if attrs.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", attrs.join(" "))
        };
        let lang = self.language.as_deref().unwrap_or("");
        format!(
            "{}{}\n```{}\n{}\n```\n{}",
            ARTIFACT_OPEN, attrs, lang, self.content, ARTIFACT_CLOSE
        )
    }

    /// Копия с явно проставленным типом
    pub fn with_type(mut self, artifact_type: &str) -> Self {
        self.artifact_type = Some(artifact_type.to_string());
        self
    }
}

/// Разобрать первый блок артефакта в тексте. `None`, если маркеров нет.
pub fn parse_artifact(text: &str) -> Option<ParsedArtifact> {
    let caps = ARTIFACT_BLOCK_RE.captures(text)?;

    let mut artifact_type = None;
    let mut identifier = None;
    let mut title = None;
    if let Some(attrs) = caps.name("attrs") {
        for attr in ATTRIBUTE_RE.captures_iter(attrs.as_str()) {
            let value = Some(attr[2].to_string());
            match &attr[1] {
                "type" => artifact_type = value,
                "identifier" => identifier = value,
                "title" => title = value,
                _ => {}
            }
        }
    }

    let (content, language) = match (caps.name("fenced"), caps.name("raw")) {
        (Some(fenced), _) => {
            let lang = caps
                .name("lang")
                .map(|l| l.as_str().trim().to_string())
                .filter(|l| !l.is_empty());
            (trim_newlines(fenced.as_str()).to_string(), lang)
        }
        (None, Some(raw)) => (strip_dangling_fence(raw.as_str()), None),
        (None, None) => (String::new(), None),
    };

    Some(ParsedArtifact {
        content,
        artifact_type,
        identifier,
        title,
        language,
    })
}

/// Код артефакта, либо исходный текст, если блока нет
pub fn extract_clean_content(text: &str) -> String {
    match parse_artifact(text) {
        Some(parsed) => parsed.content,
        None => text.to_string(),
    }
}

/// Полный текст первого блока (вместе с маркерами)
pub fn find_artifact_block(text: &str) -> Option<&str> {
    ARTIFACT_BLOCK_RE.find(text).map(|m| m.as_str())
}

fn trim_newlines(s: &str) -> &str {
    s.trim_start_matches(['\r', '\n']).trim_end_matches(['\r', '\n'])
}

// Незакрытый fence попадает в raw-ветку целиком
fn strip_dangling_fence(raw: &str) -> String {
    let body = raw.trim();
    let Some(rest) = body.strip_prefix("```") else {
        return body.to_string();
    };
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => "",
    };
    rest.trim_end().trim_end_matches("```").trim().to_string()
}
