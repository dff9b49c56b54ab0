use crate::shared::message::parse_artifact;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const HTML_TYPE: &str = "text/html";
pub const SVG_TYPE: &str = "image/svg+xml";
pub const REACT_TYPE: &str = "application/vnd.react";
pub const MERMAID_TYPE: &str = "application/vnd.mermaid";

/// Типы артефактов, которые умеет показывать песочница
pub const SUPPORTED_TYPES: [&str; 4] = [HTML_TYPE, SVG_TYPE, REACT_TYPE, MERMAID_TYPE];

static REACT_MARKERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*import\s.+\sfrom\s|^\s*export\s+default\b|\buse(State|Effect|Ref|Memo|Callback)\s*\(|\bclassName=|\breturn\s*\(\s*<",
    )
    .expect("react markers regex")
});

static MERMAID_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*(graph\s+(TD|TB|BT|RL|LR)\b|flowchart\s|sequenceDiagram|classDiagram|stateDiagram|erDiagram|gantt|journey|pie\b)")
        .expect("mermaid header regex")
});

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[a-zA-Z][a-zA-Z0-9-]*(\s[^>]*)?/?>").expect("html tag regex"));

/// Шаблон песочницы для предпросмотра
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SandboxTemplate {
    Static,
    ReactTs,
}

impl SandboxTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxTemplate::Static => "static",
            SandboxTemplate::ReactTs => "react-ts",
        }
    }

    /// Имя главного файла в песочнице
    pub fn file_key(&self) -> &'static str {
        match self {
            SandboxTemplate::Static => "index.html",
            SandboxTemplate::ReactTs => "App.tsx",
        }
    }
}

pub fn is_supported_type(artifact_type: &str) -> bool {
    SUPPORTED_TYPES.contains(&artifact_type)
}

/// Шаблон по явному типу артефакта
pub fn template_for_type(artifact_type: &str) -> Option<SandboxTemplate> {
    match artifact_type {
        HTML_TYPE | SVG_TYPE => Some(SandboxTemplate::Static),
        REACT_TYPE | MERMAID_TYPE => Some(SandboxTemplate::ReactTs),
        _ => None,
    }
}

/// Угадать шаблон по коду. Только для записей без типа.
pub fn sniff_template(code: &str) -> SandboxTemplate {
    let head: String = code.trim_start().chars().take(64).collect::<String>().to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return SandboxTemplate::Static;
    }
    if REACT_MARKERS_RE.is_match(code) || MERMAID_HEADER_RE.is_match(code) {
        return SandboxTemplate::ReactTs;
    }
    if HTML_TAG_RE.is_match(code) {
        return SandboxTemplate::Static;
    }
    SandboxTemplate::Static
}

/// Явный тип имеет приоритет, неизвестный или отсутствующий тип сводится к угадыванию
pub fn select_template(artifact_type: Option<&str>, code: &str) -> SandboxTemplate {
    artifact_type
        .and_then(template_for_type)
        .unwrap_or_else(|| sniff_template(code))
}

/// Данные для отрисовки артефакта в песочнице
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxPreview {
    pub template: SandboxTemplate,
    pub file_key: String,
    pub code: String,
    pub artifact_type: Option<String>,
}

impl SandboxPreview {
    /// Построить предпросмотр из сохранённого `artifactCode`
    pub fn from_artifact_code(artifact_code: &str) -> Self {
        let (code, artifact_type) = match parse_artifact(artifact_code) {
            Some(parsed) => (parsed.content, parsed.artifact_type),
            None => (artifact_code.to_string(), None),
        };
        let template = select_template(artifact_type.as_deref(), &code);
        Self {
            template,
            file_key: template.file_key().to_string(),
            code,
            artifact_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_type_wins_over_content() {
        let react_looking = "import React from 'react';\nexport default function App() {}";
        assert_eq!(
            select_template(Some(HTML_TYPE), react_looking),
            SandboxTemplate::Static
        );
        assert_eq!(
            select_template(Some(MERMAID_TYPE), "graph TD; A-->B"),
            SandboxTemplate::ReactTs
        );
    }

    #[test]
    fn test_sniffing_without_type() {
        assert_eq!(
            sniff_template("<!DOCTYPE html>\n<html><body>useState(</body></html>"),
            SandboxTemplate::Static
        );
        assert_eq!(
            sniff_template("import { useState } from 'react';\n\nexport default function App() {\n  return <div/>;\n}"),
            SandboxTemplate::ReactTs
        );
        assert_eq!(
            sniff_template("function Game() {\n  return (\n    <div className=\"board\" />\n  );\n}"),
            SandboxTemplate::ReactTs
        );
        assert_eq!(sniff_template("sequenceDiagram\n A->>B: hi"), SandboxTemplate::ReactTs);
        assert_eq!(sniff_template("<div><p>hi</p></div>"), SandboxTemplate::Static);
        assert_eq!(sniff_template("plain words"), SandboxTemplate::Static);
    }

    #[test]
    fn test_unknown_type_falls_back_to_sniffing() {
        assert_eq!(
            select_template(Some("text/x-unknown"), "export default function App() {}"),
            SandboxTemplate::ReactTs
        );
        assert!(!is_supported_type("text/x-unknown"));
        assert!(is_supported_type(REACT_TYPE));
    }

    #[test]
    fn test_preview_from_wrapped_code() {
        let preview = SandboxPreview::from_artifact_code(
            ":::artifact{type=\"application/vnd.react\"}\n```tsx\nexport default function App() { return null; }\n```\n:::",
        );
        assert_eq!(preview.template, SandboxTemplate::ReactTs);
        assert_eq!(preview.file_key, "App.tsx");
        assert_eq!(preview.code, "export default function App() { return null; }");
        assert_eq!(preview.artifact_type.as_deref(), Some(REACT_TYPE));

        let raw = SandboxPreview::from_artifact_code("<h1>Hello</h1>");
        assert_eq!(raw.template, SandboxTemplate::Static);
        assert_eq!(raw.file_key, "index.html");
        assert_eq!(raw.code, "<h1>Hello</h1>");
    }

    #[test]
    fn test_template_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SandboxTemplate::ReactTs).unwrap(),
            "\"react-ts\""
        );
        assert_eq!(SandboxTemplate::Static.as_str(), "static");
    }
}
