use serde::{Deserialize, Serialize};

/// Содержимое сообщения чата: строка или список частей
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Часть сообщения. Порядок вариантов важен для untagged-десериализации.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Raw(String),
    Think { think: ThinkContent },
    Text {
        #[serde(default)]
        text: Option<TextValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThinkContent {
    Plain(String),
    Wrapped { value: String },
}

/// `text` приходит либо строкой, либо объектом `{ value }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Wrapped { value: String },
}

impl MessageContent {
    /// Плоский текст сообщения: части склеиваются без разделителя
    pub fn to_plain_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts.iter().map(ContentPart::as_text).collect(),
        }
    }
}

impl ContentPart {
    fn as_text(&self) -> &str {
        match self {
            ContentPart::Raw(s) => s.as_str(),
            ContentPart::Think { think } => match think {
                ThinkContent::Plain(s) | ThinkContent::Wrapped { value: s } => s.as_str(),
            },
            ContentPart::Text { text } => match text {
                Some(TextValue::Plain(s)) | Some(TextValue::Wrapped { value: s }) => s.as_str(),
                None => "",
            },
        }
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}
