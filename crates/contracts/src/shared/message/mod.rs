//! Разбор структурированного вывода агента внутри сообщений чата

pub mod artifact_block;
pub mod content;
pub mod flow_options;

pub use artifact_block::{extract_clean_content, find_artifact_block, parse_artifact, ParsedArtifact};
pub use content::MessageContent;
pub use flow_options::{split_options, visible_text_while_streaming, FlowReply, OptionSelection};

use serde::{Deserialize, Serialize};

/// Запрос на разбор одного сообщения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseMessageRequest {
    pub content: MessageContent,
}

/// Сообщение агента после разбора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub message: String,
    pub options: Vec<String>,
    pub artifact: Option<ParsedArtifact>,
}

/// Разобрать сообщение целиком: варианты выбора и блок артефакта
pub fn parse_message(content: &MessageContent) -> ParsedMessage {
    let text = content.to_plain_text();
    let FlowReply { message, options } = split_options(&text);
    let artifact = parse_artifact(&message);
    ParsedMessage {
        message,
        options,
        artifact,
    }
}

/// Последний блок артефакта в переписке (поиск от новых сообщений к старым).
/// Возвращается полный текст блока вместе с маркерами.
pub fn find_latest_artifact_block(messages: &[MessageContent]) -> Option<String> {
    messages.iter().rev().find_map(|m| {
        let text = m.to_plain_text();
        find_artifact_block(&text).map(str::to_string)
    })
}
