use axum::Json;

use crate::shared::extract::AppJson;
use contracts::shared::message::{parse_message, ParseMessageRequest, ParsedMessage};

/// POST /api/messages/parse
///
/// Разбор сообщения агента: текст, варианты выбора и блок артефакта.
pub async fn parse(AppJson(request): AppJson<ParseMessageRequest>) -> Json<ParsedMessage> {
    Json(parse_message(&request.content))
}
