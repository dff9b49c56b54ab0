use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Пишет одно событие на запрос: метод, путь, статус, длительность (ms)
/// и размер ответа в байтах.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                method = %method,
                path = %path,
                status = parts.status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "response body could not be read: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    tracing::info!(
        method = %method,
        path = %path,
        status = parts.status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        size = %format_number(bytes.len()),
        "request"
    );

    Response::from_parts(parts, Body::from(bytes))
}
