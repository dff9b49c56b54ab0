//! API utilities for frontend-backend communication

/// Порт backend по умолчанию (`server.port` в config.toml)
const BACKEND_PORT: u16 = 3080;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using the backend port.
///
/// # Returns
/// - API base URL like "http://localhost:3080"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Текст ошибки из тела `{"error": "..."}` или код статуса
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("Server error: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(400, r#"{"error":"title is required"}"#),
            "title is required"
        );
        assert_eq!(error_message(502, "<html>Bad gateway</html>"), "Server error: 502");
        assert_eq!(error_message(404, r#"{"message":"x"}"#), "Server error: 404");
    }
}
