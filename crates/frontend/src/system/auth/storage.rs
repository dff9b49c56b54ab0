use web_sys::window;

/// Токен кладёт в localStorage хост-приложение после входа
const ACCESS_TOKEN_KEY: &str = "auth_access_token";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?
        .get_item(ACCESS_TOKEN_KEY)
        .ok()?
        .filter(|t| !t.trim().is_empty())
}

/// Заголовок `Authorization` для защищённых маршрутов
pub fn get_auth_header() -> Option<String> {
    get_access_token().map(|token| format!("Bearer {}", token))
}
