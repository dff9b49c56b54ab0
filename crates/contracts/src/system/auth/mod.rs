use serde::{Deserialize, Serialize};

/// Claims токена, выданного хост-приложением
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    #[serde(default)]
    pub username: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}
