use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Ключи HS256, собранные один раз при старте
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Generate JWT access token with 24 hours lifetime
///
/// В проде токены выпускает хост-приложение; здесь для тестов и локальной отладки.
pub fn generate_access_token(keys: &JwtKeys, user_id: &str, username: &str) -> Result<String> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding).context("Failed to encode JWT token")
}

/// Validate JWT token and extract claims
pub fn validate_token(keys: &JwtKeys, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(token, &keys.decoding, &Validation::default())
        .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Секрет из конфигурации, либо случайный на время жизни процесса
pub fn resolve_secret(configured: Option<&str>) -> String {
    match configured.filter(|s| !s.trim().is_empty()) {
        Some(secret) => secret.to_string(),
        None => {
            tracing::warn!(
                "JWT secret is not configured; generated a random one. Tokens from the host will be rejected until [auth] jwt_secret or JWT_SECRET is set."
            );
            generate_jwt_secret()
        }
    }
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let keys = JwtKeys::from_secret("test-secret");
        let token = generate_access_token(&keys, "user-1", "alice").unwrap();
        let claims = validate_token(&keys, &token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = generate_access_token(&JwtKeys::from_secret("a"), "user-1", "alice").unwrap();
        assert!(validate_token(&JwtKeys::from_secret("b"), &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = JwtKeys::from_secret("test-secret");
        let past = (Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let claims = TokenClaims {
            sub: "user-1".into(),
            username: String::new(),
            exp: past,
            iat: past,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(validate_token(&keys, &token).is_err());
    }

    #[test]
    fn test_resolve_secret() {
        assert_eq!(resolve_secret(Some("configured")), "configured");
        let generated = resolve_secret(Some(""));
        assert_eq!(generated.len(), 44);
        assert_ne!(generated, resolve_secret(None));
    }
}
