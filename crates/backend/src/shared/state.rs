use crate::system::auth::jwt::JwtKeys;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Общее состояние приложения для axum-хендлеров
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: DatabaseConnection,
    jwt: JwtKeys,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt_secret: &str) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                jwt: JwtKeys::from_secret(jwt_secret),
            }),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.inner.db
    }

    pub fn jwt(&self) -> &JwtKeys {
        &self.inner.jwt
    }
}
