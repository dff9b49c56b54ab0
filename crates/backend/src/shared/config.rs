use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const AGENT_PROMPT_ENV: &str = "FLOW_EXPERIMENT_AGENT_PROMPT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Путь к файлу SQLite или готовый `sqlite:` URL
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Секрет HS256 для проверки токенов хост-приложения
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AgentConfig {
    /// Замена встроенного промпта Flow Architect
    pub prompt: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3080

[database]
path = "target/db/app.db"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment variables `JWT_SECRET` and `FLOW_EXPERIMENT_AGENT_PROMPT` win over the file.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config: Config = match config_file_path() {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&contents).context("Invalid config.toml")?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            toml::from_str(DEFAULT_CONFIG)?
        }
    };

    config.apply_overrides(
        std::env::var(JWT_SECRET_ENV).ok(),
        std::env::var(AGENT_PROMPT_ENV).ok(),
    );
    Ok(config)
}

fn config_file_path() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

impl Config {
    /// Непустые значения из окружения заменяют значения из файла
    pub fn apply_overrides(&mut self, jwt_secret: Option<String>, agent_prompt: Option<String>) {
        if let Some(secret) = jwt_secret.filter(|s| !s.trim().is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(prompt) = agent_prompt.filter(|s| !s.trim().is_empty()) {
            self.agent.prompt = Some(prompt);
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// URL подключения к БД
///
/// `sqlite:` URL используется как есть, относительный путь разрешается
/// относительно директории исполняемого файла.
pub fn get_database_url(config: &Config) -> String {
    let raw = config.database.path.as_str();
    if raw.starts_with("sqlite:") {
        return raw.to_string();
    }
    crate::shared::data::db::sqlite_file_url(&resolve_database_path(raw))
}

fn resolve_database_path(db_path_str: &str) -> PathBuf {
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(db_path_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_without_file_uses_embedded_default() {
        let config = load_config().unwrap();
        assert_eq!(config.server.port, 3080);
        assert_eq!(config.database.path, "target/db/app.db");
    }

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.bind_address(), "0.0.0.0:3080");
        assert!(config.auth.jwt_secret.is_none());
        assert!(config.agent.prompt.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            path = "sqlite::memory:"

            [auth]
            jwt_secret = "file-secret"

            [agent]
            prompt = "Be brief."
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("file-secret"));
        assert_eq!(config.agent.prompt.as_deref(), Some("Be brief."));
        assert_eq!(get_database_url(&config), "sqlite::memory:");
    }

    #[test]
    fn test_env_overrides_ignore_blank_values() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.apply_overrides(Some("env-secret".into()), Some("   ".into()));
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("env-secret"));
        assert!(config.agent.prompt.is_none());
    }

    #[test]
    fn test_file_path_becomes_sqlite_url() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        let url = get_database_url(&config);
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("target/db/app.db?mode=rwc"));
    }
}
