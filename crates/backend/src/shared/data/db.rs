use anyhow::Context;
use contracts::domain::a001_flow_artifact::aggregate::FlowArtifact;
use contracts::domain::a002_artifact_session::aggregate::ArtifactSession;
use contracts::domain::a003_flow_agent::aggregate::FlowAgent;
use contracts::domain::common::AggregateRoot;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

/// Наибольшее значение OFFSET/LIMIT, которое SQLite принимает как INTEGER
pub const MAX_SQL_OFFSET: u64 = i64::MAX as u64;

/// Подключиться к SQLite и подготовить схему
pub async fn initialize_database(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(file) = db_url
        .strip_prefix("sqlite://")
        .map(|rest| rest.split('?').next().unwrap_or(rest))
    {
        if let Some(parent) = Path::new(file).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create database directory {}", parent.display()))?;
        }
    }

    let mut options = ConnectOptions::new(db_url.to_string());
    if db_url.contains(":memory:") {
        // У каждого соединения своя in-memory база
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to {}", db_url))?;

    ensure_schema(&conn).await?;
    tracing::info!("Database ready: {}", db_url);
    Ok(conn)
}

/// `sqlite://` URL для файла, создаётся при отсутствии
pub fn sqlite_file_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Ensure required tables exist (minimal schema bootstrap)
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in schema_statements() {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.clone()))
            .await
            .with_context(|| format!("Schema statement failed: {}", first_line(&sql)))?;
    }
    Ok(())
}

fn schema_statements() -> Vec<String> {
    let artifact = FlowArtifact::full_name();
    let session = ArtifactSession::full_name();
    let agent = FlowAgent::full_name();

    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {artifact} (
                artifact_id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                instructions TEXT NOT NULL,
                artifact_code TEXT NOT NULL,
                conversation_id TEXT NOT NULL,
                author TEXT NOT NULL,
                category TEXT NOT NULL,
                difficulty TEXT NOT NULL DEFAULT 'Beginner',
                duration TEXT NOT NULL DEFAULT '10-15 min',
                thumbnail TEXT NOT NULL DEFAULT '🎯',
                likes INTEGER NOT NULL DEFAULT 0,
                plays INTEGER NOT NULL DEFAULT 0,
                is_published INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{artifact}_category ON {artifact} (category, is_published);"),
        format!("CREATE INDEX IF NOT EXISTS idx_{artifact}_author ON {artifact} (author, created_at DESC);"),
        format!("CREATE INDEX IF NOT EXISTS idx_{artifact}_likes ON {artifact} (likes DESC);"),
        format!("CREATE INDEX IF NOT EXISTS idx_{artifact}_plays ON {artifact} (plays DESC);"),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {session} (
                session_id TEXT PRIMARY KEY NOT NULL,
                artifact_id TEXT NOT NULL,
                user_id TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT,
                duration INTEGER,
                completed INTEGER NOT NULL DEFAULT 0,
                questionnaire_responses TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{session}_artifact ON {session} (artifact_id, created_at DESC);"),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {agent} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                instructions TEXT NOT NULL,
                provider TEXT NOT NULL,
                endpoint TEXT NOT NULL,
                model TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL,
                is_promoted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#
        ),
    ]
}

fn first_line(sql: &str) -> &str {
    sql.trim().lines().next().unwrap_or_default()
}

/// In-memory база со схемой для тестов
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    initialize_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let conn = test_connection().await;
        ensure_schema(&conn).await.unwrap();

        let tables = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = tables
            .iter()
            .map(|row| row.try_get("", "name").unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["a001_flow_artifact", "a002_artifact_session", "a003_flow_agent"]
        );
    }

    #[test]
    fn test_windows_path_gets_leading_slash() {
        assert_eq!(
            sqlite_file_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
        assert_eq!(
            sqlite_file_url(Path::new("/var/lib/app.db")),
            "sqlite:///var/lib/app.db?mode=rwc"
        );
    }
}
