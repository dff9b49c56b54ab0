use backend::{routes, shared, system};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    // Initialize database (schema is created on first start)
    let db_url = shared::config::get_database_url(&config);
    let conn = shared::data::db::initialize_database(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e:#}"))?;

    // Ensure Flow Architect agent exists
    system::initialization::ensure_flow_agent_exists(&conn, config.agent.prompt.as_deref())
        .await?;

    let jwt_secret = system::auth::jwt::resolve_secret(config.auth.jwt_secret.as_deref());
    let state = shared::state::AppState::new(conn, &jwt_secret);
    let app = routes::configure_routes(state);

    let addr = config.bind_address();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
