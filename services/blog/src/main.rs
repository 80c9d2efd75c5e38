use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use common::{
    config::ServerConfig,
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    session::{SessionConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::{repositories::PostRepository, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting blog service");

    // Sessions issued by the auth service are verified with the same secret
    let session_config = SessionConfig::from_env()?;
    let server_config = ServerConfig::load("BLOG", 3001)?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let app_state = AppState {
        posts: Arc::new(PostRepository::new(pool)),
        tokens: TokenService::new(&session_config),
    };

    info!("Blog service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Blog service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
