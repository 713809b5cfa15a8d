use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod admin;
mod config;
mod error;
mod guard;
mod state;
mod storage;

use admin::auth::StaticAuthenticator;
use config::Config;
use state::AppState;
use storage::{JsonFileStore, MemoryStore, SharedStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let guard_policy = config.guard.policy()?;

    let guard_store: SharedStore = match &config.state_path {
        Some(path) => {
            tracing::info!("Login guard state stored at {}", path.display());
            Arc::new(JsonFileStore::load_or_create(path))
        }
        None => {
            tracing::warn!("Login guard state is in memory only; lockouts reset on restart");
            Arc::new(MemoryStore::new())
        }
    };

    if config.guard.allow_reset {
        tracing::warn!("Operator login reset is enabled");
    }

    let state = Arc::new(AppState {
        guard_store,
        guard_policy,
        guard_serial: tokio::sync::Mutex::new(()),
        authenticator: Arc::new(StaticAuthenticator::new(config.admin)),
        allow_reset: config.guard.allow_reset,
    });

    let app = admin::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("LoginGuard server listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
