mod handlers;
mod metrics;
mod routes;

use anyhow::Context;
use sandgrade_engine::{Grader, RuntimeConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{info, warn};

pub struct AppState {
    pub grader: Grader,
    /// Bounds how many interpreter processes run at once
    pub permits: Semaphore,
}

impl AppState {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            grader: Grader::from_config(config),
            permits: Semaphore::new(config.max_concurrency),
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Sandgrade API booting...");

    let config = RuntimeConfig::load_default()?.with_env_overrides()?;
    info!(
        racket_root = %config.racket_root.display(),
        timeout_seconds = config.timeout_seconds,
        max_concurrency = config.max_concurrency,
        "Runtime configuration loaded"
    );

    if let Err(e) = config.check_installation() {
        warn!(error = %e, "Racket installation check failed; submissions will report a crash");
    }

    let state = Arc::new(AppState::new(&config));

    let app = routes::routes().with_state(state);

    let addr = std::env::var("SANDGRADE_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("HTTP server listening on {}", addr);
    info!("Ready to grade submissions");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
