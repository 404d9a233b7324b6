use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/grade", post(handlers::grade))
        .route("/status", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_export))
}
