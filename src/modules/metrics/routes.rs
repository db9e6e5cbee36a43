use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller::{get_metrics, health_check};
use crate::AppState;

pub fn metrics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/health", get(health_check))
}
