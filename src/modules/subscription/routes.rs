use axum::{routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn subscription_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-subscription", post(controller::create_subscription))
        .route("/payment-success", post(controller::payment_success))
}
