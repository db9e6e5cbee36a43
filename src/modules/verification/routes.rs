use axum::{routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn verification_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/send-audio-otp", post(controller::send_audio_otp))
        .route("/verify-audio-otp", post(controller::verify_audio_otp))
        .route("/send-lang-otp", post(controller::send_language_otp))
        .route("/verify-lang-otp", post(controller::verify_language_otp))
}
