use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/loggedinuser", get(controller::logged_in_user))
        .route("/user", get(controller::list_users))
        .route("/userupdate/{email}", patch(controller::update_user))
}
