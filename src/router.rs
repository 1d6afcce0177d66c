use axum::{routing::get, Router};

use crate::{
    controller::{
        health::{health, status},
        template::get_templates,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route("/api/templates", get(get_templates))
}
