pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/heartbeat", get(health::heartbeat_handler))
        .route("/generate-post", post(handlers::handle_generate_post))
        .with_state(state)
}
