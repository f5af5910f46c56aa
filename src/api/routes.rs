use axum::{routing::get, Router};
use std::sync::Arc;
use crate::api::handlers::{health::health, leaderboard::{get_leaderboard, get_players}, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/players", get(get_players))
        .with_state(state)
}
