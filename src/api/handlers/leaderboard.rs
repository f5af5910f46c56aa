use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::models::{LeaderboardResponse, PlayerStatusItem};
use super::AppState;

pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(LeaderboardResponse {
        generated_at: Utc::now(),
        entries: state.registry.leaderboard(),
    })
}

pub async fn get_players(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let players: Vec<PlayerStatusItem> = state
        .registry
        .slots()
        .iter()
        .map(|slot| {
            let snapshot = slot.snapshot();
            PlayerStatusItem {
                name: slot.player().name.clone(),
                tracked: snapshot.is_some(),
                in_flight: slot.is_in_flight(),
                last_match: snapshot
                    .as_ref()
                    .and_then(|s| s.last_match.as_ref())
                    .map(|m| m.to_string()),
                refreshed_at: snapshot.map(|s| s.refreshed_at),
            }
        })
        .collect();

    Json(players)
}
