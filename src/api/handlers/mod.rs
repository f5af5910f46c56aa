use std::sync::Arc;

use crate::tracker::PlayerRegistry;

pub mod health;
pub mod leaderboard;

pub struct AppState {
    pub registry: Arc<PlayerRegistry>,
}
