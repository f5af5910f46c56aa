use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rank::Standing;
use crate::tracker::LeaderboardRow;

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<Standing<LeaderboardRow>>,
}

#[derive(Serialize)]
pub struct PlayerStatusItem {
    pub name: String,
    pub tracked: bool,
    pub in_flight: bool,
    pub last_match: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}
