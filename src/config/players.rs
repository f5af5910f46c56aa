//! Roster of tracked players.
//!
//! The roster file is a JSON array:
//! `[{ "name": "Ewen", "puuid": "...", "discord_id": "410796897398423563" }]`
//!
//! `discord_id` is optional; without it notifications use the display name.
//! Roster order is also the leaderboard tie-break order.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    pub name: String,
    pub puuid: String,
    #[serde(default)]
    pub discord_id: Option<String>,
}

impl TrackedPlayer {
    pub fn new(name: impl Into<String>, puuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            puuid: puuid.into(),
            discord_id: None,
        }
    }

    pub fn with_discord_id(mut self, id: impl Into<String>) -> Self {
        self.discord_id = Some(id.into());
        self
    }

    /// Chat mention if a Discord id is known, bold name otherwise
    pub fn mention(&self) -> String {
        match &self.discord_id {
            Some(id) => format!("<@{}>", id),
            None => format!("**{}**", self.name),
        }
    }
}

/// Load the roster from a JSON file
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<TrackedPlayer>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file {}", path.display()))?;
    parse_roster(&json).with_context(|| format!("Invalid roster file {}", path.display()))
}

pub fn parse_roster(json: &str) -> Result<Vec<TrackedPlayer>> {
    let players: Vec<TrackedPlayer> = serde_json::from_str(json).context("Failed to parse roster JSON")?;

    if players.is_empty() {
        anyhow::bail!("Roster is empty");
    }

    let mut seen = HashSet::new();
    for player in &players {
        if player.puuid.trim().is_empty() {
            anyhow::bail!("Player {} has an empty puuid", player.name);
        }
        if !seen.insert(player.puuid.as_str()) {
            anyhow::bail!("Player {} is listed twice", player.name);
        }
    }

    Ok(players)
}
