use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DataContractViolation;
use crate::rank::{LadderEntry, LadderPosition, QueueType};

/// Resolved account of a tracked player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub puuid: String,
}

/// Id of a completed ranked match. Only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchIdentity(String);

impl MatchIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Match data needed to compose a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub duration_seconds: u32,
    pub participants: Vec<Participant>,
}

impl MatchDetail {
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub puuid: String,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub display_name: String,
    pub display_tag: String,
}

// --- API Response Structures ---

/// Raw summoner response from the Riot API
#[derive(Debug, Deserialize)]
pub struct SummonerResponse {
    pub puuid: String,
}

impl From<SummonerResponse> for PlayerIdentity {
    fn from(response: SummonerResponse) -> Self {
        Self {
            puuid: response.puuid,
        }
    }
}

/// One queue's league entry
#[derive(Debug, Deserialize)]
pub struct LeagueEntryResponse {
    #[serde(rename = "queueType")]
    pub queue_type: String,
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(rename = "leaguePoints")]
    pub league_points: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl LeagueEntryResponse {
    pub fn is_queue(&self, queue: QueueType) -> bool {
        self.queue_type == queue.as_str()
    }

    pub fn to_entry(&self) -> Result<LadderEntry, DataContractViolation> {
        let position = LadderPosition::from_wire(&self.tier, &self.rank, self.league_points)?;
        Ok(LadderEntry::new(position, self.wins, self.losses))
    }
}

/// Picks the tracked queue's entry out of all of a player's entries.
pub fn select_queue_entry(
    entries: &[LeagueEntryResponse],
    queue: QueueType,
) -> Result<Option<LadderEntry>, DataContractViolation> {
    entries
        .iter()
        .find(|entry| entry.is_queue(queue))
        .map(LeagueEntryResponse::to_entry)
        .transpose()
}

/// Raw match response from the Riot API
#[derive(Debug, Deserialize)]
pub struct MatchResponse {
    pub info: MatchInfoResponse,
}

#[derive(Debug, Deserialize)]
pub struct MatchInfoResponse {
    #[serde(rename = "gameDuration")]
    pub game_duration: u32,
    pub participants: Vec<ParticipantResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantResponse {
    pub puuid: String,
    #[serde(rename = "championName")]
    pub champion_name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    #[serde(rename = "riotIdGameName", default)]
    pub riot_id_game_name: String,
    #[serde(rename = "riotIdTagline", default)]
    pub riot_id_tagline: String,
}

impl From<MatchResponse> for MatchDetail {
    fn from(response: MatchResponse) -> Self {
        let participants = response
            .info
            .participants
            .into_iter()
            .map(|p| Participant {
                puuid: p.puuid,
                champion: p.champion_name,
                kills: p.kills,
                deaths: p.deaths,
                assists: p.assists,
                display_name: p.riot_id_game_name,
                display_tag: p.riot_id_tagline,
            })
            .collect();

        Self {
            duration_seconds: response.info.game_duration,
            participants,
        }
    }
}
