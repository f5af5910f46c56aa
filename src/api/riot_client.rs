use crate::api::provider::LadderProvider;
use crate::config::settings::RiotSettings;
use crate::config::TrackedPlayer;
use crate::domain::models::{select_queue_entry, LeagueEntryResponse, MatchResponse, SummonerResponse};
use crate::domain::{MatchDetail, MatchIdentity, PlayerIdentity};
use crate::errors::{parse_context, RefreshError};
use crate::http::RateLimitedClient;
use crate::rank::{LadderEntry, QueueType};
use anyhow::{Context, Result};
use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Riot Games API client
pub struct RiotClient {
    client: RateLimitedClient,
    platform_base_url: String,
    regional_base_url: String,
}

impl RiotClient {
    pub fn new(settings: &RiotSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            &settings.api_key,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            platform_base_url: settings.platform_base_url.clone(),
            regional_base_url: settings.regional_base_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, RefreshError> {
        debug!("GET {}", url);
        let response = self.client.get(url).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(RefreshError::NotFound(what.to_string())),
            status if !status.is_success() => {
                return Err(anyhow::anyhow!("API returned status {} for {}", status, what).into());
            }
            _ => {}
        }

        let body = response
            .json::<T>()
            .await
            .with_context(|| parse_context(what))?;
        Ok(body)
    }

    // --- Helper Methods ---

    fn build_summoner_url(&self, puuid: &str) -> String {
        format!(
            "{}/lol/summoner/v4/summoners/by-puuid/{}",
            self.platform_base_url,
            urlencoding::encode(puuid)
        )
    }

    fn build_match_ids_url(&self, puuid: &str, queue: QueueType) -> String {
        format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?queue={}&type=ranked&start=0&count=1",
            self.regional_base_url,
            urlencoding::encode(puuid),
            queue.queue_id()
        )
    }

    fn build_league_entries_url(&self, puuid: &str) -> String {
        format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            self.platform_base_url,
            urlencoding::encode(puuid)
        )
    }

    fn build_match_url(&self, match_id: &MatchIdentity) -> String {
        format!(
            "{}/lol/match/v5/matches/{}",
            self.regional_base_url,
            urlencoding::encode(match_id.as_str())
        )
    }
}

impl LadderProvider for RiotClient {
    async fn fetch_identity(&self, player: &TrackedPlayer) -> Result<PlayerIdentity, RefreshError> {
        let url = self.build_summoner_url(&player.puuid);
        let summoner: SummonerResponse = self.get_json(&url, &format!("summoner {}", player.name)).await?;
        Ok(summoner.into())
    }

    async fn fetch_latest_match_identity(
        &self,
        identity: &PlayerIdentity,
        queue: QueueType,
    ) -> Result<Option<MatchIdentity>, RefreshError> {
        let url = self.build_match_ids_url(&identity.puuid, queue);
        let ids: Vec<String> = self.get_json(&url, "match ids").await?;
        Ok(ids.into_iter().next().map(MatchIdentity::new))
    }

    async fn fetch_ladder_entry(
        &self,
        identity: &PlayerIdentity,
        queue: QueueType,
    ) -> Result<Option<LadderEntry>, RefreshError> {
        let url = self.build_league_entries_url(&identity.puuid);
        let entries: Vec<LeagueEntryResponse> = self.get_json(&url, "league entries").await?;
        Ok(select_queue_entry(&entries, queue)?)
    }

    async fn fetch_match_detail(&self, match_id: &MatchIdentity) -> Result<MatchDetail, RefreshError> {
        let url = self.build_match_url(match_id);
        let response: MatchResponse = self.get_json(&url, &format!("match {}", match_id)).await?;
        Ok(response.into())
    }
}
