use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::rank::QueueType;

#[derive(Debug, Clone)]
pub struct RiotSettings {
    pub api_key: String,
    pub platform_base_url: String,
    pub regional_base_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
    pub queue: QueueType,
}

impl Default for RiotSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            platform_base_url: "https://euw1.api.riotgames.com".to_string(),
            regional_base_url: "https://europe.api.riotgames.com".to_string(),
            user_agent: "LadderWatch/1.0",
            timeout_secs: 10,
            rate_limit_ms: 50, // 20 req/sec
            queue: QueueType::RankedSolo,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub interval_secs: u64,
    pub concurrency: usize,
    pub inter_player_delay_ms: u64,
    pub refresh_timeout_secs: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            interval_secs: 180,
            concurrency: 1,
            inter_player_delay_ms: 1500,
            refresh_timeout_secs: 30,
        }
    }
}

impl TrackerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct NotifierSettings {
    pub discord_webhook_url: Option<String>,
    pub opgg_region: String,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            opgg_region: "euw".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub riot: RiotSettings,
    pub tracker: TrackerSettings,
    pub notifier: NotifierSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each known variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(key) = lookup("RIOT_API_KEY") {
            config.riot.api_key = key;
        }
        if let Some(url) = lookup("RIOT_PLATFORM_URL") {
            config.riot.platform_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("RIOT_REGIONAL_URL") {
            config.riot.regional_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(queue) = lookup("RIOT_QUEUE") {
            config.riot.queue = queue.parse().context("Invalid RIOT_QUEUE")?;
        }
        if let Some(secs) = parse_var(&lookup, "TRACK_INTERVAL_SECS")? {
            config.tracker.interval_secs = secs;
        }
        if let Some(n) = parse_var(&lookup, "TRACK_CONCURRENCY")? {
            config.tracker.concurrency = n;
        }
        if let Some(ms) = parse_var(&lookup, "TRACK_DELAY_MS")? {
            config.tracker.inter_player_delay_ms = ms;
        }
        if let Some(secs) = parse_var(&lookup, "TRACK_TIMEOUT_SECS")? {
            config.tracker.refresh_timeout_secs = secs;
        }
        config.notifier.discord_webhook_url = lookup("DISCORD_WEBHOOK_URL").filter(|url| !url.is_empty());
        if let Some(region) = lookup("OPGG_REGION") {
            config.notifier.opgg_region = region;
        }

        Ok(config)
    }

    /// Live commands cannot talk to the provider without a key.
    pub fn require_api_key(&self) -> Result<()> {
        if self.riot.api_key.trim().is_empty() {
            anyhow::bail!("RIOT_API_KEY is not set");
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("Invalid value for {}: {}", key, raw)))
        .transpose()
}
