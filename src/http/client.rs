use crate::errors::fetch_context;
use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;

const API_KEY_HEADER: &str = "X-Riot-Token";

/// HTTP client with built-in rate limiting, shareable across concurrent refreshes
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: Mutex<RateLimiter>,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, api_key: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, api_key, timeout_secs)?;
        let rate_limiter = Mutex::new(RateLimiter::new(rate_limit_ms));

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.lock().await.wait().await;
        self.send_get_request(url).await
    }

    fn build_client(user_agent: &str, api_key: &str, timeout_secs: u64) -> Result<Client> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| fetch_context(url))
    }
}
