use anyhow::{Context, Result};
use log::info;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::message::RankMessage;
use super::Notifier;

/// Posts messages as embeds to a Discord channel webhook
pub struct DiscordWebhookNotifier {
    client: Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    embeds: Vec<Embed<'a>>,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: Vec<EmbedField<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<EmbedImage<'a>>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

impl<'a> WebhookPayload<'a> {
    fn from_message(message: &'a RankMessage) -> Self {
        let embed = Embed {
            title: &message.title,
            description: &message.description,
            color: message.color,
            fields: message
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: &f.name,
                    value: &f.value,
                })
                .collect(),
            thumbnail: message.thumbnail_url.as_deref().map(|url| EmbedImage { url }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        Self { embeds: vec![embed] }
    }
}

impl DiscordWebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build webhook client")?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

impl Notifier for DiscordWebhookNotifier {
    async fn send(&self, message: &RankMessage) -> Result<()> {
        let payload = WebhookPayload::from_message(message);
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .context("Failed to post to Discord webhook")?;

        if !response.status().is_success() {
            anyhow::bail!("Discord webhook returned status: {}", response.status());
        }

        info!("Posted \"{}\" to Discord", message.title);
        Ok(())
    }
}
