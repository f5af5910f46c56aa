pub mod discord;
pub mod message;

use anyhow::Result;
use log::info;
use std::future::Future;

use crate::config::settings::NotifierSettings;

pub use discord::DiscordWebhookNotifier;
pub use message::{MessageComposer, MessageField, RankMessage};

/// Delivers composed messages to a chat channel
pub trait Notifier: Send + Sync {
    fn send(&self, message: &RankMessage) -> impl Future<Output = Result<()>> + Send;
}

/// Writes messages to the log instead of a channel
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, message: &RankMessage) -> Result<()> {
        info!("[{}] {}", message.title, message.description.replace('\n', " "));
        for field in message.fields.iter().filter(|f| !f.value.trim().is_empty()) {
            info!("    {}: {}", field.name.trim(), field.value.replace('\n', " "));
        }
        Ok(())
    }
}

/// Notifier picked from configuration
pub enum ChannelNotifier {
    Discord(DiscordWebhookNotifier),
    Log(LogNotifier),
}

impl ChannelNotifier {
    pub fn from_settings(settings: &NotifierSettings) -> Result<Self> {
        match &settings.discord_webhook_url {
            Some(url) => Ok(Self::Discord(DiscordWebhookNotifier::new(url.clone())?)),
            None => {
                info!("No DISCORD_WEBHOOK_URL set, notifications go to the log");
                Ok(Self::Log(LogNotifier))
            }
        }
    }
}

impl Notifier for ChannelNotifier {
    async fn send(&self, message: &RankMessage) -> Result<()> {
        match self {
            Self::Discord(notifier) => notifier.send(message).await,
            Self::Log(notifier) => notifier.send(message).await,
        }
    }
}
