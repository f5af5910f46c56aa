use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;

use crate::api::RiotClient;
use crate::config::{AppConfig, TrackedPlayer};
use crate::notify::{ChannelNotifier, MessageComposer};
use crate::services::server::ServerService;
use crate::tracker::{PlayerRegistry, SweepPolicy, TrackerService};

pub struct TrackingService {
    tracker: TrackerService<RiotClient, ChannelNotifier>,
    config: AppConfig,
    port: Option<u16>,
}

impl TrackingService {
    pub fn new(config: AppConfig, roster: Vec<TrackedPlayer>, port: Option<u16>) -> Result<Self> {
        config.require_api_key()?;

        let provider = Arc::new(RiotClient::new(&config.riot)?);
        let notifier = Arc::new(ChannelNotifier::from_settings(&config.notifier)?);
        let registry = Arc::new(PlayerRegistry::new(roster));
        let tracker = TrackerService::new(
            provider,
            notifier,
            registry,
            MessageComposer::new(config.notifier.opgg_region.clone()),
            SweepPolicy::from(&config.tracker),
            config.riot.queue,
        );

        Ok(Self { tracker, config, port })
    }

    pub async fn run(&self) -> Result<()> {
        info!("=== Starting Ladder Tracking ===");
        info!(
            "Queue {}, every {}s, {} at a time",
            self.config.riot.queue.as_str(),
            self.config.tracker.interval_secs,
            self.config.tracker.concurrency.max(1)
        );

        // Step 1: Initialize every player from a first snapshot
        let report = self.tracker.sweep().await;
        let registry = self.tracker.registry();
        info!("  → Initialized {}/{} players", registry.tracked_count(), registry.len());
        if report.failed > 0 {
            warn!("  → {} players will be retried on the next sweep", report.failed);
        }

        // Step 2: Serve health and leaderboard alongside tracking
        if let Some(port) = self.port {
            let server = ServerService::new(port, Arc::clone(self.tracker.registry()));
            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    error!("HTTP server stopped: {:#}", e);
                }
            });
        }

        // Step 3: Sweep forever
        self.tracker.run(self.config.tracker.interval()).await;
        Ok(())
    }
}
