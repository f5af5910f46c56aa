use anyhow::Result;
use colored::{ColoredString, Colorize};
use log::info;
use std::sync::Arc;

use crate::api::RiotClient;
use crate::config::{AppConfig, TrackedPlayer};
use crate::notify::{ChannelNotifier, MessageComposer, Notifier};
use crate::rank::{Standing, Tier};
use crate::tracker::{LeaderboardRow, PlayerRegistry, SweepPolicy, TrackerService};

/// One-shot snapshot of every player, printed as a leaderboard
pub struct StandingsService {
    tracker: TrackerService<RiotClient, ChannelNotifier>,
    notifier: Arc<ChannelNotifier>,
    composer: MessageComposer,
    post: bool,
}

impl StandingsService {
    pub fn new(config: AppConfig, roster: Vec<TrackedPlayer>, post: bool) -> Result<Self> {
        config.require_api_key()?;

        let composer = MessageComposer::new(config.notifier.opgg_region.clone());
        let notifier = Arc::new(ChannelNotifier::from_settings(&config.notifier)?);
        let tracker = TrackerService::new(
            Arc::new(RiotClient::new(&config.riot)?),
            Arc::clone(&notifier),
            Arc::new(PlayerRegistry::new(roster)),
            composer.clone(),
            SweepPolicy::from(&config.tracker),
            config.riot.queue,
        );

        Ok(Self {
            tracker,
            notifier,
            composer,
            post,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let report = self.tracker.sweep().await;
        if report.failed > 0 {
            info!("{} players could not be fetched and are left out", report.failed);
        }

        let standings = self.tracker.registry().leaderboard();
        print_standings(&standings);

        if self.post {
            self.notifier.send(&self.composer.render_leaderboard(&standings)).await?;
        }
        Ok(())
    }
}

pub fn print_standings(standings: &[Standing<LeaderboardRow>]) {
    println!("{}", "SoloQ Leaderboard".bold());
    for standing in standings {
        let row = &standing.item;
        let position = &row.entry.position;
        let rank_text = if position.is_unranked() {
            "UNRANKED".dimmed()
        } else {
            tier_color(position.tier(), position.to_string())
        };
        println!(
            "{:>3}. {:<20} {:<28} {:>5} pts  ({} games)",
            standing.place, row.name, rank_text, standing.score, row.games
        );
    }
}

fn tier_color(tier: Tier, text: String) -> ColoredString {
    match tier {
        Tier::Unranked => text.dimmed(),
        Tier::Iron | Tier::Bronze => text.truecolor(205, 127, 50),
        Tier::Silver => text.white(),
        Tier::Gold => text.yellow(),
        Tier::Platinum => text.cyan(),
        Tier::Emerald => text.green(),
        Tier::Diamond => text.blue(),
        Tier::Master => text.magenta(),
        Tier::Grandmaster => text.red(),
        Tier::Challenger => text.bright_yellow().bold(),
    }
}
