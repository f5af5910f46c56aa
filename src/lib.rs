pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod notify;
pub mod rank;
pub mod rate_limiter;
pub mod services;
pub mod tracker;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use std::path::Path;

use crate::cli::Command;
use crate::config::{load_roster, AppConfig};
use crate::services::standings::StandingsService;
use crate::services::tracking::TrackingService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_track(
    players: &Path,
    port: Option<u16>,
    interval: Option<u64>,
    concurrency: Option<usize>,
) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(secs) = interval {
        config.tracker.interval_secs = secs;
    }
    if let Some(n) = concurrency {
        config.tracker.concurrency = n;
    }
    let roster = load_roster(players)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = TrackingService::new(config, roster, port)?;
        service.run().await
    })
}

pub fn handle_leaderboard(players: &Path, post: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let roster = load_roster(players)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = StandingsService::new(config, roster, post)?;
        service.run().await
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
