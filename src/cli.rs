use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "ranked ladder tracker")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Track the roster and announce ranked games as they complete
    Track {
        /// Roster file (JSON)
        #[arg(short = 'f', long, default_value = "players.json")]
        players: PathBuf,
        /// Also serve /health and /api/leaderboard on this port
        #[arg(short, long)]
        port: Option<u16>,
        /// Seconds between sweeps (overrides TRACK_INTERVAL_SECS)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Players refreshed at the same time (overrides TRACK_CONCURRENCY)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// Fetch every player once and print the leaderboard
    Leaderboard {
        /// Roster file (JSON)
        #[arg(short = 'f', long, default_value = "players.json")]
        players: PathBuf,
        /// Also post the leaderboard to the configured channel
        #[arg(long)]
        post: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
