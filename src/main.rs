use anyhow::Result;

use ladder_watch::cli::Command;
use ladder_watch::{handle_completions, handle_leaderboard, handle_track, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Track {
            players,
            port,
            interval,
            concurrency,
        } => handle_track(players, *port, *interval, *concurrency),
        Command::Leaderboard { players, post } => handle_leaderboard(players, *post),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
