pub mod refresh;
pub mod state;
pub mod sweep;

#[cfg(test)]
pub(crate) mod testing;

pub use refresh::{refresh_player, RankEvent, RefreshKind, RefreshResult};
pub use state::{LeaderboardRow, PlayerRegistry, PlayerSlot, PlayerState, Snapshot};
pub use sweep::{SweepPolicy, SweepReport, TrackerService};
