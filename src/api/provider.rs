use std::future::Future;

use crate::config::TrackedPlayer;
use crate::domain::{MatchDetail, MatchIdentity, PlayerIdentity};
use crate::errors::RefreshError;
use crate::rank::{LadderEntry, QueueType};

/// Source of ladder data. Each call is one dependent step of a player refresh.
pub trait LadderProvider: Send + Sync {
    /// Resolves the tracked player. Unknown players fail with `NotFound`.
    fn fetch_identity(
        &self,
        player: &TrackedPlayer,
    ) -> impl Future<Output = Result<PlayerIdentity, RefreshError>> + Send;

    /// Most recent completed match in `queue`, `None` without any history.
    fn fetch_latest_match_identity(
        &self,
        identity: &PlayerIdentity,
        queue: QueueType,
    ) -> impl Future<Output = Result<Option<MatchIdentity>, RefreshError>> + Send;

    /// Ladder entry for `queue`, `None` when the player has no entry there.
    fn fetch_ladder_entry(
        &self,
        identity: &PlayerIdentity,
        queue: QueueType,
    ) -> impl Future<Output = Result<Option<LadderEntry>, RefreshError>> + Send;

    fn fetch_match_detail(
        &self,
        match_id: &MatchIdentity,
    ) -> impl Future<Output = Result<MatchDetail, RefreshError>> + Send;
}
