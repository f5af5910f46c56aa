use log::debug;

use super::state::Snapshot;
use crate::api::LadderProvider;
use crate::config::TrackedPlayer;
use crate::domain::{MatchIdentity, Participant};
use crate::errors::RefreshError;
use crate::rank::{classify_change, LadderEntry, Outcome, QueueType};

/// A classified game worth telling the channel about
#[derive(Debug, Clone, PartialEq)]
pub struct RankEvent {
    pub player: TrackedPlayer,
    pub outcome: Outcome,
    pub previous: LadderEntry,
    pub current: LadderEntry,
    pub match_id: MatchIdentity,
    pub duration_seconds: u32,
    pub participant: Participant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// First complete refresh, nothing to diff against.
    Initialized,
    NoNewMatch,
    Classified(Outcome),
}

/// Everything fetched for one player, not yet committed.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub pending: Snapshot,
    pub kind: RefreshKind,
    pub event: Option<RankEvent>,
}

/// Runs one player's fetch sequence: identity, latest match id, ladder entry,
/// and the match detail when a classified game will be announced.
///
/// Nothing is written here. The caller commits `pending` only on `Ok`.
pub async fn refresh_player<P: LadderProvider>(
    provider: &P,
    player: &TrackedPlayer,
    previous: Option<&Snapshot>,
    queue: QueueType,
) -> Result<RefreshResult, RefreshError> {
    let identity = provider.fetch_identity(player).await?;
    let latest_match = provider.fetch_latest_match_identity(&identity, queue).await?;
    let entry = provider
        .fetch_ladder_entry(&identity, queue)
        .await?
        .unwrap_or_else(LadderEntry::unranked);

    debug!("{}: {} (last match {:?})", player.name, entry.position, latest_match);

    // An empty history keeps the last known match so it is not replayed later.
    let last_match = latest_match
        .clone()
        .or_else(|| previous.and_then(|p| p.last_match.clone()));
    let pending = Snapshot::new(entry, last_match);

    let Some(previous) = previous else {
        return Ok(RefreshResult {
            pending,
            kind: RefreshKind::Initialized,
            event: None,
        });
    };

    let outcome = match (&latest_match, match_changed(previous, &latest_match)) {
        (Some(match_id), true) => classify_change(&previous.entry.position, &entry.position, true)
            .map(|outcome| (match_id.clone(), outcome)),
        _ => None,
    };

    let Some((match_id, outcome)) = outcome else {
        return Ok(RefreshResult {
            pending,
            kind: RefreshKind::NoNewMatch,
            event: None,
        });
    };

    let event = if is_announceable(&previous.entry, &entry, &outcome) {
        let detail = provider.fetch_match_detail(&match_id).await?;
        let participant = detail
            .participant(&identity.puuid)
            .cloned()
            .ok_or_else(|| RefreshError::NotFound(format!("{} in match {}", player.name, match_id)))?;

        Some(RankEvent {
            player: player.clone(),
            outcome,
            previous: previous.entry,
            current: entry,
            match_id,
            duration_seconds: detail.duration_seconds,
            participant,
        })
    } else {
        None
    };

    Ok(RefreshResult {
        pending,
        kind: RefreshKind::Classified(outcome),
        event,
    })
}

/// A newer match id counts as a new game; losing the history does not.
fn match_changed(previous: &Snapshot, latest: &Option<MatchIdentity>) -> bool {
    latest.is_some() && previous.last_match != *latest
}

/// Remakes never reach the channel, nor do placement games that leave
/// the player unranked on both sides.
fn is_announceable(previous: &LadderEntry, current: &LadderEntry, outcome: &Outcome) -> bool {
    !outcome.is_remake() && !(previous.position.is_unranked() && current.position.is_unranked())
}
