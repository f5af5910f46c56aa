use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::TrackedPlayer;
use crate::domain::MatchIdentity;
use crate::rank::{rank_by_score, LadderEntry, Standing};

/// Last committed view of a player's ladder standing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub entry: LadderEntry,
    pub last_match: Option<MatchIdentity>,
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(entry: LadderEntry, last_match: Option<MatchIdentity>) -> Self {
        Self {
            entry,
            last_match,
            refreshed_at: Utc::now(),
        }
    }
}

/// `Uninitialized` until the first complete refresh, `Tracked` from then on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Uninitialized,
    Tracked(Snapshot),
}

impl PlayerState {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            PlayerState::Uninitialized => None,
            PlayerState::Tracked(snapshot) => Some(snapshot),
        }
    }
}

/// A tracked player, its state, and whether a refresh is running for it.
#[derive(Debug)]
pub struct PlayerSlot {
    player: TrackedPlayer,
    state: RwLock<PlayerState>,
    in_flight: AtomicBool,
}

impl PlayerSlot {
    pub fn new(player: TrackedPlayer) -> Self {
        Self {
            player,
            state: RwLock::new(PlayerState::Uninitialized),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn player(&self) -> &TrackedPlayer {
        &self.player
    }

    pub fn state(&self) -> PlayerState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state().snapshot().cloned()
    }

    /// Claims the slot for one refresh. `None` while another refresh holds it.
    pub fn try_begin_refresh(self: &Arc<Self>) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { slot: Arc::clone(self) })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Replaces the committed state. Position and match id move together.
    pub(crate) fn commit(&self, snapshot: Snapshot) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = PlayerState::Tracked(snapshot);
    }
}

/// Releases the slot's in-flight flag when dropped, including on timeout or panic.
#[derive(Debug)]
pub struct InFlightGuard {
    slot: Arc<PlayerSlot>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.slot.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    #[serde(skip)]
    pub mention: String,
    #[serde(flatten)]
    pub entry: LadderEntry,
    pub games: u32,
}

/// Owned collection of player slots, in roster order
#[derive(Debug)]
pub struct PlayerRegistry {
    slots: Vec<Arc<PlayerSlot>>,
}

impl PlayerRegistry {
    pub fn new(players: Vec<TrackedPlayer>) -> Self {
        Self {
            slots: players.into_iter().map(|p| Arc::new(PlayerSlot::new(p))).collect(),
        }
    }

    pub fn slots(&self) -> &[Arc<PlayerSlot>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn tracked_count(&self) -> usize {
        self.slots.iter().filter(|s| s.snapshot().is_some()).count()
    }

    /// Tracked players ordered by global score; ties keep roster order.
    pub fn leaderboard(&self) -> Vec<Standing<LeaderboardRow>> {
        let rows = self.slots.iter().filter_map(|slot| {
            slot.snapshot().map(|snapshot| LeaderboardRow {
                name: slot.player().name.clone(),
                mention: slot.player().mention(),
                entry: snapshot.entry,
                games: snapshot.entry.games_played(),
            })
        });

        rank_by_score(rows, |row| row.entry.position)
    }
}
