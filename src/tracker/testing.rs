use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::api::LadderProvider;
use crate::config::TrackedPlayer;
use crate::domain::{MatchDetail, MatchIdentity, Participant, PlayerIdentity};
use crate::errors::{DataContractViolation, RefreshError};
use crate::notify::{Notifier, RankMessage};
use crate::rank::{LadderEntry, QueueType};

#[derive(Clone, Default)]
struct Script {
    entry: Option<LadderEntry>,
    latest_match: Option<String>,
    bad_tier: bool,
}

/// In-memory provider with scripted ladder data per puuid
#[derive(Default)]
pub struct FakeProvider {
    scripts: Mutex<HashMap<String, Script>>,
    delay: Mutex<Duration>,
    slow: Mutex<HashMap<String, Duration>>,
    fail_detail: AtomicBool,
    identity_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, puuid: &str, entry: Option<LadderEntry>, latest_match: Option<&str>) {
        self.scripts.lock().unwrap().insert(
            puuid.to_string(),
            Script {
                entry,
                latest_match: latest_match.map(str::to_string),
                bad_tier: false,
            },
        );
    }

    /// Make the ladder step for `puuid` return a tier the tables do not know.
    pub fn break_tier(&self, puuid: &str) {
        self.scripts
            .lock()
            .unwrap()
            .entry(puuid.to_string())
            .or_default()
            .bad_tier = true;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Delay only the identity step of `puuid`, overriding `set_delay`.
    pub fn slow_down(&self, puuid: &str, delay: Duration) {
        self.slow.lock().unwrap().insert(puuid.to_string(), delay);
    }

    pub fn fail_detail(&self, fail: bool) {
        self.fail_detail.store(fail, Ordering::SeqCst);
    }

    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    /// Most identity calls that were ever waiting at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn script(&self, puuid: &str) -> Option<Script> {
        self.scripts.lock().unwrap().get(puuid).cloned()
    }
}

impl LadderProvider for FakeProvider {
    async fn fetch_identity(&self, player: &TrackedPlayer) -> Result<PlayerIdentity, RefreshError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .slow
            .lock()
            .unwrap()
            .get(&player.puuid)
            .copied()
            .unwrap_or(*self.delay.lock().unwrap());
        if !delay.is_zero() {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        match self.script(&player.puuid) {
            Some(_) => Ok(PlayerIdentity {
                puuid: player.puuid.clone(),
            }),
            None => Err(RefreshError::NotFound(player.puuid.clone())),
        }
    }

    async fn fetch_latest_match_identity(
        &self,
        identity: &PlayerIdentity,
        _queue: QueueType,
    ) -> Result<Option<MatchIdentity>, RefreshError> {
        Ok(self
            .script(&identity.puuid)
            .and_then(|s| s.latest_match)
            .map(MatchIdentity::new))
    }

    async fn fetch_ladder_entry(
        &self,
        identity: &PlayerIdentity,
        _queue: QueueType,
    ) -> Result<Option<LadderEntry>, RefreshError> {
        let script = self.script(&identity.puuid).unwrap_or_default();
        if script.bad_tier {
            return Err(DataContractViolation::UnknownTier("MYTHIC".to_string()).into());
        }
        Ok(script.entry)
    }

    async fn fetch_match_detail(&self, _match_id: &MatchIdentity) -> Result<MatchDetail, RefreshError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("match service unavailable").into());
        }
        let participants = self
            .scripts
            .lock()
            .unwrap()
            .keys()
            .map(|puuid| Participant {
                puuid: puuid.clone(),
                champion: "Ahri".to_string(),
                kills: 5,
                deaths: 2,
                assists: 10,
                display_name: "Test User".to_string(),
                display_tag: "EUW".to_string(),
            })
            .collect();
        Ok(MatchDetail {
            duration_seconds: 1800,
            participants,
        })
    }
}

/// Notifier that keeps every message it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<RankMessage>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn messages(&self) -> Vec<RankMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, message: &RankMessage) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(message.clone());
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("webhook rejected the message");
        }
        Ok(())
    }
}
