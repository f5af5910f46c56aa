use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout, MissedTickBehavior};

use super::refresh::{refresh_player, RefreshKind};
use super::state::{InFlightGuard, PlayerRegistry, PlayerSlot};
use crate::api::LadderProvider;
use crate::config::settings::TrackerSettings;
use crate::errors::RefreshError;
use crate::notify::{MessageComposer, Notifier};
use crate::rank::QueueType;

/// How a sweep paces the provider
#[derive(Debug, Clone)]
pub struct SweepPolicy {
    /// Refreshes allowed to run at the same time.
    pub concurrency: usize,
    /// Pause before starting each refresh after the first one of a sweep.
    pub inter_player_delay: Duration,
    /// Deadline for one player's whole fetch sequence.
    pub refresh_timeout: Duration,
}

impl SweepPolicy {
    /// One player at a time with a fixed pause in between.
    pub fn sequential(inter_player_delay: Duration, refresh_timeout: Duration) -> Self {
        Self {
            concurrency: 1,
            inter_player_delay,
            refresh_timeout,
        }
    }
}

impl From<&TrackerSettings> for SweepPolicy {
    fn from(settings: &TrackerSettings) -> Self {
        Self {
            concurrency: settings.concurrency.max(1),
            inter_player_delay: Duration::from_millis(settings.inter_player_delay_ms),
            refresh_timeout: Duration::from_secs(settings.refresh_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub initialized: usize,
    pub unchanged: usize,
    pub classified: usize,
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Cycle {
    Initialized,
    Unchanged,
    Classified { notified: bool },
    Failed,
}

/// Periodic driver that refreshes every tracked player
pub struct TrackerService<P, N> {
    provider: Arc<P>,
    notifier: Arc<N>,
    registry: Arc<PlayerRegistry>,
    composer: Arc<MessageComposer>,
    policy: SweepPolicy,
    queue: QueueType,
}

impl<P, N> Clone for TrackerService<P, N> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            notifier: Arc::clone(&self.notifier),
            registry: Arc::clone(&self.registry),
            composer: Arc::clone(&self.composer),
            policy: self.policy.clone(),
            queue: self.queue,
        }
    }
}

impl<P, N> TrackerService<P, N>
where
    P: LadderProvider + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        provider: Arc<P>,
        notifier: Arc<N>,
        registry: Arc<PlayerRegistry>,
        composer: MessageComposer,
        policy: SweepPolicy,
        queue: QueueType,
    ) -> Self {
        Self {
            provider,
            notifier,
            registry,
            composer: Arc::new(composer),
            policy,
            queue,
        }
    }

    pub fn registry(&self) -> &Arc<PlayerRegistry> {
        &self.registry
    }

    /// Sweeps forever at `interval`. Each sweep runs detached so a slow one
    /// never delays the next tick; players still busy are skipped.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the caller already ran the initial sweep.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let tracker = self.clone();
            tokio::spawn(async move {
                tracker.sweep().await;
            });
        }
    }

    /// Refreshes every player once and waits for all of them.
    pub async fn sweep(&self) -> SweepReport {
        info!("Tracking {} players...", self.registry.len());

        let semaphore = Arc::new(Semaphore::new(self.policy.concurrency.max(1)));
        let mut tasks = JoinSet::new();
        let mut report = SweepReport::default();
        let mut started = 0usize;

        for slot in self.registry.slots() {
            let Some(guard) = slot.try_begin_refresh() else {
                warn!("Skipping {}: previous refresh still running", slot.player().name);
                report.skipped += 1;
                continue;
            };

            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            if started > 0 && !self.policy.inter_player_delay.is_zero() {
                tokio::time::sleep(self.policy.inter_player_delay).await;
            }
            started += 1;

            let tracker = self.clone();
            let slot = Arc::clone(slot);
            tasks.spawn(async move {
                let _permit = permit;
                tracker.run_cycle(&slot, guard).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Cycle::Initialized) => report.initialized += 1,
                Ok(Cycle::Unchanged) => report.unchanged += 1,
                Ok(Cycle::Classified { notified }) => {
                    report.classified += 1;
                    if notified {
                        report.notified += 1;
                    }
                }
                Ok(Cycle::Failed) => report.failed += 1,
                Err(e) => {
                    error!("Refresh task aborted: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Sweep done: {} initialized, {} unchanged, {} classified, {} notified, {} skipped, {} failed",
            report.initialized, report.unchanged, report.classified, report.notified, report.skipped, report.failed
        );
        report
    }

    async fn run_cycle(&self, slot: &PlayerSlot, _guard: InFlightGuard) -> Cycle {
        let player = slot.player();
        let previous = slot.snapshot();

        let refreshed = timeout(
            self.policy.refresh_timeout,
            refresh_player(self.provider.as_ref(), player, previous.as_ref(), self.queue),
        )
        .await
        .unwrap_or(Err(RefreshError::TimedOut(self.policy.refresh_timeout)));

        let result = match refreshed {
            Ok(result) => result,
            Err(e) => {
                log_refresh_error(&player.name, &e);
                return Cycle::Failed;
            }
        };

        slot.commit(result.pending);

        match result.kind {
            RefreshKind::Initialized => {
                info!("{} initialized at {}", player.name, result_position(slot));
                Cycle::Initialized
            }
            RefreshKind::NoNewMatch => {
                debug!("{}: no new match", player.name);
                Cycle::Unchanged
            }
            RefreshKind::Classified(outcome) => {
                info!(
                    "{}: {} ({:?}, {:+} LP) now {}",
                    player.name,
                    outcome.result,
                    outcome.change,
                    outcome.lp_delta,
                    result_position(slot)
                );
                let notified = match result.event {
                    Some(event) => {
                        let message = self.composer.compose(&event);
                        match self.notifier.send(&message).await {
                            Ok(()) => true,
                            Err(e) => {
                                warn!("Failed to notify {} for {}: {:#}", player.name, event.match_id, e);
                                false
                            }
                        }
                    }
                    None => false,
                };
                Cycle::Classified { notified }
            }
        }
    }
}

fn result_position(slot: &PlayerSlot) -> String {
    slot.snapshot()
        .map(|s| s.entry.position.to_string())
        .unwrap_or_default()
}

fn log_refresh_error(name: &str, err: &RefreshError) {
    if err.is_contract_violation() {
        error!("Tracking error of {}: {} (tier/division tables out of date?)", name, err);
    } else {
        warn!("Tracking error of {}: {}", name, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackedPlayer;
    use crate::domain::MatchIdentity;
    use crate::rank::{Division, LadderEntry, LadderPosition, Tier};
    use crate::tracker::state::PlayerState;
    use crate::tracker::testing::{FakeProvider, RecordingNotifier};

    fn gold(division: Division, lp: u32) -> LadderEntry {
        LadderEntry::new(LadderPosition::new(Tier::Gold, Some(division), lp).unwrap(), 10, 10)
    }

    fn fast_policy(concurrency: usize) -> SweepPolicy {
        SweepPolicy {
            concurrency,
            inter_player_delay: Duration::ZERO,
            refresh_timeout: Duration::from_secs(5),
        }
    }

    fn tracker(
        provider: Arc<FakeProvider>,
        notifier: Arc<RecordingNotifier>,
        players: Vec<TrackedPlayer>,
        policy: SweepPolicy,
    ) -> TrackerService<FakeProvider, RecordingNotifier> {
        TrackerService::new(
            provider,
            notifier,
            Arc::new(PlayerRegistry::new(players)),
            MessageComposer::new("euw"),
            policy,
            QueueType::RankedSolo,
        )
    }

    #[tokio::test]
    async fn test_initial_sweep_then_lp_gain() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::new());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        let tracker = tracker(
            provider.clone(),
            notifier.clone(),
            vec![TrackedPlayer::new("One", "p1")],
            fast_policy(1),
        );

        let report = tracker.sweep().await;
        assert_eq!(report.initialized, 1);
        assert!(notifier.messages().is_empty());

        provider.set("p1", Some(gold(Division::Four, 70)), Some("EUW1_2"));
        let report = tracker.sweep().await;
        assert_eq!(report.classified, 1);
        assert_eq!(report.notified, 1);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].title, "VICTORY");

        let snapshot = tracker.registry().slots()[0].snapshot().unwrap();
        assert_eq!(snapshot.entry, gold(Division::Four, 70));
        assert_eq!(snapshot.last_match, Some(MatchIdentity::new("EUW1_2")));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_state() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::new());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        let tracker = tracker(
            provider.clone(),
            notifier.clone(),
            vec![TrackedPlayer::new("One", "p1")],
            fast_policy(1),
        );
        tracker.sweep().await;
        let before = tracker.registry().slots()[0].state();

        provider.set("p1", Some(gold(Division::Four, 70)), Some("EUW1_2"));
        provider.fail_detail(true);
        let report = tracker.sweep().await;

        assert_eq!(report.failed, 1);
        assert_eq!(tracker.registry().slots()[0].state(), before);
        assert!(notifier.messages().is_empty());

        // Retried cleanly from the last good position on the next sweep
        provider.fail_detail(false);
        let report = tracker.sweep().await;
        assert_eq!(report.notified, 1);
        assert_eq!(notifier.messages()[0].title, "VICTORY");
    }

    #[tokio::test]
    async fn test_one_failing_player_does_not_affect_others() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::new());
        provider.set("p1", Some(gold(Division::Two, 10)), Some("EUW1_1"));
        provider.set("p3", Some(gold(Division::One, 10)), Some("EUW1_9"));
        provider.break_tier("p3");
        let tracker = tracker(
            provider.clone(),
            notifier,
            vec![
                TrackedPlayer::new("One", "p1"),
                TrackedPlayer::new("Missing", "p2"),
                TrackedPlayer::new("Broken", "p3"),
            ],
            fast_policy(3),
        );

        let report = tracker.sweep().await;
        assert_eq!(report.initialized, 1);
        assert_eq!(report.failed, 2);

        let slots = tracker.registry().slots();
        assert!(slots[0].snapshot().is_some());
        assert_eq!(slots[1].state(), PlayerState::Uninitialized);
        assert_eq!(slots[2].state(), PlayerState::Uninitialized);
    }

    #[tokio::test]
    async fn test_remake_is_not_notified() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::new());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        let tracker = tracker(
            provider.clone(),
            notifier.clone(),
            vec![TrackedPlayer::new("One", "p1")],
            fast_policy(1),
        );
        tracker.sweep().await;

        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_2"));
        let report = tracker.sweep().await;
        assert_eq!(report.classified, 1);
        assert_eq!(report.notified, 0);
        assert!(notifier.messages().is_empty());
        assert_eq!(
            tracker.registry().slots()[0].snapshot().unwrap().last_match,
            Some(MatchIdentity::new("EUW1_2"))
        );
    }

    #[tokio::test]
    async fn test_notification_failure_still_commits() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::failing());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        let tracker = tracker(
            provider.clone(),
            notifier,
            vec![TrackedPlayer::new("One", "p1")],
            fast_policy(1),
        );
        tracker.sweep().await;

        provider.set("p1", Some(gold(Division::Four, 30)), Some("EUW1_2"));
        let report = tracker.sweep().await;
        assert_eq!(report.classified, 1);
        assert_eq!(report.notified, 0);
        assert_eq!(tracker.registry().slots()[0].snapshot().unwrap().entry, gold(Division::Four, 30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_times_out() {
        let provider = Arc::new(FakeProvider::new());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        provider.set_delay(Duration::from_secs(60));
        let policy = SweepPolicy {
            refresh_timeout: Duration::from_secs(1),
            ..fast_policy(1)
        };
        let tracker = tracker(
            provider,
            Arc::new(RecordingNotifier::new()),
            vec![TrackedPlayer::new("One", "p1")],
            policy,
        );

        let report = tracker.sweep().await;
        assert_eq!(report.failed, 1);
        let slot = &tracker.registry().slots()[0];
        assert_eq!(slot.state(), PlayerState::Uninitialized);
        assert!(!slot.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_player_still_in_flight_is_skipped() {
        let provider = Arc::new(FakeProvider::new());
        provider.set("p1", Some(gold(Division::Four, 50)), Some("EUW1_1"));
        provider.set("p2", Some(gold(Division::Four, 60)), Some("EUW1_5"));
        let tracker = tracker(
            provider.clone(),
            Arc::new(RecordingNotifier::new()),
            vec![TrackedPlayer::new("One", "p1"), TrackedPlayer::new("Two", "p2")],
            fast_policy(2),
        );

        let held = tracker.registry().slots()[0].try_begin_refresh().unwrap();
        let report = tracker.sweep().await;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.initialized, 1);
        assert_eq!(provider.identity_calls(), 1);

        drop(held);
        let report = tracker.sweep().await;
        assert_eq!(report.skipped, 0);
        assert_eq!(report.initialized, 1);
        assert_eq!(report.unchanged, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_policy_spaces_players() {
        let provider = Arc::new(FakeProvider::new());
        for puuid in ["p1", "p2", "p3"] {
            provider.set(puuid, Some(gold(Division::Four, 10)), Some("EUW1_1"));
        }
        let tracker = tracker(
            provider,
            Arc::new(RecordingNotifier::new()),
            vec![
                TrackedPlayer::new("One", "p1"),
                TrackedPlayer::new("Two", "p2"),
                TrackedPlayer::new("Three", "p3"),
            ],
            SweepPolicy::sequential(Duration::from_millis(1500), Duration::from_secs(5)),
        );

        let start = tokio::time::Instant::now();
        let report = tracker.sweep().await;
        assert_eq!(report.initialized, 3);
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipped_player_does_not_delay_the_next() {
        let provider = Arc::new(FakeProvider::new());
        provider.set("p1", Some(gold(Division::Four, 10)), Some("EUW1_1"));
        provider.set("p2", Some(gold(Division::Four, 20)), Some("EUW1_2"));
        let tracker = tracker(
            provider,
            Arc::new(RecordingNotifier::new()),
            vec![TrackedPlayer::new("One", "p1"), TrackedPlayer::new("Two", "p2")],
            SweepPolicy::sequential(Duration::from_millis(1500), Duration::from_secs(5)),
        );

        let _held = tracker.registry().slots()[0].try_begin_refresh().unwrap();
        let start = tokio::time::Instant::now();
        let report = tracker.sweep().await;

        assert_eq!(report.skipped, 1);
        assert_eq!(report.initialized, 1);
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_match_history_gap_does_not_replay_old_match() {
        let provider = Arc::new(FakeProvider::new());
        let notifier = Arc::new(RecordingNotifier::new());
        provider.set("p1", Some(gold(Division::Four, 0)), Some("EUW1_1"));
        let tracker = tracker(
            provider.clone(),
            notifier.clone(),
            vec![TrackedPlayer::new("One", "p1")],
            fast_policy(1),
        );
        tracker.sweep().await;

        provider.set("p1", Some(gold(Division::Four, 0)), None);
        let report = tracker.sweep().await;
        assert_eq!(report.unchanged, 1);
        assert_eq!(
            tracker.registry().slots()[0].snapshot().unwrap().last_match,
            Some(MatchIdentity::new("EUW1_1"))
        );

        provider.set("p1", Some(gold(Division::Four, 0)), Some("EUW1_1"));
        let report = tracker.sweep().await;
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.classified, 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bounds_parallel_refreshes() {
        let provider = Arc::new(FakeProvider::new());
        for puuid in ["p1", "p2", "p3", "p4"] {
            provider.set(puuid, Some(gold(Division::Four, 10)), Some("EUW1_1"));
        }
        provider.set_delay(Duration::from_secs(1));
        let tracker = tracker(
            provider.clone(),
            Arc::new(RecordingNotifier::new()),
            vec![
                TrackedPlayer::new("One", "p1"),
                TrackedPlayer::new("Two", "p2"),
                TrackedPlayer::new("Three", "p3"),
                TrackedPlayer::new("Four", "p4"),
            ],
            fast_policy(2),
        );

        let start = tokio::time::Instant::now();
        let report = tracker.sweep().await;

        assert_eq!(report.initialized, 4);
        assert_eq!(provider.peak_in_flight(), 2);
        // Two rounds of two, not four one after another
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_starts_sweeps_without_waiting_for_slow_ones() {
        let provider = Arc::new(FakeProvider::new());
        provider.set("p1", Some(gold(Division::Four, 10)), Some("EUW1_1"));
        provider.set("p2", Some(gold(Division::Four, 20)), Some("EUW1_2"));
        provider.slow_down("p1", Duration::from_secs(25));
        let policy = SweepPolicy {
            refresh_timeout: Duration::from_secs(60),
            ..fast_policy(2)
        };
        let tracker = tracker(
            provider.clone(),
            Arc::new(RecordingNotifier::new()),
            vec![TrackedPlayer::new("Slow", "p1"), TrackedPlayer::new("Fast", "p2")],
            policy,
        );

        let driver = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.run(Duration::from_secs(10)).await })
        };

        // Ticks at 10s and 20s; the first sweep's p1 refresh runs until 35s
        tokio::time::sleep(Duration::from_secs(21)).await;
        let slots = tracker.registry().slots();
        assert!(slots[0].is_in_flight());
        assert_eq!(slots[0].state(), PlayerState::Uninitialized);
        assert!(slots[1].snapshot().is_some());
        // p1 once, p2 on both ticks: the second sweep skipped p1
        assert_eq!(provider.identity_calls(), 3);

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert!(!slots[0].is_in_flight());
        assert!(slots[0].snapshot().is_some());

        driver.abort();
    }

    #[test]
    fn test_policy_from_settings() {
        let policy = SweepPolicy::from(&TrackerSettings {
            concurrency: 0,
            ..TrackerSettings::default()
        });
        assert_eq!(policy.concurrency, 1);
        assert_eq!(policy.inter_player_delay, Duration::from_millis(1500));
        assert_eq!(policy.refresh_timeout, Duration::from_secs(30));
    }
}
