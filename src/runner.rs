/// Capture loop
///
/// Drives acquisition -> classification -> state machine at a fixed cadence
/// until a stop signal arrives or the source runs dry, then flushes the
/// counters one last time.
use crate::capture::{Acquisition, SnapshotSource};
use crate::detection::MatchTracker;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub captured: u64,
    pub skipped: u64,
    pub events: u64,
}

/// Tracks consecutive skipped cycles and says when to warn about them
#[derive(Debug)]
struct SkipStreak {
    threshold: u32,
    count: u32,
}

impl SkipStreak {
    fn new(threshold: u32) -> Self {
        Self {
            threshold,
            count: 0,
        }
    }

    /// Record a skipped cycle. True exactly once per streak, when it reaches the threshold.
    fn skip(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.threshold > 0 && self.count == self.threshold
    }

    /// Record a successful acquisition. Returns the length of the streak it ended.
    fn reset(&mut self) -> u32 {
        std::mem::take(&mut self.count)
    }
}

pub struct CaptureLoop<S: SnapshotSource> {
    source: S,
    tracker: MatchTracker,
    delay: Duration,
    shutdown: Receiver<()>,
    streak: SkipStreak,
}

impl<S: SnapshotSource> CaptureLoop<S> {
    pub fn new(source: S, tracker: MatchTracker, delay: Duration, shutdown: Receiver<()>) -> Self {
        Self {
            source,
            tracker,
            delay,
            shutdown,
            streak: SkipStreak::new(0),
        }
    }

    /// Warn after this many consecutive skipped cycles (0 disables)
    pub fn with_skip_warning(mut self, threshold: u32) -> Self {
        self.streak = SkipStreak::new(threshold);
        self
    }

    /// Run until stopped. Always ends with a persist of the current counters.
    pub fn run(mut self) -> (LoopStats, MatchTracker) {
        let mut stats = LoopStats::default();
        let started = Instant::now();

        tracing::info!(
            "Capture loop started (source: {}, delay: {}ms)",
            self.source.name(),
            self.delay.as_millis()
        );

        loop {
            stats.cycles += 1;

            match self.source.acquire() {
                Ok(Acquisition::Captured(snapshot)) if !snapshot.is_empty() => {
                    stats.captured += 1;
                    let ended = self.streak.reset();
                    if ended >= self.streak.threshold && self.streak.threshold > 0 {
                        tracing::info!("Capture resumed after {} skipped cycle(s)", ended);
                    }

                    tracing::debug!(lines = ?snapshot.lines(), "Snapshot");
                    if let Some(event) = self.tracker.apply(&snapshot) {
                        stats.events += 1;
                        tracing::info!("{}", event);
                    }
                }
                Ok(Acquisition::Captured(_)) | Ok(Acquisition::Unavailable) => {
                    stats.skipped += 1;
                    self.note_skip();
                }
                Ok(Acquisition::Finished) => {
                    tracing::info!("Source '{}' has no more frames", self.source.name());
                    break;
                }
                Err(e) => {
                    stats.skipped += 1;
                    tracing::warn!("Acquisition failed: {:#}", anyhow::Error::from(e));
                    self.note_skip();
                }
            }

            if self.wait_for_stop() {
                tracing::info!("Stop requested");
                break;
            }
        }

        // Drain: whatever is in memory goes to disk before we return
        self.tracker.persist();

        tracing::info!(
            "Capture loop stopped after {:.1}s: {} cycle(s), {} captured, {} skipped, {} event(s)",
            started.elapsed().as_secs_f64(),
            stats.cycles,
            stats.captured,
            stats.skipped,
            stats.events
        );

        (stats, self.tracker)
    }

    fn note_skip(&mut self) {
        if self.streak.skip() {
            tracing::warn!(
                "No usable capture for {} consecutive cycle(s); is the target window open and focused?",
                self.streak.threshold
            );
        }
    }

    /// Sleep for one cycle delay, returning early with `true` on a stop signal
    fn wait_for_stop(&self) -> bool {
        match self.shutdown.recv_timeout(self.delay) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                // Nobody can signal us any more; keep pacing
                std::thread::sleep(self.delay);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{ReplaySource, Snapshot};
    use crate::detection::LineClassifier;
    use crate::error::CaptureError;
    use crate::store::{CounterFile, DeckRecord, SharedStore};
    use crossbeam_channel::unbounded;
    use tempfile::tempdir;

    fn tracker(path: &std::path::Path) -> MatchTracker {
        MatchTracker::new(
            LineClassifier::default(),
            SharedStore::default(),
            CounterFile::new(path),
        )
    }

    #[test]
    fn test_skip_streak_warns_once() {
        let mut streak = SkipStreak::new(3);
        assert!(!streak.skip());
        assert!(!streak.skip());
        assert!(streak.skip());
        assert!(!streak.skip());
        assert_eq!(streak.reset(), 4);
        assert!(!streak.skip());
    }

    #[test]
    fn test_skip_streak_disabled() {
        let mut streak = SkipStreak::new(0);
        for _ in 0..10 {
            assert!(!streak.skip());
        }
    }

    #[test]
    fn test_replay_runs_to_completion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck_stats.csv");
        let (_tx, rx) = unbounded();

        let source = ReplaySource::from_frames(vec![
            Some(Snapshot::from_lines(["Dragon Deck", "Random Match Battle"])),
            None,
            Some(Snapshot::from_lines(["Victory"])),
            Some(Snapshot::from_lines(["Spell Deck", "Random Match Battle"])),
            Some(Snapshot::from_lines(["Defeat"])),
        ]);

        let (stats, tracker) = CaptureLoop::new(source, tracker(&path), Duration::ZERO, rx).run();

        assert_eq!(
            stats,
            LoopStats {
                cycles: 6,
                captured: 4,
                skipped: 1,
                events: 4
            }
        );
        assert_eq!(
            tracker.store().snapshot(),
            vec![
                DeckRecord::with_counts("Dragon Deck", 1, 0),
                DeckRecord::with_counts("Spell Deck", 0, 1),
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Dragon Deck,1,0\nSpell Deck,0,1\n"
        );
    }

    struct FailingSource {
        remaining: u32,
    }

    impl SnapshotSource for FailingSource {
        fn acquire(&mut self) -> Result<Acquisition, CaptureError> {
            if self.remaining == 0 {
                return Ok(Acquisition::Finished);
            }
            self.remaining -= 1;
            Err(CaptureError::CaptureFailed {
                title: "Game".to_string(),
                source: "boom".into(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_acquisition_errors_are_skipped() {
        let dir = tempdir().unwrap();
        let (_tx, rx) = unbounded();
        let source = FailingSource { remaining: 5 };

        let (stats, _) = CaptureLoop::new(
            source,
            tracker(&dir.path().join("deck_stats.csv")),
            Duration::ZERO,
            rx,
        )
        .with_skip_warning(2)
        .run();

        assert_eq!(stats.skipped, 5);
        assert_eq!(stats.events, 0);
    }

    struct EndlessSource;

    impl SnapshotSource for EndlessSource {
        fn acquire(&mut self) -> Result<Acquisition, CaptureError> {
            Ok(Acquisition::Unavailable)
        }

        fn name(&self) -> &'static str {
            "endless"
        }
    }

    #[test]
    fn test_stop_signal_ends_loop_with_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck_stats.csv");
        let (tx, rx) = unbounded();

        let tracker = tracker(&path);
        tracker.store().update(|s| {
            s.record_win("Dragon Deck");
        });

        tx.send(()).unwrap();
        let (stats, _) =
            CaptureLoop::new(EndlessSource, tracker, Duration::from_secs(60), rx).run();

        assert_eq!(stats.cycles, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Dragon Deck,1,0\n");
    }
}
