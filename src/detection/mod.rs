/// Detection module
///
/// Turns snapshots into match events.
///
/// ## Architecture
///
/// ```text
/// Snapshot
///   └── LineClassifier (stateless: which markers are on screen?)
///         └── MatchTracker (Idle / InMatch(deck), mutates counters)
///               └── MatchEvent
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let classifier = LineClassifier::new(config.markers.clone());
/// let mut tracker = MatchTracker::new(classifier, store, CounterFile::new(path));
///
/// if let Some(event) = tracker.apply(&snapshot) {
///     tracing::info!("{}", event);
/// }
/// ```

pub mod classifier;
pub mod tracker;

// Re-export commonly used types
pub use classifier::{LineClassifier, Signals};
pub use tracker::{CurrentDeck, MatchEvent, MatchState, MatchTracker};
