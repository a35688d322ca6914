/// Match state machine
///
/// Holds the one piece of session state (which deck is in a match, if any)
/// and turns classified snapshots into counter updates.
///
/// Transitions, in priority order, evaluated once per snapshot:
/// 1. match start with an extracted deck -> `InMatch(deck)` from any state
/// 2. `InMatch(deck)` + victory -> count a win, persist, `Idle`
/// 3. `InMatch(deck)` + defeat -> count a loss, persist, `Idle`
/// 4. otherwise nothing
use super::classifier::{LineClassifier, Signals};
use crate::capture::Snapshot;
use crate::store::{CounterFile, DeckRecord, SharedStore};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatchState {
    /// No deck tracked
    #[default]
    Idle,
    /// A match with `deck` is in progress
    InMatch { deck: String },
}

impl MatchState {
    pub fn deck(&self) -> Option<&str> {
        match self {
            MatchState::Idle => None,
            MatchState::InMatch { deck } => Some(deck),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MatchState::Idle)
    }
}

/// Result of a resolved match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// What the state machine decided for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Start { deck: String },
    Resolve { deck: String, outcome: Outcome },
}

/// Pick the transition for `signals` given `state`, by fixed priority
pub fn next_transition(state: &MatchState, signals: &Signals) -> Option<Transition> {
    if let Some(deck) = &signals.match_start {
        return Some(Transition::Start { deck: deck.clone() });
    }

    let deck = state.deck()?;
    let outcome = if signals.victory {
        Outcome::Win
    } else if signals.defeat {
        Outcome::Loss
    } else {
        return None;
    };

    Some(Transition::Resolve {
        deck: deck.to_string(),
        outcome,
    })
}

/// Something that happened to the tracked match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    Started {
        deck: String,
        /// Deck of a match that was still in progress and got replaced
        replaced: Option<String>,
    },
    Won {
        record: DeckRecord,
    },
    Lost {
        record: DeckRecord,
    },
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::Started {
                deck,
                replaced: None,
            } => write!(f, "Match started with deck: {}", deck),
            MatchEvent::Started {
                deck,
                replaced: Some(old),
            } => write!(f, "Match started with deck: {} (replaces {})", deck, old),
            MatchEvent::Won { record } => write!(
                f,
                "Victory for deck: {} ({}-{})",
                record.name, record.wins, record.losses
            ),
            MatchEvent::Lost { record } => write!(
                f,
                "Defeat for deck: {} ({}-{})",
                record.name, record.wins, record.losses
            ),
        }
    }
}

/// Read-only mirror of the tracked deck, for the status page highlight
#[derive(Clone, Default)]
pub struct CurrentDeck {
    inner: Arc<RwLock<Option<String>>>,
}

impl CurrentDeck {
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    fn set(&self, deck: Option<&str>) {
        *self.inner.write() = deck.map(str::to_string);
    }
}

pub struct MatchTracker {
    classifier: LineClassifier,
    state: MatchState,
    store: SharedStore,
    file: CounterFile,
    current: CurrentDeck,
    persist_failed: bool,
}

impl MatchTracker {
    pub fn new(classifier: LineClassifier, store: SharedStore, file: CounterFile) -> Self {
        Self {
            classifier,
            state: MatchState::Idle,
            store,
            file,
            current: CurrentDeck::default(),
            persist_failed: false,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Handle for observers of the tracked deck
    pub fn current_deck(&self) -> CurrentDeck {
        self.current.clone()
    }

    /// Classify `snapshot` and apply the resulting transition, if any
    pub fn apply(&mut self, snapshot: &Snapshot) -> Option<MatchEvent> {
        let signals = self.classifier.classify(snapshot);
        if !signals.is_empty() {
            tracing::debug!(?signals, state = ?self.state, "Snapshot signals");
        }

        let transition = next_transition(&self.state, &signals)?;
        Some(self.execute(transition))
    }

    fn execute(&mut self, transition: Transition) -> MatchEvent {
        match transition {
            Transition::Start { deck } => {
                if self.store.update(|s| s.register(&deck)) {
                    tracing::debug!("First sighting of deck: {}", deck);
                }
                let replaced = self.state.deck().map(str::to_string);
                self.state = MatchState::InMatch { deck: deck.clone() };
                self.current.set(Some(&deck));
                MatchEvent::Started { deck, replaced }
            }
            Transition::Resolve { deck, outcome } => {
                let record = self.store.update(|s| match outcome {
                    Outcome::Win => s.record_win(&deck).clone(),
                    Outcome::Loss => s.record_loss(&deck).clone(),
                });
                self.state = MatchState::Idle;
                self.current.set(None);
                self.persist();
                match outcome {
                    Outcome::Win => MatchEvent::Won { record },
                    Outcome::Loss => MatchEvent::Lost { record },
                }
            }
        }
    }

    /// Rewrite the counter file from the store.
    ///
    /// Failures are logged and not returned: the next persist rewrites the
    /// whole file, which retries implicitly.
    pub fn persist(&mut self) -> bool {
        match self.store.read(|s| self.file.persist(s)) {
            Ok(()) => {
                if self.persist_failed {
                    tracing::info!("Counter file writable again: {}", self.file.path().display());
                }
                self.persist_failed = false;
                true
            }
            Err(e) => {
                tracing::error!("Failed to persist counters: {:#}", anyhow::Error::from(e));
                self.persist_failed = true;
                false
            }
        }
    }
}
