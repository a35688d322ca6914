// Integration tests for Deck Tally
// These drive the public API end to end: snapshots in, counters and the
// counter file out.

use crossbeam_channel::unbounded;
use deck_tally::capture::{ReplaySource, Snapshot, TextFragment};
use deck_tally::detection::{LineClassifier, MatchEvent, MatchState, MatchTracker};
use deck_tally::runner::CaptureLoop;
use deck_tally::status::{listing, StatusSource};
use deck_tally::store::{CounterFile, DeckRecord, SharedStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

struct Harness {
    _dir: TempDir,
    path: PathBuf,
    tracker: MatchTracker,
}

impl Harness {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck_stats.csv");
        Self::with_file(dir, path)
    }

    fn with_file(dir: TempDir, path: PathBuf) -> Self {
        let store = SharedStore::new(CounterFile::new(&path).load().unwrap());
        let tracker = MatchTracker::new(LineClassifier::default(), store, CounterFile::new(&path));
        Self {
            _dir: dir,
            path,
            tracker,
        }
    }

    fn feed(&mut self, lines: &[&str]) -> Option<MatchEvent> {
        self.tracker.apply(&Snapshot::from_lines(lines.iter().copied()))
    }

    fn file_content(&self) -> String {
        fs::read_to_string(&self.path).unwrap_or_default()
    }
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn scenario_a_deck_extracted_on_match_start() {
    let mut h = Harness::new();

    let event = h.feed(&["Dragon Deck", "Random Match Battle"]);

    assert_eq!(
        event,
        Some(MatchEvent::Started {
            deck: "Dragon Deck".to_string(),
            replaced: None
        })
    );
    assert_eq!(
        h.tracker.state(),
        &MatchState::InMatch {
            deck: "Dragon Deck".to_string()
        }
    );
}

#[test]
fn scenario_b_victory_counts_win() {
    let mut h = Harness::new();
    h.feed(&["Dragon Deck", "Random Match Battle"]);

    h.feed(&["Victory"]);

    assert_eq!(
        h.tracker.store().snapshot(),
        vec![DeckRecord::with_counts("Dragon Deck", 1, 0)]
    );
    assert_eq!(h.tracker.state(), &MatchState::Idle);
    assert_eq!(h.file_content(), "Dragon Deck,1,0\n");
}

#[test]
fn scenario_c_defeat_while_idle_does_nothing() {
    let mut h = Harness::new();

    assert_eq!(h.feed(&["Defeat"]), None);
    assert!(h.tracker.store().snapshot().is_empty());
    assert_eq!(h.tracker.state(), &MatchState::Idle);
}

#[test]
fn scenario_d_start_beats_victory_in_same_snapshot() {
    let mut h = Harness::new();
    h.feed(&["Old Deck", "Random Match Battle"]);

    let event = h.feed(&["Dragon Deck", "Random Match Battle", "Victory"]);

    assert!(matches!(event, Some(MatchEvent::Started { .. })));
    assert!(h.tracker.store().snapshot().is_empty());
    assert_eq!(h.tracker.state().deck(), Some("Dragon Deck"));
}

#[test]
fn scenario_e_stance_line_excluded() {
    let mut h = Harness::new();

    h.feed(&[
        "Battle stance",
        "Dragon Deck",
        "Random Match Battle",
    ]);

    assert_eq!(h.tracker.state().deck(), Some("Dragon Deck"));
}

#[test]
fn unordered_fragments_are_sorted_before_classification() {
    let mut h = Harness::new();
    let snapshot = Snapshot::from_fragments(vec![
        TextFragment::new("Random Match Battle", 300),
        TextFragment::new("Battle stance", 40),
        TextFragment::new("Dragon Deck", 260),
    ]);

    h.tracker.apply(&snapshot);

    assert_eq!(h.tracker.state().deck(), Some("Dragon Deck"));
}

#[test]
fn snapshots_without_markers_never_transition() {
    let mut h = Harness::new();
    let noise: &[&[&str]] = &[
        &["Turn 4", "Your move"],
        &["Dragon Deck", "Battle"],
        &["victory lap", "DEFEAT"],
        &[],
    ];

    for lines in noise {
        assert_eq!(h.feed(lines), None);
    }
    h.feed(&["Dragon Deck", "Random Match Battle"]);
    for lines in noise {
        assert_eq!(h.feed(lines), None);
    }

    assert_eq!(h.tracker.state().deck(), Some("Dragon Deck"));
    assert!(h.tracker.store().snapshot().is_empty());
    assert!(!h.path.exists());
}

#[test]
fn zero_activity_decks_never_persisted_or_listed() {
    let mut h = Harness::new();
    h.feed(&["Unplayed Deck", "Random Match Battle"]);
    h.feed(&["Dragon Deck", "Random Match Battle"]);
    h.feed(&["Defeat"]);

    assert!(h.tracker.store().read(|s| s.contains("Unplayed Deck")));
    assert!(!h.file_content().contains("Unplayed Deck"));

    let source = StatusSource::new(h.tracker.store().reader(), h.tracker.current_deck());
    let view = source.view();
    assert_eq!(view.decks.len(), 1);
    assert_eq!(view.decks[0].deck, "Dragon Deck");
}

#[test]
fn persist_twice_is_byte_identical() {
    let mut h = Harness::new();
    h.feed(&["Dragon Deck", "Random Match Battle"]);
    h.feed(&["Victory"]);
    h.feed(&["Spell, Deck", "Random Match Battle"]);
    h.feed(&["Defeat"]);

    let first = fs::read(&h.path).unwrap();
    assert!(h.tracker.persist());
    let second = fs::read(&h.path).unwrap();
    assert!(h.tracker.persist());
    let third = fs::read(&h.path).unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn load_then_persist_round_trips_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck_stats.csv");
    write(
        &path,
        "Dragon Deck,3,1\n\"Fire, Ice\",0,2\nbad row\nSpell Deck,x,1\nAggro,5,0\n",
    );

    let mut h = Harness::with_file(dir, path);
    assert!(h.tracker.persist());

    let mut rows: Vec<String> = h.file_content().lines().map(str::to_string).collect();
    rows.sort();
    assert_eq!(
        rows,
        vec![
            "\"Fire, Ice\",0,2".to_string(),
            "Aggro,5,0".to_string(),
            "Dragon Deck,3,1".to_string(),
        ]
    );
}

#[test]
fn history_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck_stats.csv");
    write(&path, "Dragon Deck,3,1\n");

    let mut h = Harness::with_file(dir, path);
    h.feed(&["Dragon Deck", "Random Match Battle"]);
    h.feed(&["Victory"]);

    assert_eq!(h.file_content(), "Dragon Deck,4,1\n");
    assert_eq!(
        listing(&h.tracker.store().snapshot())[0].win_rate,
        80
    );
}

#[test]
fn replay_file_drives_full_loop() {
    let dir = tempdir().unwrap();
    let replay_path = dir.path().join("session.txt");
    let data_path = dir.path().join("deck_stats.csv");
    write(
        &replay_path,
        "Dragon Deck\nRandom Match Battle\n\n--\n\n--\n\nTurn 1\n\n900|Victory\n100|Results\n\n\
         Battle stance\nSpell Deck\nRandom Match Battle\n\nDefeat\n\nDefeat\n",
    );

    let store = SharedStore::default();
    let tracker = MatchTracker::new(
        LineClassifier::default(),
        store.clone(),
        CounterFile::new(&data_path),
    );
    let source = ReplaySource::from_file(&replay_path).unwrap();
    let (_stop_tx, stop_rx) = unbounded();

    let (stats, tracker) = CaptureLoop::new(source, tracker, Duration::ZERO, stop_rx)
        .with_skip_warning(2)
        .run();

    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.events, 4);
    assert!(tracker.state().is_idle());
    assert_eq!(
        store.snapshot(),
        vec![
            DeckRecord::with_counts("Dragon Deck", 1, 0),
            DeckRecord::with_counts("Spell Deck", 0, 1),
        ]
    );
    assert_eq!(
        fs::read_to_string(&data_path).unwrap(),
        "Dragon Deck,1,0\nSpell Deck,0,1\n"
    );
}
