/// Line classifier
///
/// Pure checks over one snapshot's lines. Every check is case-sensitive
/// substring containment: no token boundaries, no fuzzy matching. OCR
/// noise can cause both false positives and misses; the stance qualifier
/// rule exists to rule out the one known false-positive battle line.
use crate::capture::Snapshot;
use crate::config::MarkerConfig;

/// True if any line contains `marker`
pub fn contains_marker(lines: &[String], marker: &str) -> bool {
    lines.iter().any(|line| line.contains(marker))
}

/// The line directly above the first line containing `battle` but not
/// `stance_qualifier`. `None` if there is no such line, it is the first line,
/// or the line above it is blank.
pub fn deck_name_before<'a>(
    lines: &'a [String],
    battle: &str,
    stance_qualifier: &str,
) -> Option<&'a str> {
    let i = lines
        .iter()
        .position(|line| line.contains(battle) && !line.contains(stance_qualifier))?;
    i.checked_sub(1)
        .map(|prev| lines[prev].as_str())
        .filter(|name| !name.is_empty())
}

/// What a single snapshot says, before any state is considered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signals {
    /// Deck extracted from a match-start screen
    pub match_start: Option<String>,
    pub victory: bool,
    pub defeat: bool,
}

impl Signals {
    pub fn is_empty(&self) -> bool {
        self.match_start.is_none() && !self.victory && !self.defeat
    }
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
    markers: MarkerConfig,
}

impl LineClassifier {
    pub fn new(markers: MarkerConfig) -> Self {
        Self { markers }
    }

    pub fn is_match_start(&self, lines: &[String]) -> bool {
        contains_marker(lines, &self.markers.match_start)
    }

    pub fn is_victory(&self, lines: &[String]) -> bool {
        contains_marker(lines, &self.markers.victory)
    }

    pub fn is_defeat(&self, lines: &[String]) -> bool {
        contains_marker(lines, &self.markers.defeat)
    }

    pub fn extract_deck_name<'a>(&self, lines: &'a [String]) -> Option<&'a str> {
        deck_name_before(lines, &self.markers.battle, &self.markers.stance_qualifier)
    }

    /// Evaluate every check against one snapshot
    pub fn classify(&self, snapshot: &Snapshot) -> Signals {
        let lines = snapshot.lines();
        let match_start = if self.is_match_start(lines) {
            self.extract_deck_name(lines).map(str::to_string)
        } else {
            None
        };

        Signals {
            match_start,
            victory: self.is_victory(lines),
            defeat: self.is_defeat(lines),
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(MarkerConfig::default())
    }
}
