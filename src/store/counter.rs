/// In-memory counter store
///
/// Deck name -> (wins, losses), in first-seen order so the status page and
/// the counter file list decks in a stable order.
use super::record::DeckRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CounterStore {
    records: Vec<DeckRecord>,
    index: HashMap<String, usize>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded rows. A later row for the same deck
    /// replaces the earlier one but keeps its position.
    pub fn from_records(records: impl IntoIterator<Item = DeckRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            let slot = store.entry(&record.name);
            slot.wins = record.wins;
            slot.losses = record.losses;
        }
        store
    }

    pub fn get(&self, deck: &str) -> Option<&DeckRecord> {
        self.index.get(deck).map(|&i| &self.records[i])
    }

    pub fn contains(&self, deck: &str) -> bool {
        self.index.contains_key(deck)
    }

    /// Ensure a zero record exists for `deck`. Returns `true` if it was created.
    pub fn register(&mut self, deck: &str) -> bool {
        if self.contains(deck) {
            return false;
        }
        self.entry(deck);
        true
    }

    /// Count one win for `deck`, creating its record if unseen
    pub fn record_win(&mut self, deck: &str) -> &DeckRecord {
        let record = self.entry(deck);
        record.wins = record.wins.saturating_add(1);
        record
    }

    /// Count one loss for `deck`, creating its record if unseen
    pub fn record_loss(&mut self, deck: &str) -> &DeckRecord {
        let record = self.entry(deck);
        record.losses = record.losses.saturating_add(1);
        record
    }

    /// All records, including decks seen without any resolved match
    pub fn records(&self) -> impl Iterator<Item = &DeckRecord> {
        self.records.iter()
    }

    /// Records eligible for persistence and display
    pub fn active_records(&self) -> impl Iterator<Item = &DeckRecord> {
        self.records.iter().filter(|r| r.has_activity())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn entry(&mut self, deck: &str) -> &mut DeckRecord {
        let i = match self.index.get(deck) {
            Some(&i) => i,
            None => {
                self.records.push(DeckRecord::new(deck));
                let i = self.records.len() - 1;
                self.index.insert(deck.to_string(), i);
                i
            }
        };
        &mut self.records[i]
    }
}
