/// Status publisher
///
/// Read-only view of the counters for a live page. Only decks with at least
/// one resolved match are listed, in store order.
use crate::detection::tracker::CurrentDeck;
use crate::store::{DeckRecord, StoreReader};
use serde::Serialize;

pub mod render;
pub mod server;

pub use server::StatusServer;

/// One row of the status listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub deck: String,
    pub wins: u64,
    pub losses: u64,
    /// `wins * 100 / (wins + losses)`, integer division
    pub win_rate: u64,
}

impl StatusRow {
    /// `None` for decks without any resolved match
    pub fn from_record(record: &DeckRecord) -> Option<Self> {
        Some(Self {
            deck: record.name.clone(),
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate()?,
        })
    }
}

/// Consistent listing as seen at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub decks: Vec<StatusRow>,
    pub current_deck: Option<String>,
}

/// What the status server reads from
#[derive(Clone)]
pub struct StatusSource {
    store: StoreReader,
    current: CurrentDeck,
}

impl StatusSource {
    pub fn new(store: StoreReader, current: CurrentDeck) -> Self {
        Self { store, current }
    }

    pub fn view(&self) -> StatusView {
        StatusView {
            decks: listing(&self.store.snapshot()),
            current_deck: self.current.get(),
        }
    }
}

pub fn listing(records: &[DeckRecord]) -> Vec<StatusRow> {
    records.iter().filter_map(StatusRow::from_record).collect()
}
