/// Counter store module
///
/// Per-deck win/loss counters, their shared in-process handle and the
/// persisted counter file.
///
/// ```text
/// SharedStore ── write ── capture loop (sole writer)
///      └──── StoreReader ── status publisher (read-only)
/// CounterFile ── load once at startup, full rewrite after every mutation
/// ```

pub mod counter;
pub mod file;
pub mod record;
pub mod shared;

pub use counter::CounterStore;
pub use file::CounterFile;
pub use record::DeckRecord;
pub use shared::{SharedStore, StoreReader};
