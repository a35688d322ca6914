use super::counter::CounterStore;
use super::record::DeckRecord;
use parking_lot::RwLock;
use std::sync::Arc;

/// Counter store shared between the capture loop (sole writer) and the
/// status publisher (reader).
///
/// Every mutation happens inside one write guard, so a reader never sees a
/// record with wins updated but losses not.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<CounterStore>>,
}

impl SharedStore {
    pub fn new(store: CounterStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Apply a mutation under the write lock
    pub fn update<R>(&self, f: impl FnOnce(&mut CounterStore) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Run `f` against a consistent view of the store
    pub fn read<R>(&self, f: impl FnOnce(&CounterStore) -> R) -> R {
        f(&self.inner.read())
    }

    /// Copy of the active records, in store order
    pub fn snapshot(&self) -> Vec<DeckRecord> {
        self.read(|store| store.active_records().cloned().collect())
    }

    /// Read-only handle for observers
    pub fn reader(&self) -> StoreReader {
        StoreReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only view handed to the status publisher
#[derive(Clone)]
pub struct StoreReader {
    inner: Arc<RwLock<CounterStore>>,
}

impl StoreReader {
    pub fn snapshot(&self) -> Vec<DeckRecord> {
        self.inner.read().active_records().cloned().collect()
    }
}
