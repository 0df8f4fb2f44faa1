use popcorn_models::{UserRating, WatchedRecord, WatchedSummary};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use crate::observe::{Observable, SubscriptionId};
use crate::storage::{KeyValueStore, StorageError, StorageSlot};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("failed to save watched list: {0}")]
    Storage(#[from] StorageError),
}

/// The user's watched list, written through to storage on every change
///
/// The snapshot in storage always equals the in-memory list: a mutation
/// whose write fails is rolled back before the error is returned.
pub struct WatchlistManager {
    slot: StorageSlot<Vec<WatchedRecord>>,
    records: Observable<Vec<WatchedRecord>>,
}

impl WatchlistManager {
    /// Restore the list from `key` in `store` (empty if missing or malformed)
    pub fn restore(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let slot = StorageSlot::new(store, key);
        let records: Vec<WatchedRecord> = slot.load().unwrap_or_default();
        info!("Restored {} watched movies from '{}'", records.len(), slot.key());
        Self {
            slot,
            records: Observable::new(records),
        }
    }

    /// Append a record; returns `false` if its identifier is already present
    pub fn add(&self, record: WatchedRecord) -> Result<bool, WatchlistError> {
        let imdb_id = record.imdb_id.clone();
        let mut outcome: Result<bool, WatchlistError> = Ok(false);

        self.records.update_if(|records| {
            if records.iter().any(|r| r.imdb_id == record.imdb_id) {
                return false;
            }
            records.push(record);
            match self.slot.save(records) {
                Ok(()) => {
                    outcome = Ok(true);
                    true
                }
                Err(e) => {
                    records.pop();
                    outcome = Err(e.into());
                    false
                }
            }
        });

        match &outcome {
            Ok(true) => debug!("Added {} to watched list", imdb_id),
            Ok(false) => debug!("{} already in watched list, not adding", imdb_id),
            Err(_) => {}
        }
        outcome
    }

    /// Remove the record with `imdb_id`; returns `false` if it was not there
    pub fn remove(&self, imdb_id: &str) -> Result<bool, WatchlistError> {
        let mut outcome: Result<bool, WatchlistError> = Ok(false);

        self.records.update_if(|records| {
            let Some(index) = records.iter().position(|r| r.imdb_id == imdb_id) else {
                return false;
            };
            let removed = records.remove(index);
            match self.slot.save(records) {
                Ok(()) => {
                    outcome = Ok(true);
                    true
                }
                Err(e) => {
                    records.insert(index, removed);
                    outcome = Err(e.into());
                    false
                }
            }
        });

        if let Ok(true) = outcome {
            debug!("Removed {} from watched list", imdb_id);
        }
        outcome
    }

    pub fn records(&self) -> Vec<WatchedRecord> {
        self.records.get()
    }

    pub fn len(&self) -> usize {
        self.records.read(|r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.records.read(|r| r.iter().any(|m| m.imdb_id == imdb_id))
    }

    pub fn get(&self, imdb_id: &str) -> Option<WatchedRecord> {
        self.records.read(|r| r.iter().find(|m| m.imdb_id == imdb_id).cloned())
    }

    /// The rating given when the title was added
    pub fn user_rating_for(&self, imdb_id: &str) -> Option<UserRating> {
        self.get(imdb_id).map(|m| m.user_rating)
    }

    pub fn summary(&self) -> WatchedSummary {
        self.records.read(|r| WatchedSummary::from_records(r))
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<WatchedRecord>) + Send + Sync + 'static,
    {
        self.records.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, MemoryStore};

    fn record(id: &str, imdb: f64, user: u8, runtime: u32) -> WatchedRecord {
        WatchedRecord {
            imdb_id: id.to_string(),
            title: format!("Movie {}", id),
            year: "1999".to_string(),
            poster: String::new(),
            imdb_rating: Some(imdb),
            runtime: Some(runtime),
            user_rating: UserRating::new(user).unwrap(),
        }
    }

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    fn stored(store: &Arc<dyn KeyValueStore>) -> String {
        store.read("watched").unwrap().unwrap()
    }

    #[test]
    fn test_restore_empty_store() {
        let manager = WatchlistManager::restore(memory(), "watched");
        assert!(manager.is_empty());
    }

    #[test]
    fn test_restore_malformed_is_empty() {
        let store = memory();
        store.write("watched", "[{\"imdbID\": 12}]").unwrap();
        let manager = WatchlistManager::restore(store, "watched");
        assert!(manager.is_empty());
    }

    #[test]
    fn test_add_writes_snapshot() {
        let store = memory();
        let manager = WatchlistManager::restore(store.clone(), "watched");

        assert!(manager.add(record("tt1", 8.0, 9, 120)).unwrap());
        assert_eq!(stored(&store), serde_json::to_string(&manager.records()).unwrap());

        assert!(manager.add(record("tt2", 6.0, 7, 100)).unwrap());
        assert_eq!(stored(&store), serde_json::to_string(&manager.records()).unwrap());
        assert_eq!(manager.records()[1].imdb_id, "tt2");
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let store = memory();
        let manager = WatchlistManager::restore(store.clone(), "watched");
        manager.add(record("tt1", 8.0, 9, 120)).unwrap();
        let before = stored(&store);

        assert!(!manager.add(record("tt1", 5.0, 2, 90)).unwrap());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.user_rating_for("tt1").unwrap().value(), 9);
        assert_eq!(stored(&store), before);
    }

    #[test]
    fn test_remove_and_absent_remove() {
        let store = memory();
        let manager = WatchlistManager::restore(store.clone(), "watched");
        manager.add(record("tt1", 8.0, 9, 120)).unwrap();
        manager.add(record("tt2", 6.0, 7, 100)).unwrap();

        assert!(manager.remove("tt1").unwrap());
        assert!(!manager.contains("tt1"));
        assert_eq!(stored(&store), serde_json::to_string(&manager.records()).unwrap());

        let before = manager.records();
        assert!(!manager.remove("tt-missing").unwrap());
        assert_eq!(manager.records(), before);
    }

    #[test]
    fn test_reload_restores_last_state() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(dir.path()));
        {
            let manager = WatchlistManager::restore(store.clone(), "watched");
            manager.add(record("tt1", 8.0, 9, 120)).unwrap();
            manager.add(record("tt2", 6.0, 7, 100)).unwrap();
            manager.remove("tt1").unwrap();
        }

        let reloaded = WatchlistManager::restore(store, "watched");
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("tt2").unwrap(), record("tt2", 6.0, 7, 100));
    }

    #[test]
    fn test_summary() {
        let manager = WatchlistManager::restore(memory(), "watched");
        let empty = manager.summary();
        assert!(empty.avg_imdb_rating.is_nan());
        assert!(empty.avg_user_rating.is_nan());

        manager.add(record("tt1", 8.0, 9, 120)).unwrap();
        manager.add(record("tt2", 6.0, 7, 100)).unwrap();
        let summary = manager.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_imdb_rating, 7.0);
        assert_eq!(summary.avg_user_rating, 8.0);
        assert_eq!(summary.avg_runtime, 110.0);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let manager = WatchlistManager::restore(Arc::new(FailingStore), "watched");

        let err = manager.add(record("tt1", 8.0, 9, 120)).unwrap_err();
        assert!(matches!(err, WatchlistError::Storage(_)));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let manager = WatchlistManager::restore(memory(), "watched");
        let lengths = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = lengths.clone();
        manager.subscribe(move |records| sink.lock().unwrap().push(records.len()));

        manager.add(record("tt1", 8.0, 9, 120)).unwrap();
        manager.add(record("tt1", 8.0, 9, 120)).unwrap();
        manager.remove("tt-missing").unwrap();
        manager.remove("tt1").unwrap();

        assert_eq!(*lengths.lock().unwrap(), vec![1, 0]);
    }
}
