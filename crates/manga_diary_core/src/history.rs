//! crates/manga_diary_core/src/history.rs
//!
//! The bounded, persisted list of past generations.
//!
//! The whole list lives under one key of a `KeyValueStore` as a JSON array,
//! most recent first. Every mutation rewrites the record before returning.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::HistoryItem;
use crate::ports::{KeyValueStore, PortError, PortResult};

/// The key the history record is stored under.
pub const HISTORY_KEY: &str = "manga_diary.history";

/// Maximum number of items kept. Older items are discarded, not hidden.
pub const HISTORY_CAPACITY: usize = 2;

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    items: Vec<HistoryItem>,
}

impl HistoryStore {
    /// Loads the persisted list. Absent, unreadable or corrupt records load
    /// as an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match read_items(store.as_ref()) {
            Ok(items) => items,
            Err(e) => {
                warn!("Could not load history, starting empty: {}", e);
                Vec::new()
            }
        };
        debug!(count = items.len(), "History loaded");
        Self { store, items }
    }

    /// Most recent first.
    pub fn list(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Prepends `item`, drops whatever falls beyond the capacity and persists.
    pub fn append(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAPACITY);
        self.persist();
    }

    /// Removes the item with `id` and persists. Returns whether anything was
    /// removed; an unknown id leaves the store untouched.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// A fresh id: the timestamp in milliseconds, bumped past the newest item
    /// when the clock has not moved on.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.items.iter().map(|item| item.id).max() {
            Some(newest) if newest >= candidate => newest + 1,
            _ => candidate,
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.items)
            .map_err(|e| PortError::Storage(e.to_string()))
            .and_then(|json| self.store.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to persist history: {}", e);
        }
    }
}

fn read_items(store: &dyn KeyValueStore) -> PortResult<Vec<HistoryItem>> {
    match store.get(HISTORY_KEY)? {
        Some(json) => serde_json::from_str(&json).map_err(|e| PortError::Storage(e.to_string())),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{history_item, FailingStore};

    fn empty_store() -> (Arc<MemoryStore>, HistoryStore) {
        let backing = Arc::new(MemoryStore::new());
        let history = HistoryStore::load(backing.clone());
        (backing, history)
    }

    #[test]
    fn append_keeps_only_the_two_newest() {
        let (_, mut history) = empty_store();
        history.append(history_item(1, "first"));
        history.append(history_item(2, "second"));
        history.append(history_item(3, "third"));

        let ids: Vec<i64> = history.list().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(history.get(1).is_none());
    }

    #[test]
    fn evicted_items_are_gone_after_reload() {
        let (backing, mut history) = empty_store();
        for id in 1..=3 {
            history.append(history_item(id, "day"));
        }

        let reloaded = HistoryStore::load(backing);
        let ids: Vec<i64> = reloaded.list().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn remove_drops_exactly_one_item() {
        let (backing, mut history) = empty_store();
        history.append(history_item(10, "older"));
        history.append(history_item(20, "newer"));

        assert!(history.remove(10));
        assert_eq!(history.list().len(), 1);
        assert_eq!(history.list()[0].id, 20);

        let reloaded = HistoryStore::load(backing);
        assert_eq!(reloaded.list(), history.list());
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let (_, mut history) = empty_store();
        history.append(history_item(10, "older"));
        history.append(history_item(20, "newer"));

        assert!(!history.remove(99));
        let ids: Vec<i64> = history.list().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![20, 10]);
    }

    #[test]
    fn reload_round_trips_the_list() {
        let (backing, mut history) = empty_store();
        history.append(history_item(1, "went to the aquarium"));
        history.append(history_item(2, "went jogging"));

        let reloaded = HistoryStore::load(backing);
        assert_eq!(reloaded.list(), history.list());
    }

    #[test]
    fn corrupt_record_loads_empty() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(HISTORY_KEY, "{not json").unwrap();

        let history = HistoryStore::load(backing);
        assert!(history.list().is_empty());
    }

    #[test]
    fn persist_failure_keeps_in_memory_list() {
        let mut history = HistoryStore::load(Arc::new(FailingStore));
        assert!(history.list().is_empty());

        history.append(history_item(1, "still here"));
        assert_eq!(history.list().len(), 1);
        assert!(history.remove(1));
        assert!(history.list().is_empty());
    }

    #[test]
    fn next_id_is_strictly_increasing() {
        let (_, mut history) = empty_store();
        let now = Utc::now();
        let first = history.next_id(now);
        assert_eq!(first, now.timestamp_millis());

        history.append(history_item(first, "one"));
        let second = history.next_id(now);
        assert!(second > first);
    }
}
