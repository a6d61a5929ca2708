use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::DataStore;

/// In-memory data store.
///
/// Cloning yields another handle to the same underlying map, so a store can
/// be shared between services the same way an `Arc` would.
#[derive(Debug)]
pub struct InMemoryDataStore<V> {
    entries: Arc<RwLock<HashMap<String, V>>>,
}

impl<V> InMemoryDataStore<V> {
    /// Creates a new empty in-memory data store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V> Default for InMemoryDataStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for InMemoryDataStore<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> DataStore<V> for InMemoryDataStore<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: V) {
        tracing::trace!(key, "data store put");
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<V> {
        tracing::trace!(key, "data store remove");
        self.entries.write().remove(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn size(&self) -> usize {
        self.entries.read().len()
    }

    fn values(&self) -> Vec<V> {
        let entries = self.entries.read();
        let mut pairs: Vec<_> = entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs.into_iter().map(|(_, v)| v.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let store = InMemoryDataStore::new();
        store.put("dm_k1", "val1".to_string());
        store.put("dm_k2", "val2".to_string());

        assert!(store.contains_key("dm_k1"));
        assert_eq!(store.get("dm_k2").as_deref(), Some("val2"));
        assert_eq!(store.size(), 2);

        assert_eq!(store.remove("dm_k1").as_deref(), Some("val1"));
        assert!(!store.contains_key("dm_k1"));
        assert_eq!(store.size(), 1);
        assert!(store.remove("dm_k1").is_none());
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let store: InMemoryDataStore<u32> = InMemoryDataStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_replaces_existing_value() {
        let store = InMemoryDataStore::new();
        store.put("k", 1);
        store.put("k", 2);
        assert_eq!(store.get("k"), Some(2));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_keys_and_values_are_sorted() {
        let store = InMemoryDataStore::new();
        store.put("b", 2);
        store.put("a", 1);
        store.put("c", 3);

        assert_eq!(store.keys(), vec!["a", "b", "c"]);
        assert_eq!(store.values(), vec![1, 2, 3]);
    }

    #[test]
    fn test_clear() {
        let store = InMemoryDataStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.clear();
        assert_eq!(store.size(), 0);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = InMemoryDataStore::new();
        let handle = store.clone();
        handle.put("shared", 7);
        assert_eq!(store.get("shared"), Some(7));
    }

    #[test]
    fn test_concurrent_puts_are_all_visible() {
        let store = InMemoryDataStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        store.put(&format!("{i}-{j}"), j);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.size(), 400);
    }
}
