/// Core trait for key-value storage implementations.
///
/// A data store is a plain keyed map: it makes no durability promises and
/// each call is atomic on its own. Multi-step check-then-act sequences are
/// not atomic across calls; callers that need that must hold their own lock.
/// All implementations must be thread-safe (Send + Sync).
pub trait DataStore<V>: Send + Sync {
    /// Returns a copy of the value stored under `key`.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: V);

    /// Removes and returns the value stored under `key`.
    fn remove(&self, key: &str) -> Option<V>;

    /// Returns true if a value is stored under `key`.
    fn contains_key(&self, key: &str) -> bool;

    /// Removes every entry.
    fn clear(&self);

    /// Returns all keys, in sorted order.
    fn keys(&self) -> Vec<String>;

    /// Returns the number of entries.
    fn size(&self) -> usize;

    /// Returns copies of all values, ordered by key.
    fn values(&self) -> Vec<V> {
        self.keys()
            .iter()
            .filter_map(|key| self.get(key))
            .collect()
    }

    /// Returns true if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
