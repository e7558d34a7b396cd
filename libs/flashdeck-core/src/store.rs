//! Injected key-value persistence for the few bits of state that
//! outlive a session. The engines never touch storage directly.

use std::collections::HashMap;

/// Storage key for the match minigame best completion time.
pub const BEST_TIME_KEY: &str = "match.best_time_ms";

/// Minimal key-value capability for persisted numeric values
/// (milliseconds here).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, value: u64);
}

/// Record a match completion time, keeping only a strict improvement.
/// Returns `true` when a new best was written.
pub fn record_best_time(store: &mut dyn KeyValueStore, elapsed_ms: u64) -> bool {
    match store.get(BEST_TIME_KEY) {
        Some(best) if best <= elapsed_ms => false,
        _ => {
            store.set(BEST_TIME_KEY, elapsed_ms);
            true
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_time_is_always_a_best() {
        let mut store = MemoryStore::new();
        assert!(record_best_time(&mut store, 9000));
        assert_eq!(store.get(BEST_TIME_KEY), Some(9000));
    }

    #[test]
    fn only_strict_improvements_are_written() {
        let mut store = MemoryStore::new();
        record_best_time(&mut store, 9000);
        assert!(!record_best_time(&mut store, 9000));
        assert!(!record_best_time(&mut store, 12000));
        assert_eq!(store.get(BEST_TIME_KEY), Some(9000));
        assert!(record_best_time(&mut store, 8500));
        assert_eq!(store.get(BEST_TIME_KEY), Some(8500));
    }
}
