use std::{
    path::PathBuf,
    sync::Mutex,
};

use serde_json::{json, Value};
use tracing::warn;

/// Storage key for the last-sent timestamp, matching the web client.
pub const LAST_SENT_KEY: &str = "contact:lastSent";

/// Persisted last-sent timestamp (epoch milliseconds). This is a pure UX
/// convenience to skip a round trip while the cooldown is obviously still
/// active; the server cookie remains the authoritative guard.
pub trait LastSentStore: Send + Sync + 'static {
    fn load(&self) -> Option<i64>;
    fn store(&self, timestamp_ms: i64);
}

impl<S: LastSentStore> LastSentStore for std::sync::Arc<S> {
    fn load(&self) -> Option<i64> {
        (**self).load()
    }

    fn store(&self, timestamp_ms: i64) {
        (**self).store(timestamp_ms);
    }
}

/// In-memory store, mainly for tests and short-lived embedders.
#[derive(Debug, Default)]
pub struct MemoryLastSentStore(Mutex<Option<i64>>);

impl LastSentStore for MemoryLastSentStore {
    fn load(&self) -> Option<i64> {
        *self.0.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn store(&self, timestamp_ms: i64) {
        *self.0.lock().unwrap_or_else(|err| err.into_inner()) = Some(timestamp_ms);
    }
}

/// JSON-file-backed store. Failures are logged and swallowed: losing the
/// local timestamp only costs one avoidable round trip.
#[derive(Debug, Clone)]
pub struct FileLastSentStore {
    path: PathBuf,
}

impl FileLastSentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LastSentStore for FileLastSentStore {
    fn load(&self) -> Option<i64> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let value = serde_json::from_str::<Value>(&content).ok()?;
        value.get(LAST_SENT_KEY)?.as_i64()
    }

    fn store(&self, timestamp_ms: i64) {
        let value = json!({ LAST_SENT_KEY: timestamp_ms });
        if let Err(err) = std::fs::write(&self.path, value.to_string()) {
            warn!(
                "failed to persist last-sent timestamp to {}: {err}",
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryLastSentStore::default();
        assert_eq!(store.load(), None);
        store.store(1_700_000_000_000);
        assert_eq!(store.load(), Some(1_700_000_000_000));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLastSentStore::new(dir.path().join("last_sent.json"));
        assert_eq!(store.load(), None);
        store.store(1_700_000_000_000);
        assert_eq!(store.load(), Some(1_700_000_000_000));
    }

    #[test]
    fn file_store_ignores_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_sent.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(FileLastSentStore::new(path).load(), None);
    }
}
