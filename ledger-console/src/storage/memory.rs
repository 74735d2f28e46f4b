use super::{Expiry, Storage};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// In-process [`Storage`] honouring expiry against the wall clock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Entry>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiry instant of a live entry; `None` for session entries and missing keys.
    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.live(key).and_then(|entry| entry.expires_at)
    }

    fn live(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key).filter(|entry| match entry.expires_at {
            Some(at) => at > Utc::now(),
            None => true,
        })
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.live(key).map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: &str, expiry: Expiry) {
        let expires_at = match expiry {
            Expiry::Session => None,
            Expiry::After(ttl) => Some(Utc::now() + ttl),
        };
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn get_set_delete() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);

        storage.set("k", "v1", Expiry::Session);
        storage.set("k", "v2", Expiry::Session);
        assert_eq!(storage.get("k").as_deref(), Some("v2"));

        storage.delete("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.set("stale", "v", Expiry::After(Duration::zero()));
        storage.set("fresh", "v", Expiry::After(Duration::days(7)));

        assert_eq!(storage.get("stale"), None);
        assert_eq!(storage.get("fresh").as_deref(), Some("v"));
    }

    #[test]
    fn records_expiry_instant() {
        let mut storage = MemoryStorage::new();
        let before = Utc::now();
        storage.set("token", "t", Expiry::After(Duration::days(7)));

        let at = storage.expires_at("token").unwrap();
        assert!(at >= before + Duration::days(7));
        assert!(at <= Utc::now() + Duration::days(7));

        storage.set("session", "s", Expiry::Session);
        assert_eq!(storage.expires_at("session"), None);
    }
}
