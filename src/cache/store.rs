use std::path::Path;
use std::time::Duration;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::Result;

const RESPONSES_PARTITION: &str = "responses";

/// A cached value together with the time it was stored (epoch millis)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub time: i64,
}

impl<T> CacheEntry<T> {
    /// Valid strictly while `now - time < max_age`
    pub fn is_fresh(&self, now: i64, max_age: Duration) -> bool {
        let max_age = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(self.time) < max_age
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fjall-backed persistent key/value area for remote responses
#[derive(Clone)]
pub struct CacheStore {
    keyspace: Keyspace,
    responses: PartitionHandle,
}

impl CacheStore {
    /// Open or create a cache store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening cache store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;
        let responses =
            keyspace.open_partition(RESPONSES_PARTITION, PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            responses,
        })
    }

    /// Look up an entry. Absent keys and entries that no longer decode as `T`
    /// both come back as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        let Some(raw) = self.responses.get(key.as_bytes())? else {
            debug!(key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_slice::<CacheEntry<T>>(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Store a value stamped with the current time, replacing any previous entry
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.put_at(key, value, now_millis())
    }

    /// Store a value with an explicit timestamp
    pub fn put_at<T: Serialize>(&self, key: &str, value: &T, time: i64) -> Result<()> {
        let encoded = serde_json::to_vec(&CacheEntry { value, time })?;
        self.responses.insert(key.as_bytes(), encoded)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(key, time, "Cached response");
        Ok(())
    }

    /// Write raw bytes under a key, bypassing encoding
    #[cfg(test)]
    fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.responses.insert(key.as_bytes(), bytes)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.responses.iter() {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::open(temp_dir.path().join("cache")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::open(temp_dir.path().join("cache"));
        assert!(store.is_ok());
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp) = create_test_store();
        let value = vec!["abc100".to_string(), "abc101".to_string()];

        let before = now_millis();
        store.put("contests", &value).unwrap();
        let entry = store.get::<Vec<String>>("contests").unwrap().unwrap();

        assert_eq!(entry.value, value);
        assert!(entry.time >= before);
        assert!(entry.is_fresh(now_millis(), Duration::from_secs(60)));
    }

    #[test]
    fn test_get_missing_key() {
        let (store, _temp) = create_test_store();
        let result = store.get::<String>("problems-abc999").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let (store, _temp) = create_test_store();
        store.put_at("k", &"old", 1).unwrap();
        store.put("k", &"new").unwrap();

        let entry = store.get::<String>("k").unwrap().unwrap();
        assert_eq!(entry.value, "new");
        assert!(entry.time > 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let (store, _temp) = create_test_store();
        store.put_raw("contests", b"{not json").unwrap();

        let result = store.get::<Vec<String>>("contests").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_type_mismatch_reads_as_absent() {
        let (store, _temp) = create_test_store();
        store.put("k", &"a string").unwrap();

        let result = store.get::<Vec<u32>>("k").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_freshness_window_is_strict() {
        let entry = CacheEntry { value: (), time: 1_000 };
        let max_age = Duration::from_millis(500);

        assert!(entry.is_fresh(1_499, max_age));
        assert!(!entry.is_fresh(1_500, max_age));
        assert!(!entry.is_fresh(9_000, max_age));
        assert!(!entry.is_fresh(1_000, Duration::ZERO));
    }
}
