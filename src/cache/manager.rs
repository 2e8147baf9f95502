//! Cache manager for persisting API responses
//!
//! Provides a `CacheManager` that wraps serializable data together with its
//! write timestamp and stores it under a caller-chosen key.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

/// Source of the current wall-clock time in epoch milliseconds
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Clock backed by the system time
pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().timestamp_millis())
}

/// Errors surfaced by [`CacheManager::set`]
#[derive(Debug, Error)]
pub enum CacheError {
    /// The value could not be encoded as JSON
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The underlying store rejected the write
    #[error("Failed to write cache entry: {0}")]
    Storage(#[from] StorageError),
}

/// Reasons a read comes back empty-handed. Never leaves this module.
#[derive(Debug, Error)]
enum ReadError {
    #[error("storage read failed: {0}")]
    Storage(#[from] StorageError),

    #[error("corrupt entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Wrapper stored for every cached value
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    /// The cached value
    value: T,
    /// When the value was written, in epoch milliseconds
    stored_at_ms: i64,
}

/// Reads and writes time-stamped values in a key-value store
///
/// Reads fail open: a missing, stale, unreadable, or corrupt entry is reported
/// as `None`. Writes report their failures.
#[derive(Clone)]
pub struct CacheManager {
    /// Store the entries live in
    store: Arc<dyn KeyValueStore>,
    /// Time source used for stamping and freshness checks
    clock: Clock,
}

impl CacheManager {
    /// Creates a new CacheManager over `store` using the system clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, system_clock())
    }

    /// Creates a new CacheManager with a custom time source
    ///
    /// Useful for testing expiry without sleeping.
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Returns the value cached under `key` if it is at most `max_age` old
    ///
    /// # Arguments
    /// * `key` - The cache key to read
    /// * `max_age` - Largest acceptable age of the entry
    ///
    /// # Returns
    /// * `Some(T)` if a fresh entry exists and parses as `T`
    /// * `None` if the entry is missing, stale, or cannot be read
    pub async fn get<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let entry = match self.read_entry::<T>(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "treating unreadable cache entry as a miss");
                return None;
            }
        };

        let age_ms = (self.clock)().saturating_sub(entry.stored_at_ms);
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        if age_ms > max_age_ms {
            tracing::debug!(key, age_ms, max_age_ms, "cache entry is stale");
            return None;
        }

        tracing::debug!(key, age_ms, "cache hit");
        Some(entry.value)
    }

    /// Writes `value` under `key`, stamped with the current time
    ///
    /// Any previous entry for `key` is replaced unconditionally.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(CacheError)` if serialization or the store write fails
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value,
            stored_at_ms: (self.clock)(),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(key, &json).await?;
        Ok(())
    }

    async fn read_entry<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<CacheEntry<T>>, ReadError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    /// A clock the test moves by hand
    fn manual_clock(start_ms: i64) -> (Clock, Arc<AtomicI64>) {
        let now = Arc::new(AtomicI64::new(start_ms));
        let handle = now.clone();
        (Arc::new(move || handle.load(Ordering::SeqCst)), now)
    }

    fn create_test_cache() -> (CacheManager, Arc<MemoryStore>, Arc<AtomicI64>) {
        let store = Arc::new(MemoryStore::new());
        let (clock, now) = manual_clock(1_700_000_000_000);
        let cache = CacheManager::with_clock(store.clone(), clock);
        (cache, store, now)
    }

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    /// Store that refuses every operation
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::NoDataDir)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
    }

    #[tokio::test]
    async fn test_get_right_after_set_returns_value() {
        let (cache, _store, _now) = create_test_cache();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache.set("fresh_key", &data).await.expect("Write should succeed");

        assert_eq!(cache.get::<TestData>("fresh_key", DAY).await, Some(data.clone()));
        // Zero max age still accepts an entry with zero elapsed time
        assert_eq!(cache.get::<TestData>("fresh_key", Duration::ZERO).await, Some(data));
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let (cache, _store, _now) = create_test_cache();

        assert_eq!(cache.get::<TestData>("nonexistent_key", DAY).await, None);
        assert_eq!(cache.get::<TestData>("nonexistent_key", Duration::MAX).await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_once_older_than_max_age() {
        let (cache, store, now) = create_test_cache();
        cache.set("key", &42u32).await.unwrap();

        now.fetch_add(60_000, Ordering::SeqCst);
        assert_eq!(cache.get::<u32>("key", Duration::from_secs(60)).await, Some(42));

        now.fetch_add(1, Ordering::SeqCst);
        assert_eq!(cache.get::<u32>("key", Duration::from_secs(60)).await, None);

        // Reads never evict: a more tolerant caller still sees it
        assert_eq!(cache.get::<u32>("key", DAY).await, Some(42));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_overwrite_existing_cache() {
        let (cache, _store, _now) = create_test_cache();
        let first = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.set("overwrite_key", &first).await.unwrap();
        cache.set("overwrite_key", &second).await.unwrap();

        assert_eq!(cache.get::<TestData>("overwrite_key", DAY).await, Some(second));
    }

    #[tokio::test]
    async fn test_overwrite_resets_timestamp() {
        let (cache, _store, now) = create_test_cache();
        cache.set("key", "old").await.unwrap();

        now.fetch_add(10_000, Ordering::SeqCst);
        cache.set("key", "new").await.unwrap();
        now.fetch_add(5_000, Ordering::SeqCst);

        let value: Option<String> = cache.get("key", Duration::from_secs(6)).await;
        assert_eq!(value.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_as_miss() {
        let (cache, store, _now) = create_test_cache();
        store.set("corrupt", "{not json").await.unwrap();

        assert_eq!(cache.get::<TestData>("corrupt", DAY).await, None);
    }

    #[tokio::test]
    async fn test_entry_of_wrong_shape_reads_as_miss() {
        let (cache, _store, _now) = create_test_cache();
        cache.set("key", &vec![1, 2, 3]).await.unwrap();

        assert_eq!(cache.get::<TestData>("key", DAY).await, None);
    }

    #[tokio::test]
    async fn test_storage_failure_reads_as_miss_but_write_errors() {
        let cache = CacheManager::new(Arc::new(BrokenStore));

        assert_eq!(cache.get::<u32>("key", DAY).await, None);
        let result = cache.set("key", &1u32).await;
        assert!(matches!(result, Err(CacheError::Storage(_))));
    }

    #[tokio::test]
    async fn test_entry_layout_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf()));
        let (clock, _now) = manual_clock(1234);
        let cache = CacheManager::with_clock(store, clock);

        cache.set("params:v1", &TestData { name: "x".into(), value: 7 }).await.unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("params%3Av1.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["storedAtMs"], 1234);
        assert_eq!(json["value"]["name"], "x");
        assert_eq!(json["value"]["value"], 7);
    }

    #[tokio::test]
    async fn test_system_clock_stamps_current_time() {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheManager::new(store.clone());

        let before = Utc::now().timestamp_millis();
        cache.set("key", &true).await.unwrap();
        let after = Utc::now().timestamp_millis();

        let raw = store.get("key").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let stored_at = json["storedAtMs"].as_i64().unwrap();
        assert!(stored_at >= before && stored_at <= after);
    }
}
