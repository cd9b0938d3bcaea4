//! In-memory storage engine

use super::entry::Entry;
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::time::Duration;
use tokio::sync::RwLock;

/// Type alias for the storage map with SipHasher
type StoreMap = HashMap<Bytes, Entry, BuildHasherDefault<SipHasher13>>;

/// Concurrent in-memory key-value store
///
/// One read-write lock guards the whole map: writers are mutually exclusive,
/// readers run in parallel with each other but never with a writer. Expired
/// entries are removed only when a read observes them (lazy expiry); there is
/// no background sweep.
pub struct Storage {
    data: RwLock<StoreMap>,
}

impl Storage {
    /// Create a new store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Storage {
            data: RwLock::new(HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            )),
        }
    }

    /// Insert or overwrite an entry.
    ///
    /// `ttl` is a relative deadline in milliseconds, carried as the raw
    /// argument bytes. A TTL that does not parse as a non-negative integer
    /// leaves the store untouched and returns false.
    pub async fn set(&self, key: Bytes, value: Bytes, ttl: Option<Bytes>) -> bool {
        let entry = match ttl {
            Some(raw) => match parse_millis(&raw) {
                Some(ms) => Entry::with_expiration(value, Duration::from_millis(ms)),
                None => return false,
            },
            None => Entry::new(value),
        };

        self.data.write().await.insert(key, entry);
        true
    }

    /// Look up a key, returning its value if present and not expired.
    ///
    /// Reading an expired entry evicts it. The shared lock used for the
    /// lookup cannot delete, so eviction re-acquires the write lock and
    /// re-checks the entry: a concurrent SET may have replaced it with a
    /// live one, which is then returned rather than deleted.
    pub async fn get(&self, key: &Bytes) -> Option<Bytes> {
        {
            let data = self.data.read().await;
            match data.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut data = self.data.write().await;
        match data.get(key) {
            None => None,
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                data.remove(key);
                None
            }
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict parse of a millisecond TTL argument
fn parse_millis(raw: &[u8]) -> Option<u64> {
    std::str::from_utf8(raw).ok()?.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_basic_set_get() {
        let storage = Storage::new();

        assert!(storage.set(Bytes::from("k"), Bytes::from("v"), None).await);
        assert_eq!(
            storage.get(&Bytes::from("k")).await,
            Some(Bytes::from("v"))
        );
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = Storage::new();
        assert_eq!(storage.get(&Bytes::from("missing")).await, None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = Storage::new();

        storage.set(Bytes::from("k"), Bytes::from("old"), None).await;
        storage.set(Bytes::from("k"), Bytes::from("new"), None).await;

        assert_eq!(
            storage.get(&Bytes::from("k")).await,
            Some(Bytes::from("new"))
        );
    }

    #[tokio::test]
    async fn test_entry_without_ttl_persists() {
        let storage = Storage::new();
        storage.set(Bytes::from("k"), Bytes::from("v"), None).await;

        sleep(Duration::from_millis(30)).await;
        assert_eq!(
            storage.get(&Bytes::from("k")).await,
            Some(Bytes::from("v"))
        );
    }

    #[tokio::test]
    async fn test_ttl_expiry_is_lazy() {
        let storage = Storage::new();
        storage
            .set(Bytes::from("k"), Bytes::from("v"), Some(Bytes::from("40")))
            .await;

        assert_eq!(
            storage.get(&Bytes::from("k")).await,
            Some(Bytes::from("v"))
        );

        sleep(Duration::from_millis(60)).await;

        // first read past the deadline evicts, later reads stay empty
        assert_eq!(storage.get(&Bytes::from("k")).await, None);
        assert_eq!(storage.get(&Bytes::from("k")).await, None);
    }

    #[tokio::test]
    async fn test_non_numeric_ttl_is_rejected_without_mutation() {
        let storage = Storage::new();
        storage.set(Bytes::from("k"), Bytes::from("v"), None).await;

        let accepted = storage
            .set(
                Bytes::from("k"),
                Bytes::from("clobbered"),
                Some(Bytes::from("abc")),
            )
            .await;
        assert!(!accepted);

        // the bad write left the previous entry intact
        assert_eq!(
            storage.get(&Bytes::from("k")).await,
            Some(Bytes::from("v"))
        );
    }

    #[tokio::test]
    async fn test_negative_ttl_is_rejected() {
        let storage = Storage::new();
        let accepted = storage
            .set(Bytes::from("k"), Bytes::from("v"), Some(Bytes::from("-5")))
            .await;
        assert!(!accepted);
        assert_eq!(storage.get(&Bytes::from("k")).await, None);
    }

    #[tokio::test]
    async fn test_concurrent_disjoint_writes() {
        let storage = Arc::new(Storage::new());
        let mut handles = vec![];

        for i in 0..10 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                let key = Bytes::from(format!("key{}", i));
                let value = Bytes::from(format!("value{}", i));
                assert!(storage.set(key, value, None).await);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10 {
            let key = Bytes::from(format!("key{}", i));
            let expected = Bytes::from(format!("value{}", i));
            assert_eq!(storage.get(&key).await, Some(expected));
        }
    }

    #[tokio::test]
    async fn test_reads_never_observe_torn_values() {
        let storage = Arc::new(Storage::new());
        let key = Bytes::from("contended");
        let all_a = Bytes::from(vec![b'a'; 1024]);
        let all_b = Bytes::from(vec![b'b'; 1024]);

        storage.set(key.clone(), all_a.clone(), None).await;

        let writer = {
            let storage = Arc::clone(&storage);
            let key = key.clone();
            let (all_a, all_b) = (all_a.clone(), all_b.clone());
            tokio::spawn(async move {
                for _ in 0..200 {
                    storage.set(key.clone(), all_b.clone(), None).await;
                    storage.set(key.clone(), all_a.clone(), None).await;
                }
            })
        };

        let reader = {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move {
                for _ in 0..200 {
                    let value = storage.get(&key).await.unwrap();
                    assert!(value == all_a || value == all_b, "torn value observed");
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
