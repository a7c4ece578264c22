use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use crate::store::{Entity, EntityStore, Query, StoreError};

/// How [`InMemoryStore::update`] treats the writer's observed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Reject a write whose observed version is not the stored one.
    CompareAndSet,
    /// Unconditional overwrite; concurrent writes can silently clobber each
    /// other.
    LastWriteWins,
}

/// In-process store shared by every clone of the handle.
///
/// Records are kept bincode-encoded so each read hands out an independent
/// copy, the same as fetching over the wire.
pub struct InMemoryStore<T> {
    records: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    available: Arc<AtomicBool>,
    policy: WritePolicy,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            available: self.available.clone(),
            policy: self.policy,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new(policy: WritePolicy) -> Self {
        Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            policy,
            _entity: PhantomData,
        }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Simulate the store going down or coming back, for every handle.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store offline".to_string()))
        }
    }

    fn encode(record: &T) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(record).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<T, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
    }
}

#[async_trait::async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn list(&self, query: &Query<T>) -> Result<Vec<T>, StoreError> {
        self.check_available()?;
        let records = self.records.lock().await;
        let decoded = records
            .values()
            .map(|b| Self::decode(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(query.apply(decoded))
    }

    async fn get(&self, key: &str) -> Result<T, StoreError> {
        self.check_available()?;
        let records = self.records.lock().await;
        let bytes = records
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Self::decode(bytes)
    }

    async fn create(&self, mut record: T) -> Result<T, StoreError> {
        self.check_available()?;
        let key = record.key();
        let mut records = self.records.lock().await;
        if records.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }
        record.set_version(1);
        records.insert(key.clone(), Self::encode(&record)?);
        debug!("created {} at version 1", key);
        Ok(record)
    }

    async fn update(&self, key: &str, mut record: T, expected_version: u64) -> Result<T, StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().await;
        let current = records
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
            .and_then(|b| Self::decode(b))?
            .version();
        if current != expected_version {
            match self.policy {
                WritePolicy::CompareAndSet => {
                    return Err(StoreError::VersionConflict {
                        key: key.to_string(),
                        expected: expected_version,
                        found: current,
                    });
                }
                WritePolicy::LastWriteWins => {
                    warn!(
                        "overwriting {} at version {} with a write based on version {}",
                        key, current, expected_version
                    );
                }
            }
        }
        record.set_version(current + 1);
        records.insert(key.to_string(), Self::encode(&record)?);
        debug!("updated {} to version {}", key, current + 1);
        Ok(record)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().await;
        records
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
