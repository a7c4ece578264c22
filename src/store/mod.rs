//! Entity-store contract the game is persisted through.
//!
//! The store is an external collaborator; the crate only needs the
//! `list/get/create/update/delete` surface below. `update` always replaces
//! the whole record and carries the version the writer last read, which lets
//! a store reject stale writes.

use core::cmp::Ordering;
use core::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::game::{GameRecord, Player};

pub mod in_memory;

/// A record kept in a store collection.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection key.
    fn key(&self) -> String;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

impl Entity for GameRecord {
    fn key(&self) -> String {
        self.id.as_str().to_string()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Entity for Player {
    fn key(&self) -> String {
        self.id.as_str().to_string()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Errors reported by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    AlreadyExists(String),
    /// The stored version moved past the one the writer read.
    VersionConflict { key: String, expected: u64, found: u64 },
    /// The store could not be reached; the caller may retry later.
    Unavailable(String),
    /// The record could not be encoded or decoded.
    Codec(String),
    /// The store answered `success: false` with this message.
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "Record {} not found", key),
            StoreError::AlreadyExists(key) => write!(f, "Record {} already exists", key),
            StoreError::VersionConflict {
                key,
                expected,
                found,
            } => write!(
                f,
                "Record {} is at version {}, writer read version {}",
                key, found, expected
            ),
            StoreError::Unavailable(reason) => write!(f, "Store unavailable: {}", reason),
            StoreError::Codec(reason) => write!(f, "Record codec error: {}", reason),
            StoreError::Rejected(reason) => write!(f, "Store rejected request: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Wire shape of a store answer: `{success, data|error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, StoreError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(StoreError::Rejected("success without data".to_string())),
            (false, _) => Err(StoreError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

impl<T> From<Result<T, StoreError>> for Envelope<T> {
    fn from(res: Result<T, StoreError>) -> Self {
        match res {
            Ok(data) => Envelope {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Envelope {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Sorter<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Filter, sort and limit for [`EntityStore::list`].
pub struct Query<T> {
    filter: Option<Filter<T>>,
    sort: Option<Sorter<T>>,
    limit: Option<usize>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            limit: None,
        }
    }
}

impl<T> Query<T> {
    /// Every record, in store order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    pub fn sort_by(mut self, f: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort = Some(Box::new(f));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Run the query over already-decoded records.
    pub fn apply(&self, records: Vec<T>) -> Vec<T> {
        let mut out: Vec<T> = match &self.filter {
            Some(f) => records.into_iter().filter(|r| f(r)).collect(),
            None => records,
        };
        if let Some(sort) = &self.sort {
            out.sort_by(|a, b| sort(a, b));
        }
        if let Some(n) = self.limit {
            out.truncate(n);
        }
        out
    }
}

/// One named collection of entities.
#[async_trait::async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    async fn list(&self, query: &Query<T>) -> Result<Vec<T>, StoreError>;
    async fn get(&self, key: &str) -> Result<T, StoreError>;
    async fn create(&self, record: T) -> Result<T, StoreError>;
    /// Overwrite the whole record. `expected_version` is the version the
    /// writer based its change on; the stored copy comes back with its new
    /// version.
    async fn update(&self, key: &str, record: T, expected_version: u64) -> Result<T, StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
