//! Mock persistence facade standing in for a remote backend.
//!
//! [`MockRemoteStore`] emulates two capability groups of a real backend:
//! credential verification (sign-in/sign-up) and CRUD over one named
//! collection of saved identifications. The whole collection lives as a
//! single JSON-serialized array in durable storage; an absent key means an
//! empty collection. Every operation sleeps for a fixed artificial latency
//! first so loading paths can be exercised without a network.
//!
//! Each mutation is one whole-blob read-modify-write with no cross-operation
//! locking, which mirrors the backend being mocked: two overlapping mutations
//! can lose one update. Callers never write the storage key directly.

pub mod record;
pub mod storage;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

pub use record::{MushroomRecord, Observation};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Storage key the collection is persisted under.
pub const COLLECTION_KEY: &str = "mushrooms";

/// Error type for mock backend operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Sign-in was rejected. Returned as a value, never a fault.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The underlying durable storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted collection no longer deserializes.
    #[error("the stored collection is corrupted: {0}")]
    Corrupted(String),
}

/// A signed-in user, as the mock backend sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHandle {
    /// Opaque user id, derived from the identifier.
    pub id: String,
    /// The identifier the user signed in with.
    pub identifier: String,
}

/// Mock backend over injected durable storage.
pub struct MockRemoteStore {
    storage: Box<dyn Storage>,
    latency: Duration,
}

impl MockRemoteStore {
    /// Create a store over the given storage with the given artificial latency.
    pub fn new(storage: impl Storage + 'static, latency: Duration) -> Self {
        Self {
            storage: Box::new(storage),
            latency,
        }
    }

    /// Sign in with an identifier and secret.
    ///
    /// Succeeds iff both are non-empty. This is mock-only verification, not
    /// real authentication.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> Result<UserHandle, StoreError> {
        self.simulate_latency().await;
        if identifier.is_empty() || secret.is_empty() {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(handle_for(identifier))
    }

    /// Create an account.
    ///
    /// Always succeeds and does not check for duplicate identifiers.
    pub async fn sign_up(&self, identifier: &str, _secret: &str) -> Result<UserHandle, StoreError> {
        self.simulate_latency().await;
        Ok(handle_for(identifier))
    }

    /// Snapshot of the full collection, newest first.
    pub async fn select(&self) -> Result<Vec<MushroomRecord>, StoreError> {
        self.simulate_latency().await;
        self.load_collection()
    }

    /// Insert an observation, assigning it a unique id.
    ///
    /// Ids increase monotonically over the life of the collection. The new
    /// record is prepended, so the collection stays newest-first. Returns the
    /// stored record.
    pub async fn insert(&self, observation: Observation) -> Result<MushroomRecord, StoreError> {
        self.simulate_latency().await;
        let mut records = self.load_collection()?;
        let id = next_id(&records);
        let record = observation.into_record(id);
        records.insert(0, record.clone());
        self.save_collection(&records)?;
        log::debug!("inserted record {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Delete the record with the given id.
    ///
    /// A no-op (still success) when no record matches.
    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut records = self.load_collection()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            log::debug!("delete of id {} matched nothing", id);
        }
        self.save_collection(&records)
    }

    fn load_collection(&self) -> Result<Vec<MushroomRecord>, StoreError> {
        match self.storage.read(COLLECTION_KEY)? {
            Some(blob) => {
                serde_json::from_str(&blob).map_err(|e| StoreError::Corrupted(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn save_collection(&self, records: &[MushroomRecord]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(records)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        self.storage.write(COLLECTION_KEY, &blob)?;
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Ids are unique and monotonic within the collection: one more than the
/// largest id ever handed out, persisted implicitly in the records.
fn next_id(records: &[MushroomRecord]) -> u64 {
    records.iter().map(|record| record.id).max().unwrap_or(0) + 1
}

fn handle_for(identifier: &str) -> UserHandle {
    let mut hasher = DefaultHasher::new();
    identifier.hash(&mut hasher);
    UserHandle {
        id: format!("user-{:08x}", hasher.finish() as u32),
        identifier: identifier.to_string(),
    }
}
