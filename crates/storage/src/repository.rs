use async_trait::async_trait;
use kana_core::model::{Character, ProgressRecord, UserStatistics};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::catalog::{BundledCatalog, CatalogSource};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Durable home of the progress set and the statistics snapshot.
///
/// Both are read and written whole; there is no partial update.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load every persisted record. A missing backing store yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data exists but cannot be read or parsed.
    async fn load_progress(&self) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Replace the persisted record set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be written.
    async fn save_progress(&self, records: &[ProgressRecord]) -> Result<(), StorageError>;

    /// Load the statistics snapshot, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data exists but cannot be read or parsed.
    async fn load_statistics(&self) -> Result<Option<UserStatistics>, StorageError>;

    /// Replace the statistics snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn save_statistics(&self, statistics: &UserStatistics) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<Vec<ProgressRecord>>>,
    statistics: Arc<Mutex<Option<UserStatistics>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository, as if a previous process had saved `records`.
    #[must_use]
    pub fn with_progress(records: Vec<ProgressRecord>) -> Self {
        Self {
            progress: Arc::new(Mutex::new(records)),
            statistics: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_progress(&self, records: &[ProgressRecord]) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }

    async fn load_statistics(&self) -> Result<Option<UserStatistics>, StorageError> {
        let guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_statistics(&self, statistics: &UserStatistics) -> Result<(), StorageError> {
        let mut guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(statistics.clone());
        Ok(())
    }
}

/// Fixed character list, for tests and embedding callers that build their own set.
#[derive(Clone)]
pub struct StaticCatalog {
    characters: Vec<Character>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(characters: Vec<Character>) -> Self {
        Self { characters }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_characters(&self) -> Result<Vec<Character>, StorageError> {
        Ok(self.characters.clone())
    }
}

/// Aggregates the progress backend and catalog source behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub catalog: Arc<dyn CatalogSource>,
}

impl Storage {
    /// In-memory progress over the bundled catalog.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
            catalog: Arc::new(BundledCatalog),
        }
    }
}
