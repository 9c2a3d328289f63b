//! Shared error types for the services crate.

use thiserror::Error;

use kana_core::model::{CatalogBuildError, CharacterId, ProgressRecordError, SettingsError};
use storage::repository::StorageError;

/// Errors emitted by `ProgressStore`.
///
/// Storage failures never appear here; the store logs them and keeps going.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    InvalidRecord(#[from] ProgressRecordError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("character {0} not found")]
    NotFound(CharacterId),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("catalog could not be loaded: {0}")]
    Malformed(String),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

impl From<CatalogBuildError> for CatalogError {
    fn from(err: CatalogBuildError) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::MalformedCatalog(msg) => Self::Malformed(msg),
            other => Self::Malformed(other.to_string()),
        }
    }
}

/// Errors emitted by practice sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no characters available for practice")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    NotAnswered,
    #[error(transparent)]
    InvalidQuestionCount(#[from] SettingsError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("no data directory available")]
    NoDataDir,
}
