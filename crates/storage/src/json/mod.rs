//! JSON file backend.
//!
//! Two independent files live under the data directory:
//!
//! ```text
//! {data_dir}/
//! ├── character_progress.json   # array of progress records
//! └── user_statistics.json      # single statistics object
//! ```
//!
//! Each save rewrites the whole file through a sibling temp file and a rename,
//! so a crash mid-write leaves the previous version in place.

use async_trait::async_trait;
use kana_core::model::{ProgressRecord, UserStatistics};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{ProgressRepository, StorageError};

pub const PROGRESS_FILE: &str = "character_progress.json";
pub const STATISTICS_FILE: &str = "user_statistics.json";

/// Platform data directory for the application, if one can be determined.
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("kana-trainer"))
}

/// Locations of the two backing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPaths {
    pub progress: PathBuf,
    pub statistics: PathBuf,
}

impl JsonPaths {
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            progress: dir.join(PROGRESS_FILE),
            statistics: dir.join(STATISTICS_FILE),
        }
    }
}

/// Progress repository backed by pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    paths: JsonPaths,
}

impl JsonRepository {
    #[must_use]
    pub fn new(paths: JsonPaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(JsonPaths::in_dir(dir))
    }

    #[must_use]
    pub fn paths(&self) -> &JsonPaths {
        &self.paths
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(value)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ProgressRepository for JsonRepository {
    async fn load_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        Ok(read_json(&self.paths.progress).await?.unwrap_or_default())
    }

    async fn save_progress(&self, records: &[ProgressRecord]) -> Result<(), StorageError> {
        write_json(&self.paths.progress, records).await
    }

    async fn load_statistics(&self) -> Result<Option<UserStatistics>, StorageError> {
        read_json(&self.paths.statistics).await
    }

    async fn save_statistics(&self, statistics: &UserStatistics) -> Result<(), StorageError> {
        write_json(&self.paths.statistics, statistics).await
    }
}
