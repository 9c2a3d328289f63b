use std::path::Path;
use std::sync::Arc;

use kana_core::model::{PracticeSettings, UserStatistics};
use storage::catalog::BundledCatalog;
use storage::json::{JsonRepository, default_data_dir};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;
use crate::sessions::PracticeLoopService;

/// Assembles the catalog, progress store and practice loop over one storage.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressStore>,
    practice: Arc<PracticeLoopService>,
}

impl AppServices {
    /// Build services over JSON files in `data_dir` and the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the catalog cannot be loaded.
    pub async fn open(
        data_dir: impl AsRef<Path>,
        clock: Clock,
        settings: PracticeSettings,
    ) -> Result<Self, AppServicesError> {
        let data_dir = data_dir.as_ref();
        log::info!("opening progress data in {}", data_dir.display());
        let storage = Storage {
            progress: Arc::new(JsonRepository::in_dir(data_dir)),
            catalog: Arc::new(BundledCatalog),
        };
        Self::from_storage(storage, clock, settings).await
    }

    /// Like [`AppServices::open`], under the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::NoDataDir` when the platform has no data directory.
    pub async fn open_default(
        clock: Clock,
        settings: PracticeSettings,
    ) -> Result<Self, AppServicesError> {
        let dir = default_data_dir().ok_or(AppServicesError::NoDataDir)?;
        Self::open(dir, clock, settings).await
    }

    /// Build services over arbitrary backends.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the catalog cannot be loaded.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        settings: PracticeSettings,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(CatalogService::load(storage.catalog.as_ref()).await?);
        let progress = Arc::new(
            ProgressStore::new(clock, Arc::clone(&storage.progress), catalog.size())
                .with_settings(&settings),
        );
        let practice = Arc::new(
            PracticeLoopService::new(clock, Arc::clone(&catalog), Arc::clone(&progress))
                .with_settings(settings),
        );
        let catalog = Arc::new(CatalogService::new(catalog, Arc::clone(&progress)));

        Ok(Self {
            catalog,
            progress,
            practice,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice)
    }

    /// Current deck statistics.
    pub async fn get_statistics(&self) -> UserStatistics {
        self.progress.statistics().await
    }
}
