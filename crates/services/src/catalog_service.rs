use std::sync::Arc;

use kana_core::model::{Catalog, CatalogFilter, Character, CharacterId, ProgressRecord};
use storage::catalog::CatalogSource;

use crate::error::CatalogError;
use crate::progress_store::ProgressStore;

/// A catalog character paired with its current progress.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProgress {
    pub character: Character,
    pub progress: ProgressRecord,
}

/// Read access to the character catalog plus the progress hand-off for a character.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, progress: Arc<ProgressStore>) -> Self {
        Self { catalog, progress }
    }

    /// Load and index every character from `source`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Malformed` if the source is missing, invalid, empty,
    /// or contains duplicate ids.
    pub async fn load(source: &dyn CatalogSource) -> Result<Catalog, CatalogError> {
        let characters = source.load_characters().await?;
        let catalog = Catalog::new(characters)?;
        log::info!("loaded {} catalog characters", catalog.len());
        Ok(catalog)
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Copy of every character in catalog order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Character> {
        self.catalog.characters().to_vec()
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for ids outside the catalog.
    pub fn by_id(&self, id: CharacterId) -> Result<Character, CatalogError> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` for a blank row label.
    pub fn by_row(&self, row: &str) -> Result<Vec<Character>, CatalogError> {
        if row.trim().is_empty() {
            return Err(CatalogError::InvalidInput("row cannot be empty"));
        }
        Ok(self.catalog.by_row(row))
    }

    /// Free-text search over glyph, romaji, examples, row and group.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` for a blank query.
    pub fn search(&self, query: &str) -> Result<Vec<Character>, CatalogError> {
        if query.trim().is_empty() {
            return Err(CatalogError::InvalidInput("search query cannot be empty"));
        }
        Ok(self.catalog.filter(&CatalogFilter::All, Some(query)))
    }

    /// Browse view: a filter plus an optional search query, ordered by id.
    ///
    /// A blank query is treated as no query.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` for a blank row filter.
    pub fn browse(
        &self,
        filter: &CatalogFilter,
        query: Option<&str>,
    ) -> Result<Vec<Character>, CatalogError> {
        if let CatalogFilter::Row(row) = filter {
            if row.trim().is_empty() {
                return Err(CatalogError::InvalidInput("row cannot be empty"));
            }
        }
        let query = query.filter(|q| !q.trim().is_empty());
        Ok(self.catalog.filter(filter, query))
    }

    /// Pull a character together with its progress record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for ids outside the catalog.
    pub async fn character_progress(&self, id: CharacterId) -> Result<CharacterProgress, CatalogError> {
        let character = self.by_id(id)?;
        let progress = self.progress.get(id).await;
        Ok(CharacterProgress {
            character,
            progress,
        })
    }

    /// Persist progress handed back for a catalog character.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the character is not in the catalog,
    /// or `CatalogError::Progress` if the record is inconsistent.
    pub async fn update_character_progress(
        &self,
        record: ProgressRecord,
    ) -> Result<ProgressRecord, CatalogError> {
        if !self.catalog.contains(record.character_id) {
            return Err(CatalogError::NotFound(record.character_id));
        }
        Ok(self.progress.save(record).await?)
    }
}
