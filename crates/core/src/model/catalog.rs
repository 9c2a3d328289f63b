use std::collections::HashMap;
use thiserror::Error;

use crate::model::character::Character;
use crate::model::ids::CharacterId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogBuildError {
    #[error("catalog contains no characters")]
    Empty,

    #[error("duplicate character id {0}")]
    DuplicateId(CharacterId),
}

/// Browse filters over the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    All,
    /// Case-insensitive row label, e.g. `"ka-row"`.
    Row(String),
    /// Dakuten and handakuten characters together.
    Voiced,
}

/// Immutable, id-indexed character set shared across the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    characters: Vec<Character>,
    index: HashMap<CharacterId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping source order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogBuildError` for an empty list or duplicate ids.
    pub fn new(characters: Vec<Character>) -> Result<Self, CatalogBuildError> {
        if characters.is_empty() {
            return Err(CatalogBuildError::Empty);
        }
        let mut index = HashMap::with_capacity(characters.len());
        for (pos, c) in characters.iter().enumerate() {
            if index.insert(c.id(), pos).is_some() {
                return Err(CatalogBuildError::DuplicateId(c.id()));
            }
        }
        Ok(Self { characters, index })
    }

    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        u32::try_from(self.characters.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.index.get(&id).map(|&pos| &self.characters[pos])
    }

    #[must_use]
    pub fn contains(&self, id: CharacterId) -> bool {
        self.index.contains_key(&id)
    }

    /// Characters of one row, matched case-insensitively.
    #[must_use]
    pub fn by_row(&self, row: &str) -> Vec<Character> {
        let row = row.trim();
        self.characters
            .iter()
            .filter(|c| c.row().eq_ignore_ascii_case(row))
            .cloned()
            .collect()
    }

    /// Apply a browse filter and an optional search query, ordered by id.
    #[must_use]
    pub fn filter(&self, filter: &CatalogFilter, query: Option<&str>) -> Vec<Character> {
        let mut out: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| match filter {
                CatalogFilter::All => true,
                CatalogFilter::Row(row) => c.row().eq_ignore_ascii_case(row.trim()),
                CatalogFilter::Voiced => c.group().is_voiced(),
            })
            .filter(|c| query.is_none_or(|q| c.matches_query(q)))
            .cloned()
            .collect();
        out.sort_by_key(Character::id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CharacterGroup;

    fn character(id: u32, glyph: &str, romaji: &str, row: &str, group: CharacterGroup) -> Character {
        Character::new(CharacterId::new(id), glyph, romaji, row, group, 2, Vec::new())
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            character(7, "き", "ki", "ka-row", CharacterGroup::Basic),
            character(6, "か", "ka", "ka-row", CharacterGroup::Basic),
            character(1, "あ", "a", "a-row", CharacterGroup::Basic),
            character(47, "が", "ga", "ga-row", CharacterGroup::Dakuten),
            character(72, "ぱ", "pa", "pa-row", CharacterGroup::Handakuten),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_and_duplicate_catalogs() {
        assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogBuildError::Empty);
        let dup = vec![
            character(1, "あ", "a", "a-row", CharacterGroup::Basic),
            character(1, "い", "i", "a-row", CharacterGroup::Basic),
        ];
        assert_eq!(
            Catalog::new(dup).unwrap_err(),
            CatalogBuildError::DuplicateId(CharacterId::new(1))
        );
    }

    #[test]
    fn lookups() {
        let catalog = sample();
        assert_eq!(catalog.size(), 5);
        assert_eq!(catalog.get(CharacterId::new(6)).unwrap().romaji(), "ka");
        assert!(catalog.get(CharacterId::new(99)).is_none());
        assert_eq!(catalog.by_row("KA-ROW").len(), 2);
        assert!(catalog.by_row("zz-row").is_empty());
    }

    #[test]
    fn filter_sorts_by_id_and_applies_query() {
        let catalog = sample();
        let ids: Vec<u32> = catalog
            .filter(&CatalogFilter::All, None)
            .iter()
            .map(|c| c.id().value())
            .collect();
        assert_eq!(ids, vec![1, 6, 7, 47, 72]);

        let voiced = catalog.filter(&CatalogFilter::Voiced, None);
        assert_eq!(voiced.len(), 2);

        let searched = catalog.filter(&CatalogFilter::Row("ka-row".into()), Some("ki"));
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].glyph(), "き");
    }
}
