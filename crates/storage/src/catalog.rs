//! Character catalog sources.
//!
//! The catalog is a JSON document holding an array of entries, either bare or
//! under a `characters` key:
//!
//! ```json
//! { "characters": [
//!   { "id": 1, "character": "あ", "romaji": "a", "group": "basic",
//!     "row": "a-row", "strokeCount": 3, "examples": ["あめ (ame) - rain"] }
//! ] }
//! ```
//!
//! Keys are matched case-insensitively. Unknown `group` labels map to basic.

use async_trait::async_trait;
use kana_core::model::{Character, CharacterGroup, CharacterId};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::repository::StorageError;

const BUNDLED_HIRAGANA: &str = include_str!("../data/hiragana.json");

/// Where catalog characters come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the full character list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedCatalog` if the source is missing or invalid.
    async fn load_characters(&self) -> Result<Vec<Character>, StorageError>;
}

/// The 46 basic hiragana shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

#[async_trait]
impl CatalogSource for BundledCatalog {
    async fn load_characters(&self) -> Result<Vec<Character>, StorageError> {
        parse_catalog(BUNDLED_HIRAGANA)
    }
}

/// Catalog read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load_characters(&self) -> Result<Vec<Character>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StorageError::MalformedCatalog(format!("{}: {e}", self.path.display()))
        })?;
        parse_catalog(&raw)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: u32,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    romaji: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    row: Option<String>,
    #[serde(default, rename = "strokecount")]
    stroke_count: u8,
    #[serde(default)]
    examples: Option<Vec<String>>,
}

impl CatalogEntry {
    fn into_character(self) -> Character {
        Character::new(
            CharacterId::new(self.id),
            self.character.unwrap_or_default(),
            self.romaji.unwrap_or_default(),
            self.row.unwrap_or_default(),
            self.group
                .as_deref()
                .map_or(CharacterGroup::Basic, CharacterGroup::parse_lenient),
            self.stroke_count,
            self.examples.unwrap_or_default(),
        )
    }
}

/// Parse a catalog document.
///
/// # Errors
///
/// Returns `StorageError::MalformedCatalog` if the document is not valid JSON,
/// has no character array, or an entry lacks a numeric `id`.
pub fn parse_catalog(raw: &str) -> Result<Vec<Character>, StorageError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| StorageError::MalformedCatalog(e.to_string()))?;

    let entries = match root {
        Value::Array(entries) => entries,
        Value::Object(map) => match lowercase_keys(map).remove("characters") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(StorageError::MalformedCatalog(
                    "missing `characters` array".into(),
                ));
            }
        },
        _ => {
            return Err(StorageError::MalformedCatalog(
                "expected an array of characters".into(),
            ));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(pos, entry)| {
            let Value::Object(map) = entry else {
                return Err(StorageError::MalformedCatalog(format!(
                    "entry {pos} is not an object"
                )));
            };
            serde_json::from_value::<CatalogEntry>(Value::Object(lowercase_keys(map)))
                .map(CatalogEntry::into_character)
                .map_err(|e| StorageError::MalformedCatalog(format!("entry {pos}: {e}")))
        })
        .collect()
}

fn lowercase_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_has_the_basic_set() {
        let characters = parse_catalog(BUNDLED_HIRAGANA).unwrap();
        assert_eq!(characters.len(), 46);
        assert!(characters.iter().all(|c| c.group() == CharacterGroup::Basic));
        assert!(characters.iter().all(|c| !c.glyph().is_empty()));
        assert_eq!(characters[0].glyph(), "あ");
        assert_eq!(characters[45].romaji(), "n");
    }

    #[test]
    fn accepts_bare_array_with_mixed_case_keys() {
        let raw = r#"[
            {"Id": 47, "Character": "が", "Romaji": "ga", "GROUP": "Dakuten",
             "Row": "ga-row", "StrokeCount": 5, "Examples": ["がっこう"]},
            {"id": 48, "character": "ぎ", "romaji": "gi", "group": "mystery"}
        ]"#;
        let characters = parse_catalog(raw).unwrap();
        assert_eq!(characters.len(), 2);
        assert_eq!(characters[0].group(), CharacterGroup::Dakuten);
        assert_eq!(characters[0].stroke_count(), 5);
        assert_eq!(characters[0].examples(), ["がっこう".to_owned()]);
        assert_eq!(characters[1].group(), CharacterGroup::Basic);
        assert_eq!(characters[1].row(), "");
        assert!(characters[1].examples().is_empty());
    }

    #[test]
    fn rejects_structurally_invalid_documents() {
        for raw in [
            "not json",
            "42",
            r#"{"items": []}"#,
            r#"{"characters": {"id": 1}}"#,
            r#"[1, 2]"#,
            r#"[{"character": "あ"}]"#,
        ] {
            assert!(
                matches!(parse_catalog(raw), Err(StorageError::MalformedCatalog(_))),
                "accepted {raw}"
            );
        }
    }

    #[tokio::test]
    async fn missing_file_is_malformed_catalog() {
        let source = FileCatalog::new("/definitely/not/here/hiragana.json");
        let err = source.load_characters().await.unwrap_err();
        assert!(matches!(err, StorageError::MalformedCatalog(_)));
    }
}
