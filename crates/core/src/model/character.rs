use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::CharacterId;

//
// ─── CHARACTER GROUP ───────────────────────────────────────────────────────────
//

/// Phonetic family a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterGroup {
    #[default]
    Basic,
    Dakuten,
    Handakuten,
    Combination,
}

impl CharacterGroup {
    /// Parses a group label case-insensitively; unknown labels fall back to `Basic`.
    #[must_use]
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "dakuten" => Self::Dakuten,
            "handakuten" => Self::Handakuten,
            "combination" => Self::Combination,
            _ => Self::Basic,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Dakuten => "dakuten",
            Self::Handakuten => "handakuten",
            Self::Combination => "combination",
        }
    }

    /// Voiced-mark family (dakuten and handakuten share a browse filter).
    #[must_use]
    pub fn is_voiced(self) -> bool {
        matches!(self, Self::Dakuten | Self::Handakuten)
    }
}

impl fmt::Display for CharacterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CHARACTER ─────────────────────────────────────────────────────────────────
//

/// Read-only catalog entry for one learnable character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    id: CharacterId,
    glyph: String,
    romaji: String,
    row: String,
    group: CharacterGroup,
    stroke_count: u8,
    examples: Vec<String>,
}

impl Character {
    #[must_use]
    pub fn new(
        id: CharacterId,
        glyph: impl Into<String>,
        romaji: impl Into<String>,
        row: impl Into<String>,
        group: CharacterGroup,
        stroke_count: u8,
        examples: Vec<String>,
    ) -> Self {
        Self {
            id,
            glyph: glyph.into(),
            romaji: romaji.into(),
            row: row.into(),
            group,
            stroke_count,
            examples,
        }
    }

    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    #[must_use]
    pub fn romaji(&self) -> &str {
        &self.romaji
    }

    #[must_use]
    pub fn row(&self) -> &str {
        &self.row
    }

    #[must_use]
    pub fn group(&self) -> CharacterGroup {
        self.group
    }

    #[must_use]
    pub fn stroke_count(&self) -> u8 {
        self.stroke_count
    }

    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Case-insensitive substring match over glyph, romaji, examples, row and group.
    ///
    /// A blank query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&query);
        hit(&self.glyph)
            || hit(&self.romaji)
            || self.examples.iter().any(|e| hit(e))
            || hit(&self.row)
            || hit(self.group.as_str())
    }
}
