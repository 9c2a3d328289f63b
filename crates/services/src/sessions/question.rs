use chrono::{DateTime, Utc};

use kana_core::model::{Character, PracticeMode};

/// Which side of a character a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    /// Glyph shown, romaji expected.
    Recognition,
    /// Romaji shown, glyph expected.
    Production,
}

impl QuestionKind {
    /// The value a correct answer must match.
    #[must_use]
    pub fn target_of(self, character: &Character) -> &str {
        match self {
            Self::Recognition => character.romaji(),
            Self::Production => character.glyph(),
        }
    }

    fn prompt_for(self, character: &Character) -> String {
        match self {
            Self::Recognition => format!("What is the romaji for {}?", character.glyph()),
            Self::Production => format!("Which hiragana represents '{}'?", character.romaji()),
        }
    }
}

/// A question currently shown to the learner.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub character: Character,
    pub mode: PracticeMode,
    pub kind: QuestionKind,
    pub prompt: String,
    /// Empty for free-text questions.
    pub options: Vec<String>,
    pub asked_at: DateTime<Utc>,
}

impl Question {
    #[must_use]
    pub fn new(
        character: Character,
        mode: PracticeMode,
        kind: QuestionKind,
        options: Vec<String>,
        asked_at: DateTime<Utc>,
    ) -> Self {
        let prompt = kind.prompt_for(&character);
        Self {
            character,
            mode,
            kind,
            prompt,
            options,
            asked_at,
        }
    }

    /// Expected answer for this question.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        self.kind.target_of(&self.character)
    }

    /// Validate an answer.
    ///
    /// Free-text recognition answers are trimmed and compared without case;
    /// selections must match exactly.
    #[must_use]
    pub fn check(&self, input: &str) -> bool {
        let expected = self.correct_answer();
        match self.mode {
            PracticeMode::Recognition => input.trim().eq_ignore_ascii_case(expected),
            PracticeMode::Production | PracticeMode::MultipleChoice => input == expected,
        }
    }
}
