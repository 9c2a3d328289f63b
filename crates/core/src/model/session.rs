use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{CharacterId, SessionId};

//
// ─── PRACTICE MODE ─────────────────────────────────────────────────────────────
//

/// Question/answer style of a practice run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Glyph shown, romaji typed.
    #[default]
    Recognition,
    /// Romaji shown, glyph picked.
    Production,
    /// Either direction, answered by picking from options.
    MultipleChoice,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown practice mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for PracticeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "recognition" => Ok(Self::Recognition),
            "production" => Ok(Self::Production),
            "multiplechoice" => Ok(Self::MultipleChoice),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recognition => "recognition",
            Self::Production => "production",
            Self::MultipleChoice => "multiple_choice",
        })
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// One scored answer within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeResult {
    pub character_id: CharacterId,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub time_taken_ms: u64,
    pub answered_at: DateTime<Utc>,
}

impl PracticeResult {
    #[must_use]
    pub fn time_taken(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.time_taken_ms).unwrap_or(i64::MAX))
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Record of one practice run, owned by whoever drives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSession {
    id: SessionId,
    mode: PracticeMode,
    total_questions: u32,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    results: Vec<PracticeResult>,
}

impl PracticeSession {
    #[must_use]
    pub fn new(mode: PracticeMode, total_questions: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            mode,
            total_questions,
            started_at,
            ended_at: None,
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn results(&self) -> &[PracticeResult] {
        &self.results
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn push_result(&mut self, result: PracticeResult) {
        self.results.push(result);
    }

    /// Stamp the end time; later calls keep the first stamp.
    pub fn finish(&mut self, ended_at: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(ended_at.max(self.started_at));
        }
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        u32::try_from(self.results.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        u32::try_from(self.results.iter().filter(|r| r.is_correct).count()).unwrap_or(u32::MAX)
    }

    /// Correct share of the configured question count (0-100).
    #[must_use]
    pub fn accuracy_rate(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_count()) / f64::from(self.total_questions) * 100.0
    }

    /// Zero while the session is still open.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.ended_at
            .map_or_else(Duration::zero, |end| end - self.started_at)
    }

    /// Character ids of the last `n` results, most recent last.
    #[must_use]
    pub fn recent_character_ids(&self, n: usize) -> Vec<CharacterId> {
        let skip = self.results.len().saturating_sub(n);
        self.results[skip..].iter().map(|r| r.character_id).collect()
    }

    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        let ended_at = self.ended_at?;
        Some(SessionSummary {
            session_id: self.id,
            mode: self.mode,
            started_at: self.started_at,
            ended_at,
            total_questions: self.total_questions,
            answered: self.answered(),
            correct: self.correct_count(),
            accuracy: self.accuracy_rate(),
            duration: self.duration(),
        })
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Outcome of a finished session, handed to whoever displays or stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub mode: PracticeMode,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_questions: u32,
    pub answered: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub duration: Duration,
}
