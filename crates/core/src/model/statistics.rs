use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deck-wide summary derived from every progress record.
///
/// The counters are recomputed by [`crate::stats::recompute`] and never
/// mutated on their own. The session totals and best streak are carried
/// across recomputations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatistics {
    pub total_characters: u32,
    pub studied_characters: u32,
    pub mastered_characters: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub overall_accuracy: f64,
    pub last_study_date: Option<DateTime<Utc>>,
    pub total_practice_sessions: u32,
    pub total_study_time_secs: u64,
}

impl UserStatistics {
    /// Mastered share of the catalog (0-100).
    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        if self.total_characters == 0 {
            return 0.0;
        }
        f64::from(self.mastered_characters) / f64::from(self.total_characters) * 100.0
    }

    #[must_use]
    pub fn characters_in_progress(&self) -> u32 {
        self.studied_characters
            .saturating_sub(self.mastered_characters)
    }
}
