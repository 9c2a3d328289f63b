use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mastery;
use crate::model::ids::CharacterId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressRecordError {
    #[error("correct attempts ({correct}) exceed total attempts ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("consecutive correct and incorrect counters are both non-zero")]
    ConflictingStreaks,

    #[error("correct streak of {streak} exceeds correct attempts ({correct})")]
    CorrectStreakTooLong { streak: u32, correct: u32 },

    #[error("incorrect streak of {streak} exceeds incorrect attempts ({incorrect})")]
    IncorrectStreakTooLong { streak: u32, incorrect: u32 },
}

//
// ─── MASTERY STATE ─────────────────────────────────────────────────────────────
//

/// Learning status of a character, ordered from least to most learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryState {
    #[default]
    NotStudied,
    InProgress,
    Mastered,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Practice history for a single character.
///
/// The mastery state is always derived from the counters through
/// [`mastery::classify`]; mutate the record through [`ProgressRecord::apply_attempt`]
/// so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub character_id: CharacterId,
    pub correct_attempts: u32,
    pub total_attempts: u32,
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub last_studied: Option<DateTime<Utc>>,
    pub last_correct: Option<DateTime<Utc>>,
    pub mastery: MasteryState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Fresh, never-studied record.
    #[must_use]
    pub fn new(character_id: CharacterId, now: DateTime<Utc>) -> Self {
        Self {
            character_id,
            correct_attempts: 0,
            total_attempts: 0,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            last_studied: None,
            last_correct: None,
            mastery: MasteryState::NotStudied,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply one answer to the counters and reclassify.
    pub fn apply_attempt(&mut self, is_correct: bool, now: DateTime<Utc>) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if is_correct {
            self.correct_attempts = self.correct_attempts.saturating_add(1);
            self.consecutive_correct = self.consecutive_correct.saturating_add(1);
            self.consecutive_incorrect = 0;
            self.last_correct = Some(now);
        } else {
            self.consecutive_incorrect = self.consecutive_incorrect.saturating_add(1);
            self.consecutive_correct = 0;
        }
        self.last_studied = Some(now);
        self.updated_at = now;
        self.reclassify();
    }

    /// Recompute `mastery` from the counters.
    pub fn reclassify(&mut self) {
        self.mastery = mastery::classify(
            self.correct_attempts,
            self.total_attempts,
            self.consecutive_correct,
        );
    }

    /// Percentage of correct answers (0-100); 0 when never attempted.
    #[must_use]
    pub fn accuracy_rate(&self) -> f64 {
        mastery::accuracy(self.correct_attempts, self.total_attempts)
    }

    /// Not yet mastered, or mastered but not seen within `review_after`.
    #[must_use]
    pub fn needs_practice(&self, now: DateTime<Utc>, review_after: Duration) -> bool {
        self.mastery != MasteryState::Mastered
            || self
                .last_studied
                .is_some_and(|studied| studied + review_after < now)
    }

    /// Whole days since the last answer, `None` if never studied.
    #[must_use]
    pub fn days_since_last_studied(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_studied
            .map(|studied| now.signed_duration_since(studied).num_days())
    }

    /// Check the counter invariants of a caller-constructed record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressRecordError` when the counters contradict each other.
    pub fn validate(&self) -> Result<(), ProgressRecordError> {
        if self.correct_attempts > self.total_attempts {
            return Err(ProgressRecordError::CorrectExceedsTotal {
                correct: self.correct_attempts,
                total: self.total_attempts,
            });
        }
        if self.consecutive_correct > 0 && self.consecutive_incorrect > 0 {
            return Err(ProgressRecordError::ConflictingStreaks);
        }
        if self.consecutive_correct > self.correct_attempts {
            return Err(ProgressRecordError::CorrectStreakTooLong {
                streak: self.consecutive_correct,
                correct: self.correct_attempts,
            });
        }
        let incorrect = self.total_attempts - self.correct_attempts;
        if self.consecutive_incorrect > incorrect {
            return Err(ProgressRecordError::IncorrectStreakTooLong {
                streak: self.consecutive_incorrect,
                incorrect,
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record() -> ProgressRecord {
        ProgressRecord::new(CharacterId::new(1), fixed_now())
    }

    #[test]
    fn correct_answers_build_a_streak() {
        let mut r = record();
        r.apply_attempt(true, fixed_now());
        r.apply_attempt(true, fixed_now());
        assert_eq!(r.total_attempts, 2);
        assert_eq!(r.correct_attempts, 2);
        assert_eq!(r.consecutive_correct, 2);
        assert_eq!(r.consecutive_incorrect, 0);
        assert_eq!(r.last_correct, Some(fixed_now()));
        assert_eq!(r.mastery, MasteryState::InProgress);
    }

    #[test]
    fn wrong_answer_breaks_the_streak() {
        let mut r = record();
        for _ in 0..3 {
            r.apply_attempt(true, fixed_now());
        }
        let later = fixed_now() + Duration::minutes(1);
        r.apply_attempt(false, later);
        assert_eq!(r.consecutive_correct, 0);
        assert_eq!(r.consecutive_incorrect, 1);
        assert_eq!(r.last_correct, Some(fixed_now()));
        assert_eq!(r.last_studied, Some(later));
        assert_eq!(r.updated_at, later);
    }

    #[test]
    fn five_straight_correct_answers_master_a_character() {
        let mut r = record();
        for _ in 0..5 {
            r.apply_attempt(true, fixed_now());
        }
        assert_eq!(r.mastery, MasteryState::Mastered);
    }

    #[test]
    fn correct_never_exceeds_total() {
        let mut r = record();
        for i in 0..50 {
            r.apply_attempt(i % 3 != 0, fixed_now());
            assert!(r.correct_attempts <= r.total_attempts);
            assert!(r.consecutive_correct == 0 || r.consecutive_incorrect == 0);
            assert!(r.validate().is_ok());
        }
    }

    #[test]
    fn needs_practice_rules() {
        let now = fixed_now();
        let mut mastered = record();
        for _ in 0..5 {
            mastered.apply_attempt(true, now);
        }
        let week = Duration::days(7);
        assert!(!mastered.needs_practice(now, week));

        mastered.last_studied = Some(now - Duration::days(8));
        assert!(mastered.needs_practice(now, week));

        assert!(record().needs_practice(now, week));
    }

    #[test]
    fn accuracy_and_days_since() {
        let now = fixed_now();
        let mut r = record();
        assert_eq!(r.accuracy_rate(), 0.0);
        assert_eq!(r.days_since_last_studied(now), None);

        r.apply_attempt(true, now - Duration::days(3));
        r.apply_attempt(false, now - Duration::days(3));
        assert_eq!(r.accuracy_rate(), 50.0);
        assert_eq!(r.days_since_last_studied(now), Some(3));
    }

    #[test]
    fn validate_rejects_inconsistent_counters() {
        let mut r = record();
        r.correct_attempts = 2;
        r.total_attempts = 1;
        assert!(matches!(
            r.validate(),
            Err(ProgressRecordError::CorrectExceedsTotal { .. })
        ));

        let mut r = record();
        r.total_attempts = 4;
        r.consecutive_correct = 1;
        r.consecutive_incorrect = 1;
        assert_eq!(r.validate(), Err(ProgressRecordError::ConflictingStreaks));

        let mut r = record();
        r.total_attempts = 1;
        r.consecutive_incorrect = 2;
        assert!(matches!(
            r.validate(),
            Err(ProgressRecordError::IncorrectStreakTooLong { .. })
        ));

        let mut r = record();
        r.total_attempts = 5;
        r.consecutive_correct = 5;
        assert_eq!(
            r.validate(),
            Err(ProgressRecordError::CorrectStreakTooLong {
                streak: 5,
                correct: 0
            })
        );

        let mut r = record();
        r.total_attempts = 5;
        r.correct_attempts = 4;
        r.consecutive_incorrect = 2;
        assert_eq!(
            r.validate(),
            Err(ProgressRecordError::IncorrectStreakTooLong {
                streak: 2,
                incorrect: 1
            })
        );
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let json = serde_json::to_value(record()).unwrap();
        for key in [
            "character_id",
            "correct_attempts",
            "total_attempts",
            "consecutive_correct",
            "consecutive_incorrect",
            "last_studied",
            "last_correct",
            "mastery",
            "created_at",
            "updated_at",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["mastery"], "not_studied");
    }
}
