//! Mastery classification.
//!
//! A character's mastery state is a pure function of its counters. Rules are
//! evaluated in a fixed order (mastered first) so the thresholds never
//! overlap.

use crate::model::MasteryState;

/// Consecutive correct answers required for mastery.
pub const MASTERED_MIN_STREAK: u32 = 5;
/// Accuracy percentage required for mastery.
pub const MASTERED_MIN_ACCURACY: f64 = 90.0;
/// Attempts required before a character can be mastered.
pub const MASTERED_MIN_ATTEMPTS: u32 = 5;
/// Attempts after which accuracy is considered for the in-progress band.
pub const IN_PROGRESS_MIN_ATTEMPTS: u32 = 3;
/// Accuracy percentage of the in-progress band.
pub const IN_PROGRESS_MIN_ACCURACY: f64 = 60.0;

/// Percentage of correct answers, 0 when nothing was attempted.
#[must_use]
pub fn accuracy(correct_attempts: u32, total_attempts: u32) -> f64 {
    if total_attempts == 0 {
        return 0.0;
    }
    f64::from(correct_attempts) / f64::from(total_attempts) * 100.0
}

/// Classify a character from its accumulated statistics.
///
/// ```
/// # use kana_core::mastery::classify;
/// # use kana_core::model::MasteryState;
/// assert_eq!(classify(0, 0, 0), MasteryState::NotStudied);
/// assert_eq!(classify(0, 1, 0), MasteryState::InProgress);
/// assert_eq!(classify(5, 5, 5), MasteryState::Mastered);
/// ```
#[must_use]
pub fn classify(
    correct_attempts: u32,
    total_attempts: u32,
    consecutive_correct: u32,
) -> MasteryState {
    let accuracy = accuracy(correct_attempts, total_attempts);

    if consecutive_correct >= MASTERED_MIN_STREAK
        && accuracy >= MASTERED_MIN_ACCURACY
        && total_attempts >= MASTERED_MIN_ATTEMPTS
    {
        MasteryState::Mastered
    } else if (total_attempts >= IN_PROGRESS_MIN_ATTEMPTS && accuracy >= IN_PROGRESS_MIN_ACCURACY)
        || total_attempts > 0
    {
        MasteryState::InProgress
    } else {
        MasteryState::NotStudied
    }
}
