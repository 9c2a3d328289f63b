//! Deck-wide statistics aggregation.

use chrono::{DateTime, Utc};

use crate::model::{MasteryState, ProgressRecord, UserStatistics};
use crate::time::same_utc_day;

/// Upper bound of the daily streak heuristic.
pub const STREAK_CAP: u32 = 20;

/// Recompute the summary from scratch.
///
/// `current_streak` counts the characters studied on `now`'s UTC calendar
/// day, capped at [`STREAK_CAP`]. It is not a consecutive-day streak; the
/// persisted files depend on this exact figure.
#[must_use]
pub fn recompute(
    records: &[ProgressRecord],
    catalog_size: u32,
    now: DateTime<Utc>,
) -> UserStatistics {
    let studied = records
        .iter()
        .filter(|r| r.mastery != MasteryState::NotStudied)
        .count();
    let mastered = records
        .iter()
        .filter(|r| r.mastery == MasteryState::Mastered)
        .count();

    let overall_accuracy = if records.is_empty() {
        0.0
    } else {
        let sum: f64 = records.iter().map(ProgressRecord::accuracy_rate).sum();
        #[allow(clippy::cast_precision_loss)]
        let len = records.len() as f64;
        sum / len
    };

    let last_study_date = records.iter().filter_map(|r| r.last_studied).max();

    let studied_today = records
        .iter()
        .filter(|r| r.last_studied.is_some_and(|t| same_utc_day(t, now)))
        .count();
    let current_streak = saturating_u32(studied_today).min(STREAK_CAP);

    UserStatistics {
        total_characters: catalog_size,
        studied_characters: saturating_u32(studied),
        mastered_characters: saturating_u32(mastered),
        current_streak,
        best_streak: current_streak,
        overall_accuracy,
        last_study_date,
        total_practice_sessions: 0,
        total_study_time_secs: 0,
    }
}

/// Recompute while carrying the session totals and best streak of `previous`.
#[must_use]
pub fn recompute_from(
    previous: &UserStatistics,
    records: &[ProgressRecord],
    catalog_size: u32,
    now: DateTime<Utc>,
) -> UserStatistics {
    let mut stats = recompute(records, catalog_size, now);
    stats.best_streak = previous.best_streak.max(stats.current_streak);
    stats.total_practice_sessions = previous.total_practice_sessions;
    stats.total_study_time_secs = previous.total_study_time_secs;
    stats
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CharacterId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn studied(id: u32, answers: &[bool], at: DateTime<Utc>) -> ProgressRecord {
        let mut r = ProgressRecord::new(CharacterId::new(id), at);
        for &a in answers {
            r.apply_attempt(a, at);
        }
        r
    }

    #[test]
    fn empty_store_yields_zeroes() {
        let stats = recompute(&[], 46, fixed_now());
        assert_eq!(stats.total_characters, 46);
        assert_eq!(stats.studied_characters, 0);
        assert_eq!(stats.mastered_characters, 0);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert_eq!(stats.last_study_date, None);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn counts_and_mean_accuracy() {
        let now = fixed_now();
        let yesterday = now - Duration::days(1);
        let records = vec![
            studied(1, &[true; 5], now),
            studied(2, &[true, false], yesterday),
            ProgressRecord::new(CharacterId::new(3), now),
        ];

        let stats = recompute(&records, 46, now);
        assert_eq!(stats.studied_characters, 2);
        assert_eq!(stats.mastered_characters, 1);
        // mean of 100, 50 and 0
        assert_eq!(stats.overall_accuracy, 50.0);
        assert_eq!(stats.last_study_date, Some(now));
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn streak_is_capped() {
        let now = fixed_now();
        let records: Vec<_> = (0..30).map(|id| studied(id, &[true], now)).collect();
        assert_eq!(recompute(&records, 46, now).current_streak, STREAK_CAP);
    }

    #[test]
    fn recompute_is_idempotent() {
        let now = fixed_now();
        let records = vec![studied(1, &[true, true, false], now)];
        assert_eq!(recompute(&records, 46, now), recompute(&records, 46, now));
    }

    #[test]
    fn carries_session_totals_and_best_streak() {
        let now = fixed_now();
        let previous = UserStatistics {
            best_streak: 7,
            total_practice_sessions: 3,
            total_study_time_secs: 600,
            ..UserStatistics::default()
        };
        let records = vec![studied(1, &[true], now)];
        let stats = recompute_from(&previous, &records, 46, now);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 7);
        assert_eq!(stats.total_practice_sessions, 3);
        assert_eq!(stats.total_study_time_secs, 600);
    }
}
