use chrono::Duration;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per session must be between 1 and {max}")]
    InvalidQuestionsPerSession { max: u32 },

    #[error("review interval must be at least 1 day")]
    InvalidReviewAfterDays,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables of the practice engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSettings {
    questions_per_session: u32,
    review_after_days: u32,
}

impl PracticeSettings {
    pub const MAX_QUESTIONS_PER_SESSION: u32 = 500;

    /// Ten questions a session; mastered characters come back after a week.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            questions_per_session: 10,
            review_after_days: 7,
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any value is out of range.
    pub fn new(questions_per_session: u32, review_after_days: u32) -> Result<Self, SettingsError> {
        Self::check_questions(questions_per_session)?;
        if review_after_days == 0 {
            return Err(SettingsError::InvalidReviewAfterDays);
        }
        Ok(Self {
            questions_per_session,
            review_after_days,
        })
    }

    /// Validate a per-session question count.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionsPerSession` for 0 or oversized counts.
    pub fn check_questions(count: u32) -> Result<u32, SettingsError> {
        if count == 0 || count > Self::MAX_QUESTIONS_PER_SESSION {
            return Err(SettingsError::InvalidQuestionsPerSession {
                max: Self::MAX_QUESTIONS_PER_SESSION,
            });
        }
        Ok(count)
    }

    #[must_use]
    pub fn questions_per_session(&self) -> u32 {
        self.questions_per_session
    }

    #[must_use]
    pub fn review_after_days(&self) -> u32 {
        self.review_after_days
    }

    /// Age after which a mastered character is due again.
    #[must_use]
    pub fn review_after(&self) -> Duration {
        Duration::days(i64::from(self.review_after_days))
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_values() {
        let s = PracticeSettings::default();
        assert_eq!(s.questions_per_session(), 10);
        assert_eq!(s.review_after(), Duration::days(7));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            PracticeSettings::new(0, 7),
            Err(SettingsError::InvalidQuestionsPerSession { .. })
        ));
        assert!(matches!(
            PracticeSettings::new(501, 7),
            Err(SettingsError::InvalidQuestionsPerSession { .. })
        ));
        assert_eq!(
            PracticeSettings::new(5, 0),
            Err(SettingsError::InvalidReviewAfterDays)
        );
        assert!(PracticeSettings::new(20, 3).is_ok());
    }
}
