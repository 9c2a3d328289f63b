use chrono::{DateTime, Utc};
use std::fmt;

use kana_core::model::{
    Character, PracticeMode, PracticeResult, PracticeSession, SessionId, SessionSummary,
};

use super::plan::{DISTRACTOR_COUNT, PracticeSelector, RECENT_WINDOW};
use super::progress::SessionProgress;
use super::question::{Question, QuestionKind};
use crate::error::SessionError;

/// Where the current question is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStage {
    /// Shown, waiting for an answer.
    Asked,
    /// Answer received and validated, progress not yet updated.
    Answered,
    /// Progress updated; ready to advance.
    Scored,
    /// No question is pending; the session is over.
    Advanced,
}

/// In-memory practice run.
///
/// Owns the character pool and its own selector, and steps through one
/// question at a time. Persistence is driven by `PracticeLoopService`.
pub struct ActiveSession {
    session: PracticeSession,
    pool: Vec<Character>,
    selector: PracticeSelector,
    current: Option<Question>,
    stage: QuestionStage,
}

impl ActiveSession {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool holds no characters.
    pub(crate) fn new(
        session: PracticeSession,
        pool: Vec<Character>,
        selector: PracticeSelector,
    ) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            session,
            pool,
            selector,
            current: None,
            stage: QuestionStage::Advanced,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.session.id()
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.session.mode()
    }

    #[must_use]
    pub fn record(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn pool(&self) -> &[Character] {
        &self.pool
    }

    #[must_use]
    pub fn results(&self) -> &[PracticeResult] {
        self.session.results()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn stage(&self) -> QuestionStage {
        self.stage
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_ended()
    }

    /// Whether every configured question has been answered.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.session.answered() >= self.session.total_questions()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.session.total_questions();
        let answered = self.session.answered();
        SessionProgress {
            total,
            answered,
            correct: self.session.correct_count(),
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Pick the next character and build its question.
    pub(crate) fn ask_next(
        &mut self,
        catalog: &[Character],
        asked_at: DateTime<Utc>,
    ) -> Result<&Question, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let recent = self.session.results();
        let skip = recent.len().saturating_sub(RECENT_WINDOW);
        let character = self
            .selector
            .select_next(&self.pool, &recent[skip..])
            .cloned()
            .ok_or(SessionError::Empty)?;

        let mode = self.session.mode();
        let (kind, options) = match mode {
            PracticeMode::Recognition => (QuestionKind::Recognition, Vec::new()),
            PracticeMode::Production => {
                let kind = QuestionKind::Production;
                let options = self
                    .selector
                    .options(&character, catalog, kind, DISTRACTOR_COUNT);
                (kind, options)
            }
            PracticeMode::MultipleChoice => {
                let kind = self.selector.pick_kind();
                let options = self
                    .selector
                    .options(&character, catalog, kind, DISTRACTOR_COUNT);
                (kind, options)
            }
        };

        self.stage = QuestionStage::Asked;
        Ok(&*self
            .current
            .insert(Question::new(character, mode, kind, options, asked_at)))
    }

    /// Validate the answer to the current question and append its result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` for an ended session and
    /// `SessionError::AlreadyAnswered` if the question was answered before.
    pub(crate) fn answer(
        &mut self,
        input: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<PracticeResult, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.stage != QuestionStage::Asked {
            return Err(SessionError::AlreadyAnswered);
        }
        let question = self.current.as_ref().ok_or(SessionError::Completed)?;

        let elapsed = (answered_at - question.asked_at).num_milliseconds();
        let result = PracticeResult {
            character_id: question.character.id(),
            question: question.prompt.clone(),
            user_answer: input.to_owned(),
            correct_answer: question.correct_answer().to_owned(),
            is_correct: question.check(input),
            time_taken_ms: u64::try_from(elapsed).unwrap_or(0),
            answered_at,
        };

        self.session.push_result(result.clone());
        self.stage = QuestionStage::Answered;
        Ok(result)
    }

    pub(crate) fn mark_scored(&mut self) {
        if self.stage == QuestionStage::Answered {
            self.stage = QuestionStage::Scored;
        }
    }

    /// Check that the current question may be left behind.
    pub(crate) fn ensure_advanceable(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        match self.stage {
            QuestionStage::Scored => Ok(()),
            QuestionStage::Asked | QuestionStage::Answered => Err(SessionError::NotAnswered),
            QuestionStage::Advanced => Err(SessionError::Completed),
        }
    }

    /// Stamp the end time and build the summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session has already ended.
    pub(crate) fn finish(&mut self, ended_at: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        self.session.finish(ended_at);
        self.current = None;
        self.stage = QuestionStage::Advanced;
        self.session.summary().ok_or(SessionError::Completed)
    }
}

impl fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSession")
            .field("id", &self.session.id())
            .field("mode", &self.session.mode())
            .field("pool_len", &self.pool.len())
            .field("answered", &self.session.answered())
            .field("total", &self.session.total_questions())
            .field("stage", &self.stage)
            .field("ended_at", &self.session.ended_at())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kana_core::model::{CharacterGroup, CharacterId};
    use kana_core::time::fixed_now;

    fn catalog() -> Vec<Character> {
        [("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o")]
            .iter()
            .zip(1..)
            .map(|((glyph, romaji), id)| {
                Character::new(
                    CharacterId::new(id),
                    *glyph,
                    *romaji,
                    "a-row",
                    CharacterGroup::Basic,
                    2,
                    Vec::new(),
                )
            })
            .collect()
    }

    fn build(mode: PracticeMode, total: u32) -> ActiveSession {
        ActiveSession::new(
            PracticeSession::new(mode, total, fixed_now()),
            catalog(),
            PracticeSelector::seeded(17),
        )
        .unwrap()
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = ActiveSession::new(
            PracticeSession::new(PracticeMode::Recognition, 3, fixed_now()),
            Vec::new(),
            PracticeSelector::seeded(1),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn recognition_questions_are_free_text() {
        let mut session = build(PracticeMode::Recognition, 3);
        let question = session.ask_next(&catalog(), fixed_now()).unwrap();
        assert_eq!(question.kind, QuestionKind::Recognition);
        assert!(question.options.is_empty());
        assert_eq!(session.stage(), QuestionStage::Asked);
    }

    #[test]
    fn production_questions_offer_glyphs() {
        let mut session = build(PracticeMode::Production, 3);
        let question = session.ask_next(&catalog(), fixed_now()).unwrap().clone();
        assert_eq!(question.options.len(), 4);
        assert!(question.options.contains(&question.character.glyph().to_owned()));
        let glyphs: Vec<_> = catalog().iter().map(|c| c.glyph().to_owned()).collect();
        assert!(question.options.iter().all(|o| glyphs.contains(o)));
    }

    #[test]
    fn answer_records_elapsed_time_and_correctness() {
        let mut session = build(PracticeMode::Recognition, 3);
        let answer = {
            let q = session.ask_next(&catalog(), fixed_now()).unwrap();
            q.character.romaji().to_uppercase()
        };

        let result = session
            .answer(&answer, fixed_now() + Duration::milliseconds(1_250))
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.time_taken_ms, 1_250);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.stage(), QuestionStage::Answered);
    }

    #[test]
    fn stages_are_enforced() {
        let mut session = build(PracticeMode::Recognition, 2);
        session.ask_next(&catalog(), fixed_now()).unwrap();
        assert!(matches!(session.ensure_advanceable(), Err(SessionError::NotAnswered)));

        session.answer("x", fixed_now()).unwrap();
        assert!(matches!(session.ensure_advanceable(), Err(SessionError::NotAnswered)));
        assert!(matches!(
            session.answer("x", fixed_now()),
            Err(SessionError::AlreadyAnswered)
        ));

        session.mark_scored();
        assert!(session.ensure_advanceable().is_ok());
    }

    #[test]
    fn finish_happens_once() {
        let mut session = build(PracticeMode::Recognition, 2);
        session.ask_next(&catalog(), fixed_now()).unwrap();
        let summary = session.finish(fixed_now() + Duration::seconds(30)).unwrap();
        assert_eq!(summary.answered, 0);
        assert_eq!(summary.duration, Duration::seconds(30));
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert!(matches!(session.finish(fixed_now()), Err(SessionError::Completed)));
        assert!(matches!(
            session.ask_next(&catalog(), fixed_now()),
            Err(SessionError::Completed)
        ));
    }

    #[test]
    fn progress_counts_down() {
        let mut session = build(PracticeMode::Recognition, 3);
        let romaji = session
            .ask_next(&catalog(), fixed_now())
            .unwrap()
            .character
            .romaji()
            .to_owned();
        session.answer(&romaji, fixed_now()).unwrap();
        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.correct, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }
}
