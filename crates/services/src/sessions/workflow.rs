use std::sync::Arc;

use kana_core::model::{
    Catalog, PracticeMode, PracticeResult, PracticeSession, PracticeSettings, ProgressRecord,
    SessionSummary,
};

use super::plan::PracticeSelector;
use super::question::Question;
use super::service::ActiveSession;
use crate::Clock;
use crate::error::SessionError;
use crate::progress_store::ProgressStore;

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub result: PracticeResult,
    /// The character's record after the attempt was applied.
    pub progress: ProgressRecord,
    /// Whether this answer used up the session's question budget.
    pub is_last: bool,
}

/// What follows a scored question.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next(Question),
    Finished(SessionSummary),
}

/// Orchestrates practice sessions against the catalog and the progress store.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressStore>,
    settings: PracticeSettings,
    seed: Option<u64>,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: Arc<ProgressStore>) -> Self {
        Self {
            clock,
            catalog,
            progress,
            settings: PracticeSettings::standard(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PracticeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Make every session's selection reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    fn selector(&self) -> PracticeSelector {
        self.seed
            .map_or_else(PracticeSelector::new, PracticeSelector::seeded)
    }

    /// Start a session and ask its first question.
    ///
    /// `question_count` falls back to the configured questions per session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuestionCount` for a zero or oversized
    /// count and `SessionError::Empty` if the catalog yields no pool.
    pub async fn start_session(
        &self,
        mode: PracticeMode,
        question_count: Option<u32>,
    ) -> Result<ActiveSession, SessionError> {
        let total = PracticeSettings::check_questions(
            question_count.unwrap_or_else(|| self.settings.questions_per_session()),
        )?;
        let now = self.clock.now();

        let progress = self.progress.list_all().await;
        let mut selector = self.selector();
        let pool_size = usize::try_from(total).unwrap_or(usize::MAX);
        let pool = selector.build_pool(self.catalog.characters(), &progress, pool_size);

        let mut session = ActiveSession::new(PracticeSession::new(mode, total, now), pool, selector)?;
        session.ask_next(self.catalog.characters(), now)?;
        log::debug!(
            "started {mode} session {} with {} questions from a pool of {}",
            session.id(),
            total,
            session.pool().len()
        );
        Ok(session)
    }

    /// Score the answer to the current question and record the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` when called twice for the same
    /// question and `SessionError::Completed` for an ended session.
    pub async fn check_answer(
        &self,
        session: &mut ActiveSession,
        input: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let result = session.answer(input, self.clock.now())?;
        let progress = self
            .progress
            .record_attempt(result.character_id, result.is_correct)
            .await;
        session.mark_scored();

        log::debug!(
            "character {} answered {:?}, {}",
            result.character_id,
            result.user_answer,
            if result.is_correct { "correct" } else { "wrong" }
        );

        Ok(AnswerOutcome {
            result,
            progress,
            is_last: session.is_exhausted(),
        })
    }

    /// Move to the next question, or end the session once the budget is spent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` before the current question is scored
    /// and `SessionError::Completed` for an ended session.
    pub async fn advance(&self, session: &mut ActiveSession) -> Result<Advance, SessionError> {
        session.ensure_advanceable()?;
        if session.is_exhausted() {
            return self.end_session(session).await.map(Advance::Finished);
        }
        let question = session
            .ask_next(self.catalog.characters(), self.clock.now())?
            .clone();
        Ok(Advance::Next(question))
    }

    /// End the session now, even if questions remain.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already ended.
    pub async fn end_session(
        &self,
        session: &mut ActiveSession,
    ) -> Result<SessionSummary, SessionError> {
        let summary = session.finish(self.clock.now())?;
        log::info!(
            "{} session {} finished: {}/{} correct ({:.1}%) in {}s",
            summary.mode,
            summary.session_id,
            summary.correct,
            summary.total_questions,
            summary.accuracy,
            summary.duration.num_seconds()
        );
        self.progress.record_session(&summary).await;
        Ok(summary)
    }
}
