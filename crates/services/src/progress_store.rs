//! Cached, write-through progress store.
//!
//! The in-memory cache is authoritative for the life of the process. Every
//! mutation rewrites the backing files; a failed write is logged and the
//! change lives on in memory until the next successful save. A crash between
//! a mutation and its write loses that mutation.

use chrono::Duration;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use kana_core::model::{
    CharacterId, PracticeSettings, ProgressRecord, SessionSummary, UserStatistics,
};
use kana_core::stats;
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::ProgressError;

#[derive(Debug, Default)]
struct ProgressCache {
    records: BTreeMap<CharacterId, ProgressRecord>,
    statistics: UserStatistics,
}

impl ProgressCache {
    fn snapshot(&self) -> Vec<ProgressRecord> {
        self.records.values().cloned().collect()
    }
}

/// Per-character practice history with derived mastery and deck statistics.
pub struct ProgressStore {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
    catalog_size: u32,
    review_after: Duration,
    loaded: OnceCell<()>,
    cache: Mutex<ProgressCache>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>, catalog_size: u32) -> Self {
        Self {
            clock,
            repo,
            catalog_size,
            review_after: PracticeSettings::standard().review_after(),
            loaded: OnceCell::new(),
            cache: Mutex::new(ProgressCache::default()),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: &PracticeSettings) -> Self {
        self.review_after = settings.review_after();
        self
    }

    #[must_use]
    pub fn catalog_size(&self) -> u32 {
        self.catalog_size
    }

    /// Load persisted state once. Concurrent first callers wait for the single loader.
    async fn ensure_loaded(&self) {
        self.loaded
            .get_or_init(|| async {
                let records = match self.repo.load_progress().await {
                    Ok(records) => records,
                    Err(e) => {
                        log::warn!("failed to load progress, starting empty: {e}");
                        Vec::new()
                    }
                };
                let statistics = match self.repo.load_statistics().await {
                    Ok(statistics) => statistics.unwrap_or_default(),
                    Err(e) => {
                        log::warn!("failed to load statistics, starting from defaults: {e}");
                        UserStatistics::default()
                    }
                };

                let mut cache = self.cache.lock().await;
                cache.records = records
                    .into_iter()
                    .filter(|r| match r.validate() {
                        Ok(()) => true,
                        Err(e) => {
                            log::warn!("dropping progress for character {}: {e}", r.character_id);
                            false
                        }
                    })
                    .map(|r| (r.character_id, r))
                    .collect();
                cache.statistics = statistics;
                log::debug!("loaded progress for {} characters", cache.records.len());
            })
            .await;
    }

    async fn write_progress(&self, cache: &ProgressCache) {
        if let Err(e) = self.repo.save_progress(&cache.snapshot()).await {
            log::error!("failed to save progress, changes kept in memory: {e}");
        }
    }

    async fn refresh_statistics(&self, cache: &mut ProgressCache) {
        cache.statistics = stats::recompute_from(
            &cache.statistics,
            &cache.snapshot(),
            self.catalog_size,
            self.clock.now(),
        );
        if let Err(e) = self.repo.save_statistics(&cache.statistics).await {
            log::error!("failed to save statistics, changes kept in memory: {e}");
        }
    }

    /// Fetch a character's record, creating and persisting a fresh one if absent.
    pub async fn get(&self, character_id: CharacterId) -> ProgressRecord {
        self.ensure_loaded().await;
        let mut cache = self.cache.lock().await;
        if let Some(record) = cache.records.get(&character_id) {
            return record.clone();
        }
        let record = ProgressRecord::new(character_id, self.clock.now());
        cache.records.insert(character_id, record.clone());
        self.write_progress(&cache).await;
        self.refresh_statistics(&mut cache).await;
        record
    }

    /// Record one answer for a character and return the updated record.
    pub async fn record_attempt(&self, character_id: CharacterId, is_correct: bool) -> ProgressRecord {
        self.ensure_loaded().await;
        let now = self.clock.now();
        let mut cache = self.cache.lock().await;
        let record = cache
            .records
            .entry(character_id)
            .or_insert_with(|| ProgressRecord::new(character_id, now));
        record.apply_attempt(is_correct, now);
        let updated = record.clone();
        log::debug!(
            "character {character_id}: {} -> {:?} ({}/{})",
            if is_correct { "correct" } else { "incorrect" },
            updated.mastery,
            updated.correct_attempts,
            updated.total_attempts,
        );

        self.write_progress(&cache).await;
        self.refresh_statistics(&mut cache).await;
        updated
    }

    /// Snapshot of every record, ordered by character id.
    pub async fn list_all(&self) -> Vec<ProgressRecord> {
        self.ensure_loaded().await;
        self.cache.lock().await.snapshot()
    }

    /// Upsert a caller-built record, replacing any record for the same character.
    ///
    /// The mastery state is re-derived from the counters.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidRecord` if the counters are inconsistent.
    pub async fn save(&self, mut record: ProgressRecord) -> Result<ProgressRecord, ProgressError> {
        record.validate()?;
        record.reclassify();

        self.ensure_loaded().await;
        let mut cache = self.cache.lock().await;
        cache.records.insert(record.character_id, record.clone());
        self.write_progress(&cache).await;
        self.refresh_statistics(&mut cache).await;
        Ok(record)
    }

    /// Forget everything about a character. No-op if it has no record.
    pub async fn reset(&self, character_id: CharacterId) {
        self.ensure_loaded().await;
        let mut cache = self.cache.lock().await;
        if cache.records.remove(&character_id).is_some() {
            self.write_progress(&cache).await;
            self.refresh_statistics(&mut cache).await;
        }
    }

    /// Records that are not mastered or have gone stale, least recently studied first.
    pub async fn list_needing_practice(&self) -> Vec<ProgressRecord> {
        self.ensure_loaded().await;
        let now = self.clock.now();
        let cache = self.cache.lock().await;
        let mut due: Vec<ProgressRecord> = cache
            .records
            .values()
            .filter(|r| r.needs_practice(now, self.review_after))
            .cloned()
            .collect();
        due.sort_by_key(|r| r.last_studied);
        due
    }

    /// Recompute, persist and return the deck statistics.
    pub async fn statistics(&self) -> UserStatistics {
        self.ensure_loaded().await;
        let mut cache = self.cache.lock().await;
        self.refresh_statistics(&mut cache).await;
        cache.statistics.clone()
    }

    /// Count a finished session towards the lifetime totals.
    pub async fn record_session(&self, summary: &SessionSummary) -> UserStatistics {
        self.ensure_loaded().await;
        let mut cache = self.cache.lock().await;
        let secs = u64::try_from(summary.duration.num_seconds()).unwrap_or(0);
        cache.statistics.total_practice_sessions =
            cache.statistics.total_practice_sessions.saturating_add(1);
        cache.statistics.total_study_time_secs =
            cache.statistics.total_study_time_secs.saturating_add(secs);
        self.refresh_statistics(&mut cache).await;
        cache.statistics.clone()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
