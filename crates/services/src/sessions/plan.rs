use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

use kana_core::model::{Character, CharacterId, MasteryState, PracticeResult, ProgressRecord};

use super::question::QuestionKind;

/// Pool over-fetch factor relative to the requested pool size.
pub const POOL_OVERFETCH: usize = 2;
/// How many of the latest results are kept out of the next pick.
pub const RECENT_WINDOW: usize = 3;
/// Wrong options shown next to the right one.
pub const DISTRACTOR_COUNT: usize = 3;

/// Randomized selection of practice characters.
///
/// All randomness flows through one `StdRng`, so a seeded selector replays the
/// same pools, picks and option orders.
#[derive(Debug, Clone)]
pub struct PracticeSelector {
    rng: StdRng,
}

impl PracticeSelector {
    /// Selector seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic selector.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Order the catalog by mastery (least learned first), shuffling within each
    /// mastery band, and keep the first `POOL_OVERFETCH * pool_size` characters.
    ///
    /// Characters without a progress record count as not studied.
    pub fn build_pool(
        &mut self,
        catalog: &[Character],
        progress: &[ProgressRecord],
        pool_size: usize,
    ) -> Vec<Character> {
        let states: HashMap<CharacterId, MasteryState> = progress
            .iter()
            .map(|r| (r.character_id, r.mastery))
            .collect();

        let mut ranked: Vec<(MasteryState, &Character)> = catalog
            .iter()
            .map(|c| (states.get(&c.id()).copied().unwrap_or_default(), c))
            .collect();

        // shuffle, then a stable sort keeps the shuffled order inside each band
        ranked.shuffle(&mut self.rng);
        ranked.sort_by_key(|(state, _)| *state);

        ranked
            .into_iter()
            .take(pool_size.saturating_mul(POOL_OVERFETCH))
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Pick the next character, avoiding those in the last `RECENT_WINDOW` results.
    ///
    /// Falls back to the whole pool when every candidate was seen recently.
    /// Returns `None` only for an empty pool.
    pub fn select_next<'a>(
        &mut self,
        pool: &'a [Character],
        recent: &[PracticeResult],
    ) -> Option<&'a Character> {
        let skip = recent.len().saturating_sub(RECENT_WINDOW);
        let excluded: HashSet<CharacterId> =
            recent[skip..].iter().map(|r| r.character_id).collect();

        let candidates: Vec<&Character> = pool
            .iter()
            .filter(|c| !excluded.contains(&c.id()))
            .collect();

        if candidates.is_empty() {
            pool.choose(&mut self.rng)
        } else {
            candidates.choose(&mut self.rng).copied()
        }
    }

    /// Answer options for a multiple-choice question: up to `count` distinct
    /// distractors drawn from the other characters, plus the right answer,
    /// shuffled.
    pub fn options(
        &mut self,
        correct: &Character,
        catalog: &[Character],
        kind: QuestionKind,
        count: usize,
    ) -> Vec<String> {
        let answer = kind.target_of(correct);
        let mut seen: HashSet<&str> = HashSet::from([answer]);
        let distractors: Vec<&str> = catalog
            .iter()
            .filter(|c| c.id() != correct.id())
            .map(|c| kind.target_of(c))
            .filter(|value| seen.insert(*value))
            .collect();

        let mut options: Vec<String> = distractors
            .choose_multiple(&mut self.rng, count)
            .map(|value| (*value).to_owned())
            .collect();
        options.push(answer.to_owned());
        options.shuffle(&mut self.rng);
        options
    }

    /// Uniformly pick a question direction for multiple-choice mode.
    pub fn pick_kind(&mut self) -> QuestionKind {
        *[QuestionKind::Recognition, QuestionKind::Production]
            .choose(&mut self.rng)
            .unwrap_or(&QuestionKind::Recognition)
    }
}

impl Default for PracticeSelector {
    fn default() -> Self {
        Self::new()
    }
}
