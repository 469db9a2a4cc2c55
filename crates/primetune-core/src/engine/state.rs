use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::config::SearchConfig;
use crate::core::primes::first_n_primes;
use crate::core::score::Direction;

/// Final outcome of a search run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuneResult {
    /// The parameter with the extreme memoized score.
    pub best_param: u64,
    /// Its score, equal to the true extreme over every scored candidate.
    pub best_score: f64,
    /// Number of distinct candidates the scorer was invoked on.
    pub evaluations: usize,
    /// Number of dispatch rounds the search took.
    pub rounds: usize,
}

#[derive(Debug, Default)]
struct StateMaps {
    /// Live lineages: seed -> current stride.
    strides: HashMap<u64, u64>,
    /// Most recently computed score per live lineage.
    lineage_scores: HashMap<u64, f64>,
    /// Write-once memo of every candidate ever scored.
    candidate_scores: HashMap<u64, f64>,
    /// Candidates claimed for scoring, including ones whose score is still
    /// being computed. Strictly a superset of the memo keys.
    claimed: HashSet<u64>,
}

/// The shared store every concurrent evaluation task works against.
///
/// All shared collections sit behind one coarse mutex and are mutated
/// exclusively through the atomic operations below; none of the operations
/// holds the lock across a scorer invocation or a round barrier. Callers
/// never iterate the live maps; rounds work on the private copy returned
/// by [`SearchState::lineage_snapshot`].
#[derive(Debug, Default)]
pub struct SearchState {
    maps: Mutex<StateMaps>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial state for `config`: one lineage per prime seed at
    /// stride 1, each scored at the worst possible value for the configured
    /// direction.
    pub fn seeded(config: &SearchConfig) -> Self {
        let state = Self::new();
        {
            let mut maps = state.lock();
            for prime in first_n_primes(config.branches) {
                maps.strides.insert(prime, 1);
                maps.lineage_scores
                    .insert(prime, config.direction.worst_score());
            }
        }
        state
    }

    fn lock(&self) -> MutexGuard<'_, StateMaps> {
        // The scorer runs outside the lock, so a panicking scorer cannot
        // leave a critical section half-done; the maps stay usable.
        self.maps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_lineage(&self, base: u64, stride: u64) {
        self.lock().strides.insert(base, stride);
    }

    /// Advances a lineage's stride by one. A missing entry is created at
    /// stride 1.
    pub fn advance_lineage(&self, base: u64) {
        *self.lock().strides.entry(base).or_insert(0) += 1;
    }

    pub fn remove_lineage(&self, base: u64) {
        self.lock().strides.remove(&base);
    }

    pub fn lineage_stride(&self, base: u64) -> Option<u64> {
        self.lock().strides.get(&base).copied()
    }

    pub fn record_lineage_score(&self, base: u64, score: f64) {
        self.lock().lineage_scores.insert(base, score);
    }

    pub fn remove_lineage_score(&self, base: u64) {
        self.lock().lineage_scores.remove(&base);
    }

    pub fn lineage_score(&self, base: u64) -> Option<f64> {
        self.lock().lineage_scores.get(&base).copied()
    }

    /// Atomically claims `param` for scoring. Returns `false` when the
    /// candidate is already scored, or claimed by a task whose scorer call
    /// is still in flight; the caller must then not invoke the scorer.
    pub fn try_claim_candidate(&self, param: u64) -> bool {
        let mut maps = self.lock();
        if maps.candidate_scores.contains_key(&param) {
            return false;
        }
        maps.claimed.insert(param)
    }

    /// Records a candidate's score. Memo entries are write-once: a score
    /// already present is left untouched.
    pub fn record_candidate_score(&self, param: u64, score: f64) {
        let mut maps = self.lock();
        maps.claimed.insert(param);
        maps.candidate_scores.entry(param).or_insert(score);
    }

    pub fn candidate_score(&self, param: u64) -> Option<f64> {
        self.lock().candidate_scores.get(&param).copied()
    }

    pub fn lineage_count(&self) -> usize {
        self.lock().strides.len()
    }

    pub fn evaluated_count(&self) -> usize {
        self.lock().candidate_scores.len()
    }

    /// Takes a private, consistent copy of the live lineage set for one
    /// dispatch round, sorted by seed. Concurrent mutations after the copy
    /// is taken do not affect it.
    pub fn lineage_snapshot(&self) -> Vec<(u64, u64)> {
        let mut snapshot: Vec<(u64, u64)> = self
            .lock()
            .strides
            .iter()
            .map(|(&base, &stride)| (base, stride))
            .collect();
        snapshot.sort_unstable_by_key(|&(base, _)| base);
        snapshot
    }

    /// Scans the memo for the entry with the extreme score. Ties are broken
    /// by map iteration order; the returned score is always the true
    /// extreme. `None` only when nothing was ever scored.
    pub fn best_candidate(&self, direction: Direction) -> Option<(u64, f64)> {
        let maps = self.lock();
        let mut best: Option<(u64, f64)> = None;
        for (&param, &score) in &maps.candidate_scores {
            match best {
                Some((_, best_score)) if !direction.prefers(score, best_score) => {}
                _ => best = Some((param, score)),
            }
        }
        best
    }
}
