use rayon::prelude::*;
use tracing::debug;

use super::config::default_parallelism;
use super::context::SearchContext;
use super::error::EngineError;
use super::evaluator;

/// Dispatches evaluation rounds onto a worker pool with a fixed admission
/// bound.
///
/// The pool size caps how many evaluations run simultaneously, independent
/// of how many lineages are live; excess tasks of a round queue until a
/// worker frees up.
pub struct RoundScheduler {
    pool: rayon::ThreadPool,
}

impl RoundScheduler {
    pub fn new(max_in_flight: usize) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_in_flight.max(1))
            .thread_name(|i| format!("primetune-worker-{i}"))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Builds a scheduler sized to the available hardware parallelism.
    pub fn with_default_limit() -> Result<Self, EngineError> {
        Self::new(default_parallelism())
    }

    pub fn max_in_flight(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs one round: one evaluation task per snapshot entry. Returns only
    /// once every task of the round has finished (or one of them failed, in
    /// which case remaining tasks are not started and the error surfaces).
    ///
    /// The snapshot must be the private copy taken by the caller; tasks
    /// mutate the live lineage set only through the shared state, so
    /// lineages spawned during this round are first dispatched in the next
    /// one.
    pub fn run_round(
        &self,
        snapshot: &[(u64, u64)],
        ctx: &SearchContext<'_>,
    ) -> Result<(), EngineError> {
        debug!(lineages = snapshot.len(), "Dispatching round");
        self.pool.install(|| {
            snapshot
                .par_iter()
                .copied()
                .try_for_each(|(base, stride)| evaluator::run(ctx, base, stride))
        })
    }
}
