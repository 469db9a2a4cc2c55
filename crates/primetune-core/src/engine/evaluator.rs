use tracing::{debug, info, trace};

use super::context::SearchContext;
use super::error::EngineError;
use super::progress::Progress;

/// Runs one evaluation step for a `(base, stride)` pair captured in the
/// round snapshot.
///
/// The step touches the shared state only through its atomic operations, so
/// it may run concurrently with the steps of every other lineage in the
/// round. Exactly one of the following happens: the stride advances, the
/// lineage is retired (possibly spawning a backtracked replacement), or the
/// scorer fails and the error aborts the round.
pub fn run(ctx: &SearchContext<'_>, base: u64, stride: u64) -> Result<(), EngineError> {
    let config = ctx.config;
    let state = ctx.state;

    let baseline = state.lineage_score(base);

    // A missing score past stride 2 means a concurrent step already retired
    // this lineage; removing it again is idempotent.
    if stride > 2 && baseline.is_none() {
        state.remove_lineage(base);
        return Ok(());
    }
    let baseline = baseline.unwrap_or(0.0);

    // An unrepresentable product lies beyond any window, bounded or not.
    let candidate = match base.checked_mul(stride) {
        Some(candidate) => candidate,
        None => {
            state.remove_lineage(base);
            return Ok(());
        }
    };

    if candidate < config.min_value {
        // Too small to reach the window yet; keep stretching the stride.
        state.advance_lineage(base);
        return Ok(());
    } else if candidate > config.max_value {
        state.remove_lineage(base);
        trace!(base, stride, candidate, "Lineage exhausted its range");
        return Ok(());
    }

    if config.verbose {
        info!(candidate, "Processing candidate");
    }

    // A score recorded by any lineage, or a claim held by a task still
    // scoring this candidate, spares us the scorer call.
    if !state.try_claim_candidate(candidate) {
        state.advance_lineage(base);
        return Ok(());
    }

    let score = config.scorer.score(candidate)?;

    if config.verbose {
        info!(candidate, score, "Candidate scored");
    }
    ctx.reporter.report(Progress::CandidateScored {
        param: candidate,
        score,
    });

    state.record_candidate_score(candidate, score);
    // The lineage slot always holds the most recently computed score,
    // improving or not; the branch decision below compares against the
    // baseline read before this step.
    state.record_lineage_score(base, score);

    if config.direction.stalled(score, baseline) {
        state.remove_lineage(base);
        state.remove_lineage_score(base);

        if stride > 2 {
            // At least one improving step preceded this stall: restart one
            // step back at the finest stride, keeping the last known-good
            // score as the new baseline.
            let replacement = base * (stride - 1);
            state.insert_lineage(replacement, 2);
            state.record_lineage_score(replacement, baseline);
            debug!(base, stride, replacement, "Branch-reduced lineage");
        } else {
            debug!(base, stride, "Lineage retired without ever improving");
        }
        return Ok(());
    }

    state.advance_lineage(base);
    Ok(())
}
