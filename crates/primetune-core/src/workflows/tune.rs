use tracing::{info, instrument};

use crate::engine::config::SearchConfig;
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::RoundScheduler;
use crate::engine::state::{SearchState, TuneResult};

/// Runs a complete search for the best parameter under `config`.
///
/// Rounds of concurrent per-lineage evaluations run until no lineage
/// remains, then the memoized candidate with the extreme score is returned.
/// The scorer is invoked at most once per distinct candidate and never with
/// an argument outside the configured window.
#[instrument(skip_all, name = "tune_workflow")]
pub fn run(config: &SearchConfig, reporter: &ProgressReporter) -> Result<TuneResult, EngineError> {
    // === Phase 0: Seeding ===
    reporter.report(Progress::PhaseStart { name: "Seeding" });
    info!(
        branches = config.branches,
        min_value = config.min_value,
        unbounded = config.is_unbounded(),
        direction = %config.direction,
        "Seeding prime lineages."
    );
    let state = SearchState::seeded(config);
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Round-based search ===
    reporter.report(Progress::PhaseStart { name: "Searching" });
    let scheduler = RoundScheduler::with_default_limit()?;
    info!(
        max_in_flight = scheduler.max_in_flight(),
        "Worker pool ready."
    );

    let ctx = SearchContext::new(config, &state, reporter);
    let mut rounds = 0usize;
    loop {
        let snapshot = state.lineage_snapshot();
        if snapshot.is_empty() {
            break;
        }

        reporter.report(Progress::RoundStart {
            lineages: snapshot.len(),
        });
        scheduler.run_round(&snapshot, &ctx)?;
        reporter.report(Progress::RoundFinish);
        rounds += 1;
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Extraction ===
    reporter.report(Progress::PhaseStart { name: "Extracting" });
    let (best_param, best_score) =
        state
            .best_candidate(config.direction)
            .ok_or(EngineError::NoCandidates {
                min_value: config.min_value,
                max_value: config.max_value,
            })?;

    let result = TuneResult {
        best_param,
        best_score,
        evaluations: state.evaluated_count(),
        rounds,
    };
    info!(
        best_param,
        best_score,
        evaluations = result.evaluations,
        rounds,
        "Search complete."
    );
    reporter.report(Progress::PhaseFinish);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SearchConfigBuilder;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn run_search(config: &SearchConfig) -> TuneResult {
        run(config, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn maximizes_over_a_bounded_window() {
        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(30)
            .branches(8)
            .maximize(true)
            .scorer(|x: u64| if x <= 21 { x as f64 } else { 0.0 })
            .build()
            .unwrap();

        let result = run_search(&config);
        assert_eq!(result.best_param, 21);
        assert_eq!(result.best_score, 21.0);
    }

    #[test]
    fn minimizes_over_a_bounded_window() {
        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(30)
            .branches(8)
            .maximize(false)
            .scorer(|x: u64| if x < 21 { 30.0 } else { x as f64 })
            .build()
            .unwrap();

        let result = run_search(&config);
        assert_eq!(result.best_param, 21);
        assert_eq!(result.best_score, 21.0);
    }

    #[test]
    fn maximizes_with_a_raised_floor() {
        let config = SearchConfigBuilder::new()
            .min_value(14)
            .max_value(50)
            .branches(8)
            .maximize(true)
            .scorer(|x: u64| if x > 21 { 20.0 } else { x as f64 })
            .build()
            .unwrap();

        let result = run_search(&config);
        assert_eq!(result.best_param, 21);
        assert_eq!(result.best_score, 21.0);
    }

    #[test]
    fn maximizes_over_an_unbounded_window() {
        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(-1)
            .branches(8)
            .maximize(true)
            .scorer(|x: u64| if x <= 21 { x as f64 } else { 0.0 })
            .build()
            .unwrap();

        let result = run_search(&config);
        assert!(config.is_unbounded());
        assert_eq!(result.best_param, 21);
    }

    #[test]
    fn the_scorer_only_sees_arguments_inside_the_window() {
        let seen: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
        let probe = Arc::clone(&seen);
        let config = SearchConfigBuilder::new()
            .min_value(14)
            .max_value(50)
            .branches(8)
            .scorer(move |x: u64| {
                probe.lock().unwrap().push(x);
                x as f64
            })
            .build()
            .unwrap();

        run_search(&config);

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|&x| (14..=50).contains(&x)));
    }

    #[test]
    fn the_scorer_is_never_invoked_twice_for_one_argument() {
        let counts: Arc<Mutex<HashMap<u64, usize>>> = Arc::new(Mutex::new(HashMap::new()));
        let probe = Arc::clone(&counts);
        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(200)
            .branches(12)
            .scorer(move |x: u64| {
                *probe.lock().unwrap().entry(x).or_insert(0) += 1;
                if x <= 90 { x as f64 } else { 0.0 }
            })
            .build()
            .unwrap();

        let result = run_search(&config);

        let counts = counts.lock().unwrap();
        assert!(counts.values().all(|&n| n == 1));
        assert_eq!(result.evaluations, counts.len());
    }

    #[test]
    fn a_unimodal_scorer_gives_a_deterministic_result() {
        let build = || {
            SearchConfigBuilder::new()
                .min_value(2)
                .max_value(120)
                .branches(8)
                .scorer(|x: u64| {
                    let x = x as f64;
                    // Strictly unimodal with its peak at 64.
                    -(x - 64.0) * (x - 64.0)
                })
                .build()
                .unwrap()
        };

        let first = run_search(&build());
        for _ in 0..4 {
            assert_eq!(run_search(&build()).best_param, first.best_param);
        }
    }

    #[test]
    fn a_finite_window_always_terminates_with_every_lineage_retired() {
        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(500)
            .branches(16)
            .scorer(|x: u64| (x % 17) as f64)
            .build()
            .unwrap();

        // A jagged scorer exercises plenty of branch-reduces before the
        // lineage set drains.
        let result = run_search(&config);
        assert!(result.rounds > 0);
        assert!(result.evaluations > 0);
        assert_eq!(result.best_score, 16.0);
    }

    #[test]
    fn an_unreachable_window_reports_no_candidates() {
        let config = SearchConfigBuilder::new()
            .min_value(40)
            .max_value(30)
            .branches(4)
            .scorer(|x: u64| x as f64)
            .build()
            .unwrap();

        let result = run(&config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::NoCandidates {
                min_value: 40,
                max_value: 30
            })
        ));
    }

    #[test]
    fn a_failing_scorer_aborts_the_run() {
        struct Failing;
        impl crate::core::score::Scorer for Failing {
            fn score(&self, param: u64) -> Result<f64, crate::core::score::ScoreError> {
                Err(crate::core::score::ScoreError::new(param, "boom"))
            }
        }

        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(30)
            .branches(4)
            .scorer(Failing)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Scoring { .. })));
    }

    #[test]
    fn progress_events_trace_the_run() {
        let events: Mutex<Vec<Progress>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        let config = SearchConfigBuilder::new()
            .min_value(2)
            .max_value(30)
            .branches(4)
            .scorer(|x: u64| if x <= 21 { x as f64 } else { 0.0 })
            .build()
            .unwrap();
        run(&config, &reporter).unwrap();
        drop(reporter);

        let events = events.lock().unwrap();
        let phases = events
            .iter()
            .filter(|e| matches!(e, Progress::PhaseStart { .. }))
            .count();
        assert_eq!(phases, 3);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Progress::RoundStart { .. }))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Progress::CandidateScored { .. }))
        );
    }
}
