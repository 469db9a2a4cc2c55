use indicatif::{ProgressBar, ProgressStyle};
use primetune::engine::progress::{Progress, ProgressCallback};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders core progress events as an indicatif spinner on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    rounds: Arc<AtomicUsize>,
    show_candidates: bool,
}

impl CliProgressHandler {
    pub fn new(show_candidates: bool) -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());

        Self {
            pb: Arc::new(Mutex::new(pb)),
            rounds: Arc::new(AtomicUsize::new(0)),
            show_candidates,
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let rounds = self.rounds.clone();
        let show_candidates = self.show_candidates;

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.tick();
                }
                Progress::RoundStart { lineages } => {
                    let round = rounds.fetch_add(1, Ordering::Relaxed) + 1;
                    pb_guard.set_message(format!(
                        "Searching - round {round}, {lineages} live lineage(s)"
                    ));
                }
                Progress::RoundFinish => {}
                Progress::CandidateScored { param, score } => {
                    if show_candidates {
                        pb_guard.println(format!("  {param} -> {score}"));
                    }
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {msg}"));
                }
            }
        })
    }

    pub fn finish(&self) {
        if let Ok(pb) = self.pb.lock() {
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
