use super::config::SearchConfig;
use super::progress::ProgressReporter;
use super::state::SearchState;

/// Borrowed view of everything an evaluation task needs, cheap to hand to
/// every task of a round.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub config: &'a SearchConfig,
    pub state: &'a SearchState,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        config: &'a SearchConfig,
        state: &'a SearchState,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            config,
            state,
            reporter,
        }
    }
}
