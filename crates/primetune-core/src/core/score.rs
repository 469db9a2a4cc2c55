use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Scoring failed for parameter {param}: {message}")]
pub struct ScoreError {
    pub param: u64,
    pub message: String,
}

impl ScoreError {
    pub fn new(param: u64, message: impl Into<String>) -> Self {
        Self {
            param,
            message: message.into(),
        }
    }
}

/// The scoring contract a search runs against.
///
/// Implementations must be safe to invoke concurrently with different
/// arguments and must not mutate state shared with other invocations. A
/// returned error aborts the whole run; there is no meaningful partial
/// result for a failed scorer invocation.
pub trait Scorer: Send + Sync {
    fn score(&self, param: u64) -> Result<f64, ScoreError>;
}

impl<F> Scorer for F
where
    F: Fn(u64) -> f64 + Send + Sync,
{
    fn score(&self, param: u64) -> Result<f64, ScoreError> {
        Ok(self(param))
    }
}

/// Which extreme of the score the search is driving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    pub fn from_maximize(maximize: bool) -> Self {
        if maximize {
            Direction::Maximize
        } else {
            Direction::Minimize
        }
    }

    /// The worst representable score for this direction, used to initialize
    /// every lineage's score slot so that the first real score always counts
    /// as progress.
    pub fn worst_score(self) -> f64 {
        match self {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        }
    }

    /// Whether a freshly computed score fails to improve on `baseline`.
    ///
    /// The operators differ between the directions: maximization stalls on
    /// `new_score <= baseline`, minimization only on `new_score > baseline`,
    /// so an equal score ends a maximizing lineage but keeps a minimizing
    /// one advancing.
    pub fn stalled(self, new_score: f64, baseline: f64) -> bool {
        match self {
            Direction::Maximize => new_score <= baseline,
            Direction::Minimize => new_score > baseline,
        }
    }

    /// Whether score `a` is strictly preferable to score `b`.
    pub fn prefers(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => write!(f, "maximize"),
            Direction::Minimize => write!(f, "minimize"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_scores_lose_to_any_real_score() {
        assert!(Direction::Maximize.prefers(-1.0e300, Direction::Maximize.worst_score()));
        assert!(Direction::Minimize.prefers(1.0e300, Direction::Minimize.worst_score()));
    }

    #[test]
    fn maximize_stalls_on_equal_scores() {
        assert!(Direction::Maximize.stalled(5.0, 5.0));
        assert!(Direction::Maximize.stalled(4.9, 5.0));
        assert!(!Direction::Maximize.stalled(5.1, 5.0));
    }

    #[test]
    fn minimize_continues_on_equal_scores() {
        assert!(!Direction::Minimize.stalled(5.0, 5.0));
        assert!(!Direction::Minimize.stalled(4.9, 5.0));
        assert!(Direction::Minimize.stalled(5.1, 5.0));
    }

    #[test]
    fn first_score_never_stalls_against_the_sentinel() {
        assert!(!Direction::Maximize.stalled(-1.0e12, Direction::Maximize.worst_score()));
        assert!(!Direction::Minimize.stalled(1.0e12, Direction::Minimize.worst_score()));
    }

    #[test]
    fn closures_are_scorers() {
        let scorer = |x: u64| x as f64 * 2.0;
        assert_eq!(scorer.score(21).unwrap(), 42.0);
    }
}
