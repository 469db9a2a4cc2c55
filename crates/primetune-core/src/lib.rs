//! # primetune Core Library
//!
//! A concurrent discrete optimizer for positive-integer parameters. Given a
//! user-supplied scoring function over integers, primetune finds a parameter
//! that maximizes (or minimizes) the score without exhaustively evaluating the
//! allowed range, by running many independent local-search lineages in
//! parallel. Each lineage is seeded at a distinct prime number, advances by
//! multiplying its seed with an increasing stride while the score keeps
//! improving, and backtracks one step at a finer stride when progress stalls.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless building blocks: prime
//!   number generation (`primes`) and the scoring abstractions (`score`), i.e.
//!   the [`core::score::Scorer`] trait and the optimization
//!   [`core::score::Direction`].
//!
//! - **[`engine`]: The Logic Core.** This stateful layer implements the
//!   concurrent search machinery: the shared search state (`state`), the
//!   bounded round scheduler (`scheduler`), the per-lineage evaluation step
//!   (`evaluator`), configuration normalization (`config`), and progress
//!   reporting (`progress`).
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute a complete
//!   search run. [`workflows::tune::run`] is the single entry point for
//!   end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
