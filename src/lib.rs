//! State model and automatic solver for a liquid-sorting puzzle.
//!
//! A puzzle is a row of fixed-capacity tubes holding stacks of colored
//! liquid units. A legal move pours the top same-color run of one tube onto
//! a compatible tube; the puzzle is solved when every tube is empty or full
//! of a single color.
//!
//! The crate covers three pieces:
//!
//! - [`PuzzleState`] ([`model`]): the container model, move legality and
//!   heuristic weights, and the canonical [`StateKey`] encoding.
//! - [`SolverGraph`] ([`solver`]): a budget-bounded depth-first search over
//!   encoded states that answers "best next move" queries for auto-play.
//! - [`PuzzleGenerator`] ([`generator`]): random deals retried until the
//!   solver confirms solvability.
//!
//! Rendering, animation and input belong to the consumer; this crate only
//! exposes the queries they need ([`PuzzleState::top_runs`],
//! [`PuzzleState::segments`], [`PuzzleState::encode`] for undo snapshots).
//!
//! ```
//! use rand::SeedableRng;
//! use tube_sort::{PuzzleGenerator, SolverGraph};
//!
//! let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(1);
//! let mut state = PuzzleGenerator::new(4).generate(&mut rng)?;
//! let mut graph = SolverGraph::new();
//! assert!(graph.recalculate(&state, &mut rng));
//! while let Some(step) = graph.get_best_step(&state.encode()) {
//!     state.transfer(step);
//! }
//! assert!(state.is_final());
//! # Ok::<(), tube_sort::GenerateError>(())
//! ```

pub mod generator;
pub mod model;
pub mod solver;

pub use self::{
    generator::{GenerateError, PuzzleGenerator},
    model::{
        ColorId, DecodeError, Move, ParseError, Pour, PuzzleState, StateKey, TUBE_CAPACITY, Tube,
    },
    solver::{DEFAULT_NODE_BUDGET, SearchLimits, SolverGraph},
};
