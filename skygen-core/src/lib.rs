//! Skyscraper puzzles: random Latin-square solutions, the visibility clues
//! derived from them, and solvers that work back from clues to a grid.

pub mod clues;
pub mod error;
pub mod generator;
pub mod grid;
pub mod solver;

pub use clues::{count_visible, Clues};
pub use error::{Error, Result};
pub use generator::{GeneratorConfig, Puzzle, PuzzleGenerator, MAX_SIZE, MIN_SIZE};
pub use grid::{Grid, Height};
pub use solver::{BacktrackingSolver, PermutationSolver, Solver, MAX_SOLVE_SIZE};
