pub mod report;

pub use skygen_core::{
    clues::Clues,
    generator::{GeneratorConfig, Puzzle, PuzzleGenerator},
    grid::Grid,
    solver::{PermutationSolver, Solver},
};
