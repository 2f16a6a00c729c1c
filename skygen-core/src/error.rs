use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("size must be between {min} and {max} (got {size})")]
    InvalidSize { size: usize, min: usize, max: usize },

    #[error("number of clues must be a non-zero multiple of 4 (got {0})")]
    InvalidClueCount(usize),
    #[error("invalid clue {0:?}: expected an integer")]
    InvalidClueToken(String),
    #[error("clue {value} out of range: clues must be between 1 and {n}")]
    ClueOutOfRange { value: usize, n: usize },

    /// Permutation tables grow as n!, so the solver refuses large orders.
    #[error("cannot solve a {size}x{size} puzzle (solver supports up to {max})")]
    SizeTooLargeToSolve { size: usize, max: usize },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}
