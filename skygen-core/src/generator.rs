use log::{debug, trace};
use rand::{seq::index, Rng, SeedableRng};

use crate::clues::Clues;
use crate::error::{Error, Result};
use crate::grid::{Grid, Height};

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub size: usize,
    /// Shuffle rounds per unit of size; `size * rounds_per_size` rounds in total.
    pub rounds_per_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self { Self { size: 4, rounds_per_size: 5 } }
}

impl GeneratorConfig {
    pub fn with_size(size: usize) -> Self { Self { size, ..Self::default() } }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(Error::InvalidSize { size: self.size, min: MIN_SIZE, max: MAX_SIZE });
        }
        Ok(())
    }
}

/// A generated instance: the hidden solution and the clues derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub solution: Grid,
    pub clues: Clues,
}

pub struct PuzzleGenerator {
    rng: rand::rngs::StdRng,
}

impl PuzzleGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => rand::rngs::StdRng::seed_from_u64(s),
            None => rand::rngs::StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn generate_solution(&mut self, config: &GeneratorConfig) -> Result<Grid> {
        config.validate()?;
        Ok(shuffled_latin_square(config.size, config.size * config.rounds_per_size, &mut self.rng))
    }

    pub fn generate_puzzle(&mut self, config: &GeneratorConfig) -> Result<Puzzle> {
        let solution = self.generate_solution(config)?;
        let clues = Clues::from_grid(&solution);
        Ok(Puzzle { solution, clues })
    }
}

/// Starts from the cyclic square and applies `rounds` rounds of row swap,
/// column swap and value relabeling. Each move maps Latin squares to Latin
/// squares.
///
/// # Panics
/// Panics if `n < 2` or `n > 255`.
pub fn shuffled_latin_square<R: Rng + ?Sized>(n: usize, rounds: usize, rng: &mut R) -> Grid {
    assert!((2..=Height::MAX as usize).contains(&n), "n must be in range 2..=255");
    let mut grid = Grid::cyclic(n);
    debug!("shuffling {n}x{n} cyclic square for {rounds} rounds");
    for round in 0..rounds {
        let (r1, r2) = distinct_pair(rng, n);
        grid.swap_rows(r1, r2);
        let (c1, c2) = distinct_pair(rng, n);
        grid.swap_cols(c1, c2);
        let (v1, v2) = distinct_pair(rng, n);
        let (v1, v2) = ((v1 + 1) as Height, (v2 + 1) as Height);
        grid.swap_values(v1, v2);
        trace!("round {round}: rows {r1}<->{r2}, cols {c1}<->{c2}, values {v1}<->{v2}");
    }
    grid
}

fn distinct_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (usize, usize) {
    let picked = index::sample(rng, n, 2);
    (picked.index(0), picked.index(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_size_in_range_is_latin() {
        let mut generator = PuzzleGenerator::new(Some(7));
        for n in MIN_SIZE..=MAX_SIZE {
            let g = generator.generate_solution(&GeneratorConfig::with_size(n)).unwrap();
            assert_eq!(g.n(), n);
            assert_eq!(g.cells().len(), n * n);
            assert!(g.is_latin(), "size {n} grid is not latin:\n{g}");
        }
    }

    #[test]
    fn size_bounds() {
        let mut generator = PuzzleGenerator::new(Some(1));
        for bad in [0, 2, 16, 100] {
            assert_eq!(
                generator.generate_solution(&GeneratorConfig::with_size(bad)),
                Err(Error::InvalidSize { size: bad, min: 3, max: 15 })
            );
        }
        assert!(generator.generate_solution(&GeneratorConfig::with_size(3)).is_ok());
        assert!(generator.generate_solution(&GeneratorConfig::with_size(15)).is_ok());
    }

    #[test]
    fn same_seed_same_puzzle() {
        let config = GeneratorConfig::with_size(6);
        let a = PuzzleGenerator::new(Some(42)).generate_puzzle(&config).unwrap();
        let b = PuzzleGenerator::new(Some(42)).generate_puzzle(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_rounds_is_cyclic() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        assert_eq!(shuffled_latin_square(5, 0, &mut rng), Grid::cyclic(5));
    }

    #[test]
    #[should_panic(expected = "n must be in range")]
    fn shuffle_needs_two_symbols() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        shuffled_latin_square(1, 5, &mut rng);
    }

    #[test]
    fn distinct_pair_never_repeats() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let (a, b) = distinct_pair(&mut rng, 3);
            assert!(a != b && a < 3 && b < 3);
        }
    }
}
