use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};
use crate::grid::{Grid, Height};

/// Number of buildings visible when scanning `line` from its first element:
/// the count of strict prefix maxima.
pub fn count_visible<I>(line: I) -> usize
where
    I: IntoIterator<Item = Height>,
{
    let mut tallest = 0;
    let mut seen = 0;
    for h in line {
        if h > tallest { tallest = h; seen += 1; }
    }
    seen
}

/// The peripheral clues of an `n x n` puzzle. Each side is indexed by
/// row (left, right) or column (top, bottom) in grid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClues")]
pub struct Clues {
    pub top: Vec<usize>,
    pub bottom: Vec<usize>,
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

#[derive(Deserialize)]
struct RawClues {
    top: Vec<usize>,
    bottom: Vec<usize>,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl TryFrom<RawClues> for Clues {
    type Error = Error;

    fn try_from(raw: RawClues) -> Result<Self> {
        let clues = Self { top: raw.top, bottom: raw.bottom, left: raw.left, right: raw.right };
        clues.validate()?;
        Ok(clues)
    }
}

impl Clues {
    pub fn from_grid(grid: &Grid) -> Self {
        let n = grid.n();
        let mut clues = Self { top: vec![0; n], bottom: vec![0; n], left: vec![0; n], right: vec![0; n] };
        for (i, row) in grid.rows().enumerate() {
            clues.left[i] = count_visible(row.iter().copied());
            clues.right[i] = count_visible(row.iter().rev().copied());
        }
        for j in 0..n {
            let col = grid.col(j);
            clues.top[j] = count_visible(col.iter().copied());
            clues.bottom[j] = count_visible(col.iter().rev().copied());
        }
        clues
    }

    /// Splits a flat `top ++ bottom ++ left ++ right` sequence.
    pub fn from_flat(values: &[usize]) -> Result<Self> {
        if values.is_empty() || values.len() % 4 != 0 { return Err(Error::InvalidClueCount(values.len())); }
        let n = values.len() / 4;
        let side = |k: usize| values[k * n..(k + 1) * n].to_vec();
        let clues = Self { top: side(0), bottom: side(1), left: side(2), right: side(3) };
        clues.validate()?;
        Ok(clues)
    }

    /// All four sides have the same non-zero length `n` and every clue is in `1..=n`.
    pub fn validate(&self) -> Result<()> {
        let n = self.n();
        let sides = [&self.top, &self.bottom, &self.left, &self.right];
        if n == 0 || sides.iter().any(|s| s.len() != n) {
            return Err(Error::InvalidClueCount(sides.iter().map(|s| s.len()).sum()));
        }
        if let Some(value) = self.to_flat().into_iter().find(|&v| v < 1 || v > n) {
            return Err(Error::ClueOutOfRange { value, n });
        }
        Ok(())
    }

    /// Parses the solver input string: whitespace separated integers,
    /// optionally wrapped in double quotes.
    pub fn parse(text: &str) -> Result<Self> {
        let values = text
            .split(|ch: char| ch.is_whitespace() || ch == '"')
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<usize>().map_err(|_| Error::InvalidClueToken(tok.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Self::from_flat(&values)
    }

    pub fn n(&self) -> usize { self.top.len() }

    pub fn to_flat(&self) -> Vec<usize> {
        self.top.iter().chain(&self.bottom).chain(&self.left).chain(&self.right).copied().collect()
    }
}

/// Formats as the quoted solver input string.
impl Display for Clues {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.to_flat().iter().join(" "))
    }
}
