use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};

/// Building heights, 1..=n.
pub type Height = u8;

/// An `n x n` grid of heights, stored row-major.
///
/// Grids built by this crate are Latin squares: every row and every column
/// holds each height `1..=n` exactly once. [`Grid::from_rows`] and
/// [`Grid::parse`] enforce that on the way in, and so does deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    n: usize,
    cells: Vec<Height>,
}

#[derive(Deserialize)]
struct RawGrid {
    n: usize,
    cells: Vec<Height>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        if raw.n == 0 || raw.cells.len() != raw.n * raw.n {
            return Err(Error::InvalidGrid(format!("expected {} cells for n={}, got {}", raw.n * raw.n, raw.n, raw.cells.len())));
        }
        let g = Self { n: raw.n, cells: raw.cells };
        if !g.is_latin() { return Err(Error::InvalidGrid("rows and columns must each contain 1..=n exactly once".into())); }
        Ok(g)
    }
}

impl Grid {
    /// The cyclic square: row `r` is `1..=n` rotated left by `r`.
    ///
    /// # Panics
    /// Panics if `n == 0` or `n > 255`.
    pub fn cyclic(n: usize) -> Self {
        assert!((1..=Height::MAX as usize).contains(&n), "n must be in range 1..=255");
        let cells = (0..n)
            .flat_map(|r| (0..n).map(move |c| ((r + c) % n + 1) as Height))
            .collect();
        Self { n, cells }
    }

    /// Wraps row-major cells without checking the Latin property.
    pub(crate) fn from_cells(n: usize, cells: Vec<Height>) -> Self {
        debug_assert_eq!(cells.len(), n * n);
        Self { n, cells }
    }

    pub fn from_rows(rows: Vec<Vec<Height>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 { return Err(Error::InvalidGrid("grid is empty".into())); }
        if let Some((r, row)) = rows.iter().find_position(|row| row.len() != n) {
            return Err(Error::InvalidGrid(format!("row {} has {} cells, expected {}", r + 1, row.len(), n)));
        }
        let g = Self { n, cells: rows.into_iter().flatten().collect() };
        if !g.is_latin() { return Err(Error::InvalidGrid("rows and columns must each contain 1..=n exactly once".into())); }
        Ok(g)
    }

    /// Parses whitespace separated heights, one row per line. Lines starting with
    /// `#` have the marker stripped, so the generator's own comment block parses.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim().trim_start_matches('#').trim();
            if line.is_empty() { continue; }
            let row = line
                .split_whitespace()
                .map(|tok| tok.parse::<Height>().map_err(|_| Error::InvalidGrid(format!("invalid height {tok:?}"))))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn n(&self) -> usize { self.n }

    pub fn get(&self, r: usize, c: usize) -> Height { self.cells[r * self.n + c] }

    pub fn cells(&self) -> &[Height] { &self.cells }

    pub fn row(&self, r: usize) -> &[Height] { &self.cells[r * self.n..(r + 1) * self.n] }

    pub fn col(&self, c: usize) -> Vec<Height> { (0..self.n).map(|r| self.get(r, c)).collect() }

    pub fn rows(&self) -> impl Iterator<Item = &[Height]> + '_ { self.cells.chunks(self.n) }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b { return; }
        for c in 0..self.n { self.cells.swap(a * self.n + c, b * self.n + c); }
    }

    pub(crate) fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b { return; }
        for r in 0..self.n { self.cells.swap(r * self.n + a, r * self.n + b); }
    }

    /// Relabels every `a` as `b` and every `b` as `a`.
    pub(crate) fn swap_values(&mut self, a: Height, b: Height) {
        for v in self.cells.iter_mut() {
            if *v == a { *v = b; } else if *v == b { *v = a; }
        }
    }

    pub fn is_latin(&self) -> bool {
        let n = self.n;
        if self.cells.len() != n * n { return false; }
        let mut seen = vec![false; n + 1];
        // rows
        for r in 0..n {
            seen.fill(false);
            for c in 0..n {
                let v = self.get(r, c) as usize;
                if v == 0 || v > n || seen[v] { return false; }
                seen[v] = true;
            }
        }
        // cols
        for c in 0..n {
            seen.fill(false);
            for r in 0..n {
                let v = self.get(r, c) as usize;
                if v == 0 || v > n || seen[v] { return false; }
                seen[v] = true;
            }
        }
        true
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}
