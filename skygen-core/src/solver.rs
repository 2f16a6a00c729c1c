use itertools::Itertools;
use log::{debug, trace};

use crate::clues::{count_visible, Clues};
use crate::error::{Error, Result};
use crate::grid::{Grid, Height};

/// Largest order the solvers accept. Permutation tables hold n! entries.
pub const MAX_SOLVE_SIZE: usize = 9;

pub trait Solver {
    fn name(&self) -> &str;

    /// Collects grids matching `clues`, stopping once `limit` are found.
    fn find_solutions(&mut self, clues: &Clues, limit: usize) -> Result<Vec<Grid>>;

    fn solve(&mut self, clues: &Clues) -> Result<Option<Grid>> {
        Ok(self.find_solutions(clues, 1)?.into_iter().next())
    }

    fn count_solutions(&mut self, clues: &Clues, limit: usize) -> Result<usize> {
        Ok(self.find_solutions(clues, limit)?.len())
    }

    fn has_unique_solution(&mut self, clues: &Clues) -> Result<bool> {
        Ok(self.count_solutions(clues, 2)? == 1)
    }
}

fn check_size(clues: &Clues) -> Result<usize> {
    clues.validate()?;
    let n = clues.n();
    if n > MAX_SOLVE_SIZE { return Err(Error::SizeTooLargeToSolve { size: n, max: MAX_SOLVE_SIZE }); }
    Ok(n)
}

type Mask = u16;

fn bit(v: Height) -> Mask { 1 << v }

/// All permutations of `1..=n`, bucketed by how many buildings are visible
/// from each end.
struct PermutationTable {
    n: usize,
    perms: Vec<Vec<Height>>,
    // by_views[front][back] -> indices into `perms`
    by_views: Vec<Vec<Vec<u32>>>,
}

impl PermutationTable {
    fn new(n: usize) -> Self {
        let perms: Vec<Vec<Height>> = (1..=n as Height).permutations(n).collect();
        let mut by_views = vec![vec![Vec::new(); n + 1]; n + 1];
        for (i, p) in perms.iter().enumerate() {
            let front = count_visible(p.iter().copied());
            let back = count_visible(p.iter().rev().copied());
            by_views[front][back].push(i as u32);
        }
        debug!("built permutation table for n={n}: {} permutations", perms.len());
        Self { n, perms, by_views }
    }

    fn lines(&self, front: &[usize], back: &[usize]) -> Vec<Vec<u32>> {
        front.iter().zip(back).map(|(&f, &b)| self.by_views[f][b].clone()).collect()
    }
}

/// Candidate permutations still alive for every row and every column.
#[derive(Clone)]
struct Lines {
    rows: Vec<Vec<u32>>,
    cols: Vec<Vec<u32>>,
}

/// Line-based solver: each row and column keeps the list of permutations
/// compatible with its two clues, and the lists prune each other until
/// nothing changes. Branches on the cell with the fewest possible heights.
#[derive(Default)]
pub struct PermutationSolver {
    table: Option<PermutationTable>,
    nodes: usize,
}

impl PermutationSolver {
    pub fn new() -> Self { Self::default() }
}

impl Solver for PermutationSolver {
    fn name(&self) -> &str { "Permutation" }

    fn find_solutions(&mut self, clues: &Clues, limit: usize) -> Result<Vec<Grid>> {
        let n = check_size(clues)?;
        let table = match self.table.take() {
            Some(t) if t.n == n => t,
            _ => PermutationTable::new(n),
        };
        let lines = Lines { rows: table.lines(&clues.left, &clues.right), cols: table.lines(&clues.top, &clues.bottom) };
        let mut found = Vec::new();
        self.nodes = 0;
        if limit > 0 { search(&table, lines, limit, &mut found, &mut self.nodes); }
        self.table = Some(table);
        debug!("{} solver: {} solution(s) after {} nodes", self.name(), found.len(), self.nodes);
        Ok(found)
    }
}

fn search(table: &PermutationTable, mut lines: Lines, limit: usize, found: &mut Vec<Grid>, nodes: &mut usize) {
    *nodes += 1;
    if !propagate(table, &mut lines) { return; }

    let n = table.n;
    let row_masks = cell_masks(table, &lines.rows, true);
    let col_masks = cell_masks(table, &lines.cols, false);
    let branch = (0..n * n)
        .map(|idx| (idx, row_masks[idx] & col_masks[idx]))
        .filter(|&(_, m)| m.count_ones() > 1)
        .min_by_key(|&(_, m)| m.count_ones());

    let Some((idx, domain)) = branch else {
        if lines.rows.iter().all(|r| r.len() == 1) {
            let cells = lines.rows.iter().flat_map(|r| table.perms[r[0] as usize].iter().copied()).collect();
            found.push(Grid::from_cells(n, cells));
        }
        return;
    };

    let (r, c) = (idx / n, idx % n);
    for v in (1..=n as Height).filter(|&v| domain & bit(v) != 0) {
        trace!("branch: try {v} at r{},c{}", r + 1, c + 1);
        let mut child = lines.clone();
        child.rows[r].retain(|&p| table.perms[p as usize][c] == v);
        child.cols[c].retain(|&p| table.perms[p as usize][r] == v);
        search(table, child, limit, found, nodes);
        if found.len() >= limit { return; }
    }
}

/// Heights each cell can still take according to one family of lines,
/// row-major.
fn cell_masks(table: &PermutationTable, lines: &[Vec<u32>], lines_are_rows: bool) -> Vec<Mask> {
    let n = table.n;
    let mut masks = vec![0; n * n];
    for (i, cands) in lines.iter().enumerate() {
        for &p in cands {
            for (j, &v) in table.perms[p as usize].iter().enumerate() {
                let idx = if lines_are_rows { i * n + j } else { j * n + i };
                masks[idx] |= bit(v);
            }
        }
    }
    masks
}

/// Drops `target` permutations that put a height where `source` allows none.
/// Returns `None` when a line runs out of candidates.
fn prune(table: &PermutationTable, source: &[Vec<u32>], target: &mut [Vec<u32>], source_is_rows: bool) -> Option<bool> {
    let n = table.n;
    let masks = cell_masks(table, source, source_is_rows);
    let mut changed = false;
    for (i, cands) in target.iter_mut().enumerate() {
        let before = cands.len();
        cands.retain(|&p| {
            table.perms[p as usize].iter().enumerate().all(|(j, &v)| {
                let idx = if source_is_rows { j * n + i } else { i * n + j };
                masks[idx] & bit(v) != 0
            })
        });
        changed |= cands.len() < before;
        if cands.is_empty() { return None; }
    }
    Some(changed)
}

fn propagate(table: &PermutationTable, lines: &mut Lines) -> bool {
    loop {
        let Some(a) = prune(table, &lines.rows, &mut lines.cols, true) else { return false };
        let Some(b) = prune(table, &lines.cols, &mut lines.rows, false) else { return false };
        if !a && !b { return true; }
    }
}

/// Plain cell-by-cell backtracking in row-major order, checking clues as
/// lines fill up. Slow past n=6 but easy to trust.
#[derive(Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self { Self }
}

impl Solver for BacktrackingSolver {
    fn name(&self) -> &str { "Backtracking" }

    fn find_solutions(&mut self, clues: &Clues, limit: usize) -> Result<Vec<Grid>> {
        let n = check_size(clues)?;
        let mut cells = vec![0; n * n];
        let mut found = Vec::new();
        if limit > 0 { fill(clues, n, 0, &mut cells, limit, &mut found); }
        debug!("{} solver: {} solution(s)", self.name(), found.len());
        Ok(found)
    }
}

fn fill(clues: &Clues, n: usize, idx: usize, cells: &mut [Height], limit: usize, found: &mut Vec<Grid>) {
    if idx == n * n {
        found.push(Grid::from_cells(n, cells.to_vec()));
        return;
    }
    let (r, c) = (idx / n, idx % n);
    for v in 1..=n as Height {
        if (0..c).any(|cc| cells[r * n + cc] == v) || (0..r).any(|rr| cells[rr * n + c] == v) { continue; }
        cells[idx] = v;
        if fits(clues, n, cells, r, c) {
            fill(clues, n, idx + 1, cells, limit, found);
            if found.len() >= limit { return; }
        }
    }
    cells[idx] = 0;
}

/// Checks the clues touching the cell just placed at (r, c).
fn fits(clues: &Clues, n: usize, cells: &[Height], r: usize, c: usize) -> bool {
    let row = &cells[r * n..r * n + c + 1];
    let col = || (0..=r).map(move |rr| cells[rr * n + c]);
    if count_visible(row.iter().copied()) > clues.left[r] { return false; }
    if count_visible(col()) > clues.top[c] { return false; }
    if c + 1 == n {
        if count_visible(row.iter().copied()) != clues.left[r] { return false; }
        if count_visible(row.iter().rev().copied()) != clues.right[r] { return false; }
    }
    if r + 1 == n {
        if count_visible(col()) != clues.top[c] { return false; }
        let column: Vec<_> = col().collect();
        if count_visible(column.iter().rev().copied()) != clues.bottom[c] { return false; }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, PuzzleGenerator};
    use pretty_assertions::assert_eq;

    #[test]
    fn table_buckets_cover_all_permutations() {
        let t = PermutationTable::new(4);
        assert_eq!(t.perms.len(), 24);
        let total: usize = t.by_views.iter().flatten().map(Vec::len).sum();
        assert_eq!(total, 24);
        // only 1 2 3 4 shows four from the front
        assert_eq!(t.by_views[4][1].len(), 1);
        assert!(t.by_views[4][2].is_empty());
    }

    #[test]
    fn solves_generated_puzzles() {
        let mut generator = PuzzleGenerator::new(Some(11));
        let mut solver = PermutationSolver::new();
        for n in 3..=7 {
            let puzzle = generator.generate_puzzle(&GeneratorConfig::with_size(n)).unwrap();
            let grid = solver.solve(&puzzle.clues).unwrap().expect("generated clues are satisfiable");
            assert!(grid.is_latin());
            assert_eq!(Clues::from_grid(&grid), puzzle.clues);
        }
    }

    #[test]
    fn impossible_clues_have_no_solution() {
        // two sides both claiming the full staircase
        let clues = Clues::parse("3 3 3 3 3 3 3 3 3 3 3 3").unwrap();
        assert_eq!(PermutationSolver::new().solve(&clues).unwrap(), None);
        assert_eq!(BacktrackingSolver::new().solve(&clues).unwrap(), None);
    }

    #[test]
    fn solvers_agree_on_counts() {
        let mut generator = PuzzleGenerator::new(Some(5));
        for n in 3..=5 {
            let puzzle = generator.generate_puzzle(&GeneratorConfig::with_size(n)).unwrap();
            let a = PermutationSolver::new().count_solutions(&puzzle.clues, 50).unwrap();
            let b = BacktrackingSolver::new().count_solutions(&puzzle.clues, 50).unwrap();
            assert_eq!(a, b, "n={n}");
            assert!(a >= 1);
        }
    }

    #[test]
    fn ambiguous_clues_are_not_unique() {
        // four grids share these clues
        let clues = Clues::parse("2 1 3 2 3 2 2 1 2 1 2 3 2 3 2 1").unwrap();
        let grids = PermutationSolver::new().find_solutions(&clues, 10).unwrap();
        assert_eq!(grids.len(), 4);
        assert!(grids.iter().all(|g| g.is_latin() && Clues::from_grid(g) == clues));
        assert_eq!(grids.iter().collect::<std::collections::HashSet<_>>().len(), 4);
        assert_eq!(BacktrackingSolver::new().count_solutions(&clues, 10).unwrap(), 4);
        assert!(!PermutationSolver::new().has_unique_solution(&clues).unwrap());

        let cyclic = Clues::from_grid(&Grid::cyclic(3));
        assert!(PermutationSolver::new().has_unique_solution(&cyclic).unwrap());
    }

    #[test]
    fn oversized_clues_are_rejected() {
        let n = MAX_SOLVE_SIZE + 1;
        let clues = Clues { top: vec![1; n], bottom: vec![1; n], left: vec![1; n], right: vec![1; n] };
        assert_eq!(
            PermutationSolver::new().solve(&clues),
            Err(Error::SizeTooLargeToSolve { size: n, max: MAX_SOLVE_SIZE })
        );
    }

    #[test]
    fn zero_limit_finds_nothing() {
        let clues = Clues::from_grid(&Grid::cyclic(3));
        assert_eq!(PermutationSolver::new().count_solutions(&clues, 0).unwrap(), 0);
    }
}
