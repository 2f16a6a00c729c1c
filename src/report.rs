use anyhow::Result;
use colored::*;
use itertools::Itertools;
use serde::Serialize;
use skygen_core::{Clues, Grid, Puzzle};

#[derive(Serialize)]
struct PuzzleReport<'a> {
    size: usize,
    solution: &'a Grid,
    clues: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unique: Option<bool>,
}

#[derive(Serialize)]
struct SolveReport<'a> {
    size: usize,
    clues: Vec<usize>,
    solution: Option<&'a Grid>,
}

/// The generator's text output: commented header and solution, then the
/// quoted clue string a solver takes as input.
pub fn puzzle_text(puzzle: &Puzzle, unique: Option<bool>, color: bool) -> String {
    let n = puzzle.solution.n();
    let mut comments = vec![format!("# Skyscraper Puzzle (N={n})"), "# Solution board (for verification):".to_string()];
    comments.extend(puzzle.solution.rows().map(|row| format!("# {}", row.iter().join(" "))));
    if let Some(unique) = unique {
        comments.push(format!("# Unique solution: {}", if unique { "yes" } else { "no" }));
    }
    comments.push(String::new());
    comments.push("# Solver input string:".to_string());

    let mut s = String::new();
    for line in comments {
        s.push_str(&if color && !line.is_empty() { line.dimmed().to_string() } else { line });
        s.push('\n');
    }
    let clues = puzzle.clues.to_string();
    s.push_str(&if color { clues.bold().to_string() } else { clues });
    s.push('\n');
    s
}

pub fn puzzle_json(puzzle: &Puzzle, unique: Option<bool>) -> Result<String> {
    let report = PuzzleReport { size: puzzle.solution.n(), solution: &puzzle.solution, clues: puzzle.clues.to_flat(), unique };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn solve_text(clues: &Clues, solution: Option<&Grid>, color: bool) -> String {
    let mut s = format!("Solving for N={}\n", clues.n());
    match solution {
        Some(grid) => {
            let title = "Solution Found:";
            s.push_str(&format!("\n{}\n", if color { title.green().bold().to_string() } else { title.to_string() }));
            s.push_str(&grid.to_string());
        }
        None => {
            let msg = "No solution found.";
            s.push_str(&format!("{}\n", if color { msg.red().to_string() } else { msg.to_string() }));
        }
    }
    s
}

pub fn solve_json(clues: &Clues, solution: Option<&Grid>) -> Result<String> {
    let report = SolveReport { size: clues.n(), clues: clues.to_flat(), solution };
    Ok(serde_json::to_string_pretty(&report)?)
}
