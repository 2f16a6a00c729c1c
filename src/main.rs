use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use skygen::{report, Clues, GeneratorConfig, PermutationSolver, PuzzleGenerator, Solver};
use skygen_core::solver::MAX_SOLVE_SIZE;
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "skygen", version, about = "Generate random Skyscraper puzzles, or solve one from its clues")]
struct Cli {
    /// Size of the grid (e.g. 4 for a 4x4 grid), between 3 and 15.
    #[arg(default_value_t = 4)]
    size: usize,

    /// Seed for reproducible puzzles. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also report whether the clues admit exactly one solution (sizes up to 9).
    #[arg(long)]
    check_unique: bool,

    /// Solve a clue string ("top bottom left right") instead of generating one.
    #[arg(long)]
    solve: bool,

    /// File holding the clue string for --solve. If omitted, reads from stdin.
    #[arg(short, long, requires = "solve")]
    input: Option<PathBuf>,

    /// Colorize text output
    #[arg(long)]
    color: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format { Text, Json }

fn read_clues(input: &Option<PathBuf>) -> Result<Clues> {
    let s = match input {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
        None => {
            use std::io::{self, Read};
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    Clues::parse(&s).context("parse clues")
}

fn run_solve(cli: &Cli) -> Result<()> {
    let clues = read_clues(&cli.input)?;
    let mut solver = PermutationSolver::new();
    info!("solving {}x{} puzzle with {} solver", clues.n(), clues.n(), solver.name());
    let solution = solver.solve(&clues)?;
    match cli.format {
        Format::Text => print!("{}", report::solve_text(&clues, solution.as_ref(), cli.color)),
        Format::Json => println!("{}", report::solve_json(&clues, solution.as_ref())?),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.solve { return run_solve(&cli); }

    let config = GeneratorConfig::with_size(cli.size);
    let mut generator = PuzzleGenerator::new(cli.seed);
    let puzzle = generator.generate_puzzle(&config)?;
    info!("generated {}x{} puzzle", cli.size, cli.size);

    let unique = if !cli.check_unique {
        None
    } else if cli.size > MAX_SOLVE_SIZE {
        warn!("skipping uniqueness check: solver supports sizes up to {MAX_SOLVE_SIZE}");
        None
    } else {
        Some(PermutationSolver::new().has_unique_solution(&puzzle.clues)?)
    };

    match cli.format {
        Format::Text => print!("{}", report::puzzle_text(&puzzle, unique, cli.color)),
        Format::Json => println!("{}", report::puzzle_json(&puzzle, unique)?),
    }
    Ok(())
}
