//! Lazor Puzzle Solver
//!
//! Reads `.bff` puzzle files, searches for a placement of the movable blocks
//! that routes the lasers through every target, and prints the solved board.
//! Set `RUST_LOG=debug` to follow the search.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use lazor::grid::{format_board, Board};
use lazor::persistence::{format_report, save_report};
use lazor::{parser, simulate, solve, Placement, SearchConfig, SearchOutcome, TraceLimits};

/// Solves Lazor laser-routing puzzles.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct LimitArgs {
    /// Transitions a single beam may make before it is cut off.
    #[arg(long, default_value_t = TraceLimits::default().max_steps_per_beam)]
    max_steps: usize,
    /// Beams one simulation may create, split-offs included.
    #[arg(long, default_value_t = TraceLimits::default().max_beams)]
    max_beams: usize,
}

impl LimitArgs {
    fn limits(&self) -> TraceLimits {
        TraceLimits {
            max_steps_per_beam: self.max_steps,
            max_beams: self.max_beams,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Solve puzzle files and print each solved board.
    Solve {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        limits: LimitArgs,
        /// Give up after trying this many placements.
        #[arg(long)]
        max_candidates: Option<usize>,
        /// Worker threads for the search (defaults to one per core).
        #[arg(long)]
        threads: Option<usize>,
        /// Search on the calling thread in a fixed order.
        #[arg(long)]
        sequential: bool,
        /// Write `<name>_solved.txt` next to each solved puzzle.
        #[arg(long)]
        save: bool,
    },
    /// Trace the lasers over the fixed blocks only and print the beam paths.
    Trace {
        file: PathBuf,
        #[command(flatten)]
        limits: LimitArgs,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            files,
            limits,
            max_candidates,
            threads,
            sequential,
            save,
        } => {
            if let Some(threads) = threads {
                if let Err(e) = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                {
                    eprintln!("Failed to start {} worker threads: {}", threads, e);
                    return ExitCode::FAILURE;
                }
            }
            let config = SearchConfig {
                limits: limits.limits(),
                max_candidates,
                parallel: !sequential,
            };
            let mut failed = 0;
            for file in &files {
                if !run_solve(file, &config, save) {
                    failed += 1;
                }
            }
            if failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Trace { file, limits } => run_trace(&file, &limits.limits()),
    }
}

/// Solves one puzzle file, returning whether a solution was found.
fn run_solve(path: &Path, config: &SearchConfig, save: bool) -> bool {
    let puzzle = match parser::load(path) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return false;
        }
    };

    let report = match solve(&puzzle, config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return false;
        }
    };

    match report.outcome {
        SearchOutcome::Solved(solution) => {
            println!(
                "{}: solved after {} candidates",
                path.display(),
                report.stats.candidates
            );
            print!("{}", format_board(&puzzle, &solution.placement));
            if save {
                match save_report(path, &puzzle, &solution) {
                    Ok(written) => println!("Wrote {}", written.display()),
                    Err(e) => eprintln!("Failed to save report: {}", e),
                }
            }
            true
        }
        SearchOutcome::Unsolvable => {
            println!(
                "{}: no solution ({} candidates tried)",
                path.display(),
                report.stats.candidates
            );
            false
        }
        SearchOutcome::BudgetExceeded => {
            println!(
                "{}: no solution within budget ({} candidates tried); raise --max-steps, --max-beams or --max-candidates",
                path.display(),
                report.stats.candidates
            );
            false
        }
    }
}

/// Prints the beams of a puzzle with none of its movable blocks placed.
fn run_trace(path: &Path, limits: &TraceLimits) -> ExitCode {
    let puzzle = match parser::load(path) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let board = Board::from_puzzle(&puzzle);
    match simulate(&board, &puzzle.lasers, &puzzle.targets, limits) {
        Ok(trace) => {
            print!("{}", format_report(&puzzle, &Placement::new(), &trace));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lazor::{Block, CellCoord};

    fn sequential() -> SearchConfig {
        SearchConfig {
            parallel: false,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_flags_parse() {
        let cli = Cli::try_parse_from([
            "lazor",
            "solve",
            "a.bff",
            "b.bff",
            "--max-steps",
            "50",
            "--sequential",
        ])
        .unwrap();
        let Command::Solve {
            files,
            limits,
            sequential,
            save,
            ..
        } = cli.command
        else {
            panic!("expected solve");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(limits.limits().max_steps_per_beam, 50);
        assert_eq!(limits.limits().max_beams, TraceLimits::default().max_beams);
        assert!(sequential);
        assert!(!save);
    }

    #[test]
    fn test_sample_puzzles_solve() {
        let samples = [
            include_str!("../puzzles/corner.bff"),
            include_str!("../puzzles/diamond.bff"),
            include_str!("../puzzles/split.bff"),
        ];
        for text in samples {
            let puzzle = parser::parse_bff(text).unwrap();
            let report = solve(&puzzle, &SearchConfig::default()).unwrap();
            assert!(report.solution().is_some());
        }
    }

    #[test]
    fn test_split_sample_first_solution() {
        let puzzle = parser::parse_bff(include_str!("../puzzles/split.bff")).unwrap();
        let report = solve(&puzzle, &sequential()).unwrap();
        let solution = report.solution().unwrap();
        assert_eq!(
            solution.placement,
            Placement::from([(CellCoord::new(1, 0), Block::Splitter)])
        );
        insta::assert_snapshot!(format_board(&puzzle, &solution.placement), @"o C o");
    }
}
