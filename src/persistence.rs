//! Text reports for solved and traced boards.
//!
//! A report for `puzzles/foo.bff` is written next to it as
//! `puzzles/foo_solved.txt` and contains:
//! - the board in `.bff` grid notation with movable blocks filled in
//! - where each movable block went
//! - which targets were struck
//! - how every beam ended, and its path

use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::geometry::HalfCoord;
use crate::grid::format_board;
use crate::puzzle::{Placement, Puzzle};
use crate::scheduler::TraceReport;
use crate::solver::Solution;

const REPORT_SUFFIX: &str = "_solved.txt";

/// Where the report for the puzzle at `puzzle_path` goes.
pub fn report_path(puzzle_path: &Path) -> PathBuf {
    let stem = puzzle_path
        .file_stem()
        .unwrap_or_else(|| OsStr::new("puzzle"))
        .to_string_lossy();
    puzzle_path.with_file_name(format!("{stem}{REPORT_SUFFIX}"))
}

fn format_path(path: &[HalfCoord]) -> String {
    path.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ")
}

/// Formats the board, placement, coverage and beam paths of one trace.
pub fn format_report(puzzle: &Puzzle, placement: &Placement, trace: &TraceReport) -> String {
    let mut output = format_board(puzzle, placement);

    if !placement.is_empty() {
        output.push_str("\nPlaced blocks:\n");
        for (cell, block) in placement {
            output.push_str(&format!("  {} at {}\n", block.symbol(), cell));
        }
    }

    output.push_str(&format!(
        "\nTargets covered: {}/{}\n",
        trace.covered.len(),
        trace.required
    ));
    for target in &puzzle.targets {
        let status = if trace.covered.contains(target) {
            "hit"
        } else {
            "missed"
        };
        output.push_str(&format!("  {target} {status}\n"));
    }

    let counts = &trace.counts;
    output.push_str(&format!(
        "\nBeams: {} (exited {}, absorbed {}, cycled {}, truncated {})\n",
        counts.terminated(),
        counts.exited,
        counts.absorbed,
        counts.cycled,
        counts.truncated
    ));
    if trace.budget_exhausted {
        output.push_str("Trace budget exhausted; coverage may be incomplete\n");
    }
    for (i, path) in trace.paths.iter().enumerate() {
        output.push_str(&format!("Beam {}: {}\n", i + 1, format_path(path)));
    }

    output
}

/// Writes the report for `solution` next to the puzzle file and returns its
/// path.
pub fn save_report(
    puzzle_path: &Path,
    puzzle: &Puzzle,
    solution: &Solution,
) -> std::io::Result<PathBuf> {
    let path = report_path(puzzle_path);
    let mut file = File::create(&path)?;
    write!(
        file,
        "{}",
        format_report(puzzle, &solution.placement, &solution.trace)
    )?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}
