//! Placement search over movable blocks.
//!
//! Key points:
//! - Candidates are (cells chosen from the placeable ones) x (distinct
//!   arrangements of the block multiset over those cells)
//! - Arrangements come from lexicographic next-permutation over the sorted
//!   multiset, so swapping two identical blocks never yields a new candidate
//! - A cheap edge-guard filter skips candidates that seal a target between
//!   two opaque blocks before any beam is traced
//! - Cell combinations are sharded across rayon workers; the first worker to
//!   find a solution raises a shared stop flag

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use itertools::Itertools;
use rayon::prelude::*;

use crate::blocks::Block;
use crate::error::{ConfigError, GeometryError, SolveError};
use crate::geometry::{CellCoord, HalfCoord};
use crate::grid::Board;
use crate::puzzle::{Placement, Puzzle};
use crate::scheduler::{simulate, TraceLimits, TraceReport};

/// Candidates between progress log lines.
const PROGRESS_INTERVAL: usize = 10_000;

/// Search knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub limits: TraceLimits,
    /// Stop after this many candidates and report the budget as exceeded.
    pub max_candidates: Option<usize>,
    /// Shard candidates across the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limits: TraceLimits::default(),
            max_candidates: None,
            parallel: true,
        }
    }
}

/// An accepted placement and the beams it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub placement: Placement,
    pub trace: TraceReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every candidate was tried and none covers all targets.
    Unsolvable,
    /// No candidate succeeded, but some were cut short by a trace budget or
    /// the candidate ceiling, so unsolvability is not proven.
    BudgetExceeded,
}

/// Counters gathered during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates generated.
    pub candidates: usize,
    /// Candidates rejected by the edge-guard filter.
    pub pruned: usize,
    /// Candidates whose beams were traced.
    pub simulated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A target on the shared edge of two cells.
///
/// If both cells hold opaque blocks the target cannot be reached: any beam
/// arriving there has to leave one of the two cells or travel along the edge
/// line. Guards are only built when no laser could do either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeGuard {
    target: HalfCoord,
    cells: [CellCoord; 2],
}

impl EdgeGuard {
    #[inline]
    fn is_sealed(&self, board: &Board) -> bool {
        self.cells.iter().all(|&cell| board.block(cell).is_opaque())
    }
}

fn edge_guards(puzzle: &Puzzle) -> Vec<EdgeGuard> {
    puzzle
        .targets
        .iter()
        .filter_map(|&target| {
            let cells = target.edge_cells()?;
            if !cells.iter().all(|&cell| puzzle.contains_cell(cell)) {
                return None;
            }
            let vertical_edge = target.x.rem_euclid(2) == 0;
            let exempt = puzzle.lasers.iter().any(|laser| {
                let slides_along_edge = if vertical_edge {
                    laser.direction.dx() == 0 && laser.origin.x == target.x
                } else {
                    laser.direction.dy() == 0 && laser.origin.y == target.y
                };
                laser.origin == target
                    || slides_along_edge
                    || cells.iter().any(|cell| cell.center() == laser.origin)
            });
            (!exempt).then_some(EdgeGuard { target, cells })
        })
        .collect()
}

/// Rearranges `items` into the next lexicographic permutation.
///
/// Returns `false`, leaving `items` untouched, once the last permutation has
/// been reached. Equal items are never swapped with each other, so starting
/// from sorted order visits each distinct arrangement exactly once.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|item| *item > items[pivot]) else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

/// Shared, read-only search context plus the atomics workers report through.
struct Search<'a> {
    puzzle: &'a Puzzle,
    config: &'a SearchConfig,
    base: Board,
    open: Vec<CellCoord>,
    blocks: Vec<Block>,
    guards: Vec<EdgeGuard>,
    /// Raised when a solution is found or the candidate ceiling is hit.
    stop: AtomicBool,
    /// Written once by the worker whose solution is returned.
    solved: AtomicBool,
    exhausted: AtomicBool,
    candidates: AtomicUsize,
    pruned: AtomicUsize,
    simulated: AtomicUsize,
}

impl<'a> Search<'a> {
    fn new(puzzle: &'a Puzzle, config: &'a SearchConfig, open: Vec<CellCoord>) -> Self {
        Self {
            puzzle,
            config,
            base: Board::from_puzzle(puzzle),
            open,
            blocks: puzzle.inventory.blocks(),
            guards: edge_guards(puzzle),
            stop: AtomicBool::new(false),
            solved: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
            candidates: AtomicUsize::new(0),
            pruned: AtomicUsize::new(0),
            simulated: AtomicUsize::new(0),
        }
    }

    /// Counts a new candidate, refusing it once the ceiling is reached.
    fn admit(&self) -> bool {
        let tried = self.candidates.fetch_add(1, Ordering::Relaxed);
        match self.config.max_candidates {
            Some(max) if tried >= max => {
                self.candidates.fetch_sub(1, Ordering::Relaxed);
                self.exhausted.store(true, Ordering::Relaxed);
                self.stop.store(true, Ordering::Relaxed);
                false
            }
            _ => {
                if tried > 0 && tried % PROGRESS_INTERVAL == 0 {
                    log::debug!(
                        "{} candidates tried, {} pruned",
                        tried,
                        self.pruned.load(Ordering::Relaxed)
                    );
                }
                true
            }
        }
    }

    /// Builds, filters and simulates one candidate.
    fn candidate(
        &self,
        cells: &[CellCoord],
        arrangement: &[Block],
    ) -> Result<Option<Solution>, GeometryError> {
        if !self.admit() {
            return Ok(None);
        }

        let placement: Placement = cells.iter().copied().zip(arrangement.iter().copied()).collect();
        let mut board = self.base.clone();
        for (&cell, &block) in &placement {
            board.set(cell, block);
        }

        if let Some(guard) = self.guards.iter().find(|guard| guard.is_sealed(&board)) {
            log::trace!("target {} sealed by {:?}", guard.target, placement);
            self.pruned.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        }

        self.simulated.fetch_add(1, Ordering::Relaxed);
        let trace = simulate(
            &board,
            &self.puzzle.lasers,
            &self.puzzle.targets,
            &self.config.limits,
        )?;

        if trace.all_covered() {
            return Ok(Some(Solution { placement, trace }));
        }
        if trace.budget_exhausted {
            self.exhausted.store(true, Ordering::Relaxed);
        }
        Ok(None)
    }

    /// Tries every distinct arrangement of the block multiset over the open
    /// cells selected by `combination`.
    fn search_cells(&self, combination: &[usize]) -> Result<Option<Solution>, GeometryError> {
        let cells: Vec<CellCoord> = combination.iter().map(|&index| self.open[index]).collect();
        let mut arrangement = self.blocks.clone();

        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Ok(None);
            }
            if let Some(solution) = self.candidate(&cells, &arrangement)? {
                self.stop.store(true, Ordering::Relaxed);
                // first writer wins; later solutions are discarded
                if self.solved.swap(true, Ordering::AcqRel) {
                    return Ok(None);
                }
                return Ok(Some(solution));
            }
            if !next_permutation(&mut arrangement) {
                return Ok(None);
            }
        }
    }

    fn run(&self) -> Result<Option<Solution>, GeometryError> {
        if self.blocks.is_empty() {
            return self.search_cells(&[]);
        }

        let combinations = (0..self.open.len()).combinations(self.blocks.len());
        let found = if self.config.parallel {
            combinations
                .par_bridge()
                .find_map_any(|combination| self.search_cells(&combination).transpose())
        } else {
            combinations
                .into_iter()
                .find_map(|combination| self.search_cells(&combination).transpose())
        };
        found.transpose()
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            candidates: self.candidates.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            simulated: self.simulated.load(Ordering::Relaxed),
        }
    }
}

/// Finds a placement of the puzzle's movable blocks under which the lasers
/// strike every target.
///
/// Which solution is returned when several exist is unspecified in parallel
/// mode; sequential mode always returns the first in enumeration order.
pub fn solve(puzzle: &Puzzle, config: &SearchConfig) -> Result<SearchReport, SolveError> {
    let open = puzzle.open_cells();
    let blocks = puzzle.inventory.total();
    if blocks > open.len() {
        return Err(ConfigError::TooManyBlocks {
            blocks,
            cells: open.len(),
        }
        .into());
    }

    let search = Search::new(puzzle, config, open);
    log::debug!(
        "searching {} blocks over {} open cells, {} edge guards",
        blocks,
        search.open.len(),
        search.guards.len()
    );

    let solution = search.run()?;
    let stats = search.stats();
    let outcome = match solution {
        Some(solution) => {
            log::info!(
                "solved after {} candidates ({} pruned, {} simulated)",
                stats.candidates,
                stats.pruned,
                stats.simulated
            );
            SearchOutcome::Solved(solution)
        }
        None if search.exhausted.load(Ordering::Relaxed) => {
            log::warn!(
                "no solution within budget after {} candidates",
                stats.candidates
            );
            SearchOutcome::BudgetExceeded
        }
        None => {
            log::info!("unsolvable: {} candidates exhausted", stats.candidates);
            SearchOutcome::Unsolvable
        }
    };

    Ok(SearchReport { outcome, stats })
}
