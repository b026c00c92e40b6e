//! Beam scheduling: runs every laser's beam, and every beam split off it,
//! to completion on one board.
//!
//! Beams are processed from a FIFO work-list, so splits fan out breadth-first
//! and memory is bounded by the number of pending beams. A shared set of
//! visited beam states terminates any beam that repeats an earlier state,
//! which bounds the simulation even before the budgets below apply.

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::FxHashSet;

use crate::error::GeometryError;
use crate::geometry::{Direction, HalfCoord};
use crate::grid::Board;
use crate::puzzle::Laser;
use crate::tracer::{Advance, Beam, Termination, Tracer};

/// Budgets bounding one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLimits {
    /// Transitions any single beam may make.
    pub max_steps_per_beam: usize,
    /// Beams a simulation may create, seeded ones included.
    pub max_beams: usize,
}

impl Default for TraceLimits {
    fn default() -> Self {
        Self {
            max_steps_per_beam: 20_000,
            max_beams: 4_096,
        }
    }
}

/// How many beams ended in each way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeamCounts {
    pub exited: usize,
    pub absorbed: usize,
    pub cycled: usize,
    pub truncated: usize,
}

impl BeamCounts {
    fn record(&mut self, termination: Termination) {
        match termination {
            Termination::Exited => self.exited += 1,
            Termination::Absorbed => self.absorbed += 1,
            Termination::Cycled => self.cycled += 1,
            Termination::Truncated => self.truncated += 1,
        }
    }

    /// Every beam that finished, whatever the cause.
    pub fn terminated(&self) -> usize {
        self.exited + self.absorbed + self.cycled + self.truncated
    }
}

/// Aggregate outcome of simulating one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    /// One path per beam, in the order beams finished.
    pub paths: Vec<Vec<HalfCoord>>,
    /// Required targets some beam passed through.
    pub covered: BTreeSet<HalfCoord>,
    /// Number of required targets.
    pub required: usize,
    pub counts: BeamCounts,
    /// A beam ran out of steps or a split was dropped at the beam ceiling,
    /// so coverage may be incomplete.
    pub budget_exhausted: bool,
}

impl TraceReport {
    pub fn all_covered(&self) -> bool {
        self.covered.len() == self.required
    }

    /// Total number of points recorded across all paths.
    pub fn path_length(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }
}

/// Seeds one beam per laser on `board` and runs them all until the
/// work-list drains.
pub fn simulate(
    board: &Board,
    lasers: &[Laser],
    targets: &[HalfCoord],
    limits: &TraceLimits,
) -> Result<TraceReport, GeometryError> {
    let target_set: FxHashSet<HalfCoord> = targets.iter().copied().collect();
    let tracer = Tracer::new(board, &target_set, limits.max_steps_per_beam);

    let mut covered = FxHashSet::default();
    let mut seen: FxHashSet<(HalfCoord, Direction, bool)> = FxHashSet::default();
    let mut counts = BeamCounts::default();
    let mut paths = Vec::new();
    let mut budget_exhausted = false;

    let mut queue: VecDeque<Beam> = lasers
        .iter()
        .take(limits.max_beams)
        .map(|laser| Beam::new(laser.origin, laser.direction))
        .collect();
    if lasers.len() > queue.len() {
        budget_exhausted = true;
    }
    for beam in &queue {
        if target_set.contains(&beam.position()) {
            covered.insert(beam.position());
        }
    }
    let mut created = queue.len();

    while let Some(mut beam) = queue.pop_front() {
        let termination = loop {
            if !seen.insert(beam.state()) {
                break Termination::Cycled;
            }
            match tracer.advance(&mut beam, &mut covered)? {
                Advance::Continue => {}
                Advance::Split(spawned) => {
                    if created < limits.max_beams {
                        created += 1;
                        queue.push_back(spawned);
                    } else {
                        budget_exhausted = true;
                    }
                }
                Advance::Terminated(termination) => break termination,
            }
        };
        if termination == Termination::Truncated {
            budget_exhausted = true;
        }
        counts.record(termination);
        paths.push(beam.into_path());
    }

    if budget_exhausted {
        log::debug!(
            "trace budget exhausted after {} beams ({} truncated)",
            created,
            counts.truncated
        );
    }

    Ok(TraceReport {
        paths,
        covered: covered.into_iter().collect(),
        required: target_set.len(),
        counts,
        budget_exhausted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::geometry::CellCoord;

    fn laser() -> Vec<Laser> {
        vec![Laser::new(0, 3, 1, 0).unwrap()]
    }

    fn board_with(block: Block) -> Board {
        let mut board = Board::new(3, 3);
        board.set(CellCoord::new(1, 1), block);
        board
    }

    #[test]
    fn test_empty_board_straight_traversal() {
        let target = HalfCoord::new(5, 3);
        let report = simulate(&Board::new(3, 3), &laser(), &[target], &TraceLimits::default()).unwrap();
        assert!(report.all_covered());
        assert_eq!(report.counts.terminated(), 1);
        assert_eq!(report.counts.exited, 1);
        assert!(!report.budget_exhausted);
    }

    #[test]
    fn test_absorber_ends_path_on_row() {
        let report = simulate(&board_with(Block::Absorber), &laser(), &[], &TraceLimits::default()).unwrap();
        assert_eq!(report.counts.terminated(), 1);
        assert_eq!(report.counts.absorbed, 1);
        let path = &report.paths[0];
        assert_eq!(path.last(), Some(&HalfCoord::new(2, 3)));
        assert!(path.iter().all(|point| point.y == 3));
        assert!(report.all_covered());
    }

    #[test]
    fn test_reflector_reverses_beam_onto_target() {
        let target = HalfCoord::new(1, 3);
        let report = simulate(&board_with(Block::Reflector), &laser(), &[target], &TraceLimits::default()).unwrap();
        assert!(report.covered.contains(&target));
        assert_eq!(
            report.paths[0],
            vec![
                HalfCoord::new(0, 3),
                HalfCoord::new(1, 3),
                HalfCoord::new(2, 3),
                HalfCoord::new(1, 3),
                HalfCoord::new(0, 3),
            ]
        );
    }

    #[test]
    fn test_splitter_covers_both_sides() {
        let targets = [HalfCoord::new(1, 3), HalfCoord::new(5, 3)];
        let report = simulate(&board_with(Block::Splitter), &laser(), &targets, &TraceLimits::default()).unwrap();
        assert!(report.all_covered());
        assert!(report.counts.terminated() >= 2);
        assert!(report.path_length() <= 200);

        // both continuations start from the impact point
        let split_point = HalfCoord::new(2, 3);
        assert_eq!(report.paths.len(), 2);
        assert_eq!(report.paths[1].first(), Some(&split_point));
        assert!(report.paths[0].contains(&split_point));
    }

    #[test]
    fn test_cyclic_reflectors_terminate() {
        // a beam trapped between two reflectors bounces forever
        let mut board = Board::new(3, 1);
        board.set(CellCoord::new(0, 0), Block::Reflector);
        board.set(CellCoord::new(2, 0), Block::Reflector);
        let lasers = vec![Laser::new(3, 1, 1, 0).unwrap()];
        let limits = TraceLimits::default();

        let report = simulate(&board, &lasers, &[], &limits).unwrap();
        assert_eq!(report.counts.cycled, 1);
        assert!(report.path_length() < limits.max_steps_per_beam);
        assert!(!report.budget_exhausted);
    }

    #[test]
    fn test_diagonal_reflector_loop_terminates() {
        // four reflectors around an empty centre cell form a closed diamond
        let mut board = Board::new(3, 3);
        for cell in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            board.set(CellCoord::new(cell.0, cell.1), Block::Reflector);
        }
        let lasers = vec![Laser::new(3, 2, 1, 1).unwrap()];
        let report = simulate(&board, &lasers, &[HalfCoord::new(4, 3)], &TraceLimits::default()).unwrap();
        assert!(report.all_covered());
        assert_eq!(report.counts.cycled, 1);
        assert!(report.path_length() < 50);
    }

    #[test]
    fn test_step_budget_reported_not_fatal() {
        let limits = TraceLimits {
            max_steps_per_beam: 3,
            ..TraceLimits::default()
        };
        let target = HalfCoord::new(5, 3);
        let report = simulate(&Board::new(3, 3), &laser(), &[target], &limits).unwrap();
        assert!(report.budget_exhausted);
        assert_eq!(report.counts.truncated, 1);
        assert!(!report.all_covered());
    }

    #[test]
    fn test_beam_ceiling_drops_splits() {
        let limits = TraceLimits {
            max_beams: 1,
            ..TraceLimits::default()
        };
        let targets = [HalfCoord::new(1, 3), HalfCoord::new(5, 3)];
        let report = simulate(&board_with(Block::Splitter), &laser(), &targets, &limits).unwrap();
        assert!(report.budget_exhausted);
        assert_eq!(report.paths.len(), 1);
        assert!(report.covered.contains(&HalfCoord::new(1, 3)));
        assert!(!report.covered.contains(&HalfCoord::new(5, 3)));
    }

    #[test]
    fn test_target_at_laser_origin_counts() {
        let origin = HalfCoord::new(0, 3);
        let report = simulate(&board_with(Block::Absorber), &laser(), &[origin], &TraceLimits::default()).unwrap();
        assert!(report.all_covered());
    }
}
