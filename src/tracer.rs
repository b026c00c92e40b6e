//! Single-beam tracing.
//!
//! Each call to [`Tracer::advance`] performs one transition of a beam: it
//! either commits a step to the next half-coordinate, turns at a cell
//! boundary, splits, or terminates. Interactions never move the beam; it
//! turns in place and the next call steps along the new direction.

use rustc_hash::FxHashSet;

use crate::blocks::Outgoing;
use crate::error::GeometryError;
use crate::geometry::{Direction, HalfCoord};
use crate::grid::Board;

/// How a beam stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The next step would leave the half-grid.
    Exited,
    /// Struck an absorber.
    Absorbed,
    /// Reached a state some beam had already been in.
    Cycled,
    /// Ran out of its step budget.
    Truncated,
}

/// Result of one transition.
#[derive(Debug)]
pub enum Advance {
    /// The beam is still travelling.
    Continue,
    /// The beam turned onto its reflected direction and spawned this
    /// transmitted beam at the same point.
    Split(Beam),
    Terminated(Termination),
}

/// Simulation state of one beam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beam {
    position: HalfCoord,
    direction: Direction,
    path: Vec<HalfCoord>,
    steps: usize,
    /// Set on a freshly split transmitted beam so its first step crosses the
    /// splitter instead of striking it again.
    pass_through: bool,
}

impl Beam {
    pub fn new(origin: HalfCoord, direction: Direction) -> Self {
        Self {
            position: origin,
            direction,
            path: vec![origin],
            steps: 0,
            pass_through: false,
        }
    }

    fn transmitted(origin: HalfCoord, direction: Direction) -> Self {
        Self {
            pass_through: true,
            ..Self::new(origin, direction)
        }
    }

    pub fn position(&self) -> HalfCoord {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every half-coordinate this beam has occupied, in order.
    pub fn path(&self) -> &[HalfCoord] {
        &self.path
    }

    pub fn into_path(self) -> Vec<HalfCoord> {
        self.path
    }

    /// Key identifying everything that determines this beam's future.
    pub fn state(&self) -> (HalfCoord, Direction, bool) {
        (self.position, self.direction, self.pass_through)
    }
}

/// Advances beams across one board.
pub struct Tracer<'a> {
    board: &'a Board,
    targets: &'a FxHashSet<HalfCoord>,
    max_steps: usize,
}

impl<'a> Tracer<'a> {
    pub fn new(board: &'a Board, targets: &'a FxHashSet<HalfCoord>, max_steps: usize) -> Self {
        Self {
            board,
            targets,
            max_steps,
        }
    }

    /// Performs one transition of `beam`, adding any target it lands on to
    /// `covered`.
    pub fn advance(
        &self,
        beam: &mut Beam,
        covered: &mut FxHashSet<HalfCoord>,
    ) -> Result<Advance, GeometryError> {
        if beam.steps >= self.max_steps {
            return Ok(Advance::Terminated(Termination::Truncated));
        }
        beam.steps += 1;

        let next = beam.position.step(beam.direction);
        if !self.board.contains_half(next) {
            return Ok(Advance::Terminated(Termination::Exited));
        }

        let crossing = std::mem::take(&mut beam.pass_through);
        if !crossing {
            if let Some(impact) = self.board.impact(beam.position, beam.direction) {
                match impact.block.interact(beam.direction, impact.face)? {
                    Outgoing::None => return Ok(Advance::Terminated(Termination::Absorbed)),
                    Outgoing::One(turned) => {
                        beam.direction = turned;
                        return Ok(Advance::Continue);
                    }
                    Outgoing::Two(transmitted, reflected) => {
                        let spawned = Beam::transmitted(beam.position, transmitted);
                        beam.direction = reflected;
                        return Ok(Advance::Split(spawned));
                    }
                }
            }
        }

        beam.position = next;
        beam.path.push(next);
        if self.targets.contains(&next) {
            covered.insert(next);
        }
        Ok(Advance::Continue)
    }
}
