//! Optical blocks and how they redirect an incoming beam.

use std::fmt;

use crate::error::GeometryError;
use crate::geometry::{Direction, Face};

/// The kind of block occupying a cell.
///
/// Ordering matters only for enumerating distinct arrangements of a block
/// multiset, which starts from the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Block {
    #[default]
    Empty,
    Reflector,
    Absorber,
    Splitter,
}

impl Block {
    /// Movable and fixed block kinds, in inventory order.
    pub const KINDS: [Block; 3] = [Block::Reflector, Block::Absorber, Block::Splitter];

    /// Directions leaving this block after a beam travelling `incoming`
    /// strikes its `face`.
    ///
    /// A splitter lists the transmitted direction first, then the reflected one.
    pub fn interact(self, incoming: Direction, face: Face) -> Result<Outgoing, GeometryError> {
        Ok(match self {
            Block::Empty => Outgoing::One(incoming),
            Block::Absorber => Outgoing::None,
            Block::Reflector => Outgoing::One(incoming.reflect(face)?),
            Block::Splitter => Outgoing::Two(incoming, incoming.reflect(face)?),
        })
    }

    /// Whether a beam can never cross this block.
    pub const fn is_opaque(self) -> bool {
        matches!(self, Block::Reflector | Block::Absorber)
    }

    /// Letter used in `.bff` files.
    pub const fn symbol(self) -> char {
        match self {
            Block::Empty => 'o',
            Block::Reflector => 'A',
            Block::Absorber => 'B',
            Block::Splitter => 'C',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Block::KINDS.into_iter().find(|kind| kind.symbol() == symbol)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Block::Empty => "empty",
            Block::Reflector => "reflector",
            Block::Absorber => "absorber",
            Block::Splitter => "splitter",
        };
        f.write_str(name)
    }
}

/// Zero, one or two outgoing directions, without heap allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outgoing {
    None,
    One(Direction),
    /// Transmitted, then reflected.
    Two(Direction, Direction),
}

impl Outgoing {
    pub fn len(&self) -> usize {
        match self {
            Outgoing::None => 0,
            Outgoing::One(_) => 1,
            Outgoing::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outgoing::None)
    }

    pub fn to_vec(self) -> Vec<Direction> {
        match self {
            Outgoing::None => Vec::new(),
            Outgoing::One(direction) => vec![direction],
            Outgoing::Two(first, second) => vec![first, second],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorber_yields_nothing() {
        for direction in Direction::ALL {
            let outgoing = Block::Absorber.interact(direction, Face::Left).unwrap();
            assert!(outgoing.is_empty());
        }
    }

    #[test]
    fn test_empty_passes_through() {
        let diagonal = Direction::new(1, 1).unwrap();
        assert_eq!(
            Block::Empty.interact(diagonal, Face::Up).unwrap(),
            Outgoing::One(diagonal)
        );
    }

    #[test]
    fn test_reflector_turns_back_axis_beam() {
        assert_eq!(
            Block::Reflector.interact(Direction::RIGHT, Face::Left).unwrap(),
            Outgoing::One(Direction::LEFT)
        );
    }

    #[test]
    fn test_reflector_diagonal_faces() {
        let down_right = Direction::new(1, 1).unwrap();
        assert_eq!(
            Block::Reflector.interact(down_right, Face::Up).unwrap(),
            Outgoing::One(Direction::new(1, -1).unwrap())
        );
        assert_eq!(
            Block::Reflector.interact(down_right, Face::Left).unwrap(),
            Outgoing::One(Direction::new(-1, 1).unwrap())
        );
    }

    #[test]
    fn test_splitter_lists_transmitted_then_reflected() {
        let outgoing = Block::Splitter.interact(Direction::RIGHT, Face::Left).unwrap();
        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing.to_vec(), vec![Direction::RIGHT, Direction::LEFT]);
    }

    #[test]
    fn test_outgoing_count_bounded_and_nonzero() {
        let faces = [Face::Up, Face::Down, Face::Left, Face::Right];
        for block in [Block::Empty, Block::Reflector, Block::Absorber, Block::Splitter] {
            for direction in Direction::ALL {
                for face in faces {
                    let Ok(outgoing) = block.interact(direction, face) else {
                        continue;
                    };
                    assert!(outgoing.len() <= 2);
                    for out in outgoing.to_vec() {
                        assert!(Direction::new(out.dx(), out.dy()).is_ok());
                    }
                }
            }
        }
    }

    #[test]
    fn test_parallel_strike_is_error() {
        assert!(Block::Reflector.interact(Direction::DOWN, Face::Right).is_err());
        assert!(Block::Splitter.interact(Direction::RIGHT, Face::Down).is_err());
    }

    #[test]
    fn test_symbols_roundtrip() {
        for kind in Block::KINDS {
            assert_eq!(Block::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(Block::from_symbol('x'), None);
    }
}
