//! Error taxonomy for puzzle loading, simulation and search.
//!
//! "No solution" and "budget exhausted" are not errors; they are variants of
//! [`crate::solver::SearchOutcome`].

use thiserror::Error;

use crate::geometry::{Direction, Face, HalfCoord};

/// A direction or impact face fell outside the lattice domain.
///
/// Raised during simulation this always indicates a logic defect, so callers
/// propagate it instead of recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("direction ({dx}, {dy}) is not a unit lattice step")]
    InvalidDirection { dx: i32, dy: i32 },

    #[error("a beam travelling {direction} cannot strike the {face} face")]
    ParallelImpact { direction: Direction, face: Face },
}

/// Malformed puzzle definition. Surfaced before any search starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column")]
    EmptyBoard,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{blocks} movable blocks but only {cells} placeable cells")]
    TooManyBlocks { blocks: usize, cells: usize },

    #[error("target {0} lies outside the board")]
    TargetOutOfBounds(HalfCoord),

    #[error("laser at {0} lies outside the board")]
    LaserOutOfBounds(HalfCoord),

    #[error("invalid laser: {0}")]
    Laser(#[from] GeometryError),
}

/// Failure while reading a `.bff` puzzle file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("missing GRID START / GRID STOP block")]
    MissingGrid,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a placement search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invalid puzzle: {0}")]
    Configuration(#[from] ConfigError),

    #[error("simulation defect: {0}")]
    Geometry(#[from] GeometryError),
}
