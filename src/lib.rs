//! Lazor Puzzle Solver Library
//!
//! Routes laser beams across a grid of cells by placing a fixed inventory of
//! reflector, absorber and splitter blocks so that every target point is
//! struck. Positions live on a half-resolution grid: cell `(cx, cy)` has its
//! centre at `(2cx + 1, 2cy + 1)`, and even coordinates lie on cell edges.

pub mod blocks;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod parser;
pub mod persistence;
pub mod puzzle;
pub mod scheduler;
pub mod solver;
pub mod tracer;

pub use blocks::Block;
pub use error::{ConfigError, GeometryError, ParseError, SolveError};
pub use geometry::{CellCoord, Direction, HalfCoord};
pub use puzzle::{Inventory, Laser, Placement, Puzzle, Tile};
pub use scheduler::{simulate, TraceLimits, TraceReport};
pub use solver::{solve, SearchConfig, SearchOutcome, SearchReport, Solution};
