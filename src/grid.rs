//! Board model: the block in every cell plus geometric queries on it.
//!
//! A board is built once per placement candidate from the puzzle's fixed
//! blocks and the candidate's movable ones. Cells are stored as a flat
//! row-major array of [`Block`] tags.

use crate::blocks::Block;
use crate::geometry::{CellCoord, Direction, Face, HalfCoord};
use crate::puzzle::{Placement, Puzzle, Tile};

/// Converts cell coordinates to a linear index.
///
/// Index order is row-major: `idx = y * cols + x`.
#[inline(always)]
pub const fn cell_to_idx(cols: usize, cell: CellCoord) -> usize {
    (cell.y as usize) * cols + (cell.x as usize)
}

/// A cell a beam is about to strike, and on which face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub cell: CellCoord,
    pub face: Face,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Block>,
}

impl Board {
    /// An all-empty board.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Block::Empty; cols * rows],
        }
    }

    /// The puzzle's fixed blocks, with every other cell empty.
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        let mut board = Self::new(puzzle.cols(), puzzle.rows());
        for (cell, tile) in puzzle.cells() {
            if let Tile::Fixed(block) = tile {
                board.set(cell, block);
            }
        }
        board
    }

    /// The puzzle's fixed blocks plus a placement of movable ones.
    pub fn with_placement(puzzle: &Puzzle, placement: &Placement) -> Self {
        let mut board = Self::from_puzzle(puzzle);
        for (&cell, &block) in placement {
            board.set(cell, block);
        }
        board
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Cells are valid over `[0, cols) x [0, rows)`.
    #[inline]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        (0..self.cols as i32).contains(&cell.x) && (0..self.rows as i32).contains(&cell.y)
    }

    /// Half-coordinates are valid over `[0, 2 * cols] x [0, 2 * rows]`.
    #[inline]
    pub fn contains_half(&self, point: HalfCoord) -> bool {
        (0..=2 * self.cols as i32).contains(&point.x) && (0..=2 * self.rows as i32).contains(&point.y)
    }

    /// The block in `cell`; cells off the board are empty.
    #[inline]
    pub fn block(&self, cell: CellCoord) -> Block {
        if self.contains_cell(cell) {
            self.cells[cell_to_idx(self.cols, cell)]
        } else {
            Block::Empty
        }
    }

    /// Puts `block` into `cell`. Cells off the board are ignored.
    pub fn set(&mut self, cell: CellCoord, block: Block) {
        if self.contains_cell(cell) {
            self.cells[cell_to_idx(self.cols, cell)] = block;
        }
    }

    /// Candidate cells a step from `position` along `direction` would enter,
    /// horizontal neighbour first.
    ///
    /// The horizontal neighbour exists when the beam sits on a vertical edge
    /// line and moves horizontally; the vertical neighbour likewise for
    /// horizontal edge lines. On a corner a diagonal step yields the same cell
    /// twice, struck on different faces. Off-board cells are still returned.
    pub fn neighbours(position: HalfCoord, direction: Direction) -> [Option<(CellCoord, Face)>; 2] {
        let (dx, dy) = (direction.dx(), direction.dy());
        // index of the cell a step along one axis enters, given the coordinate
        let enter = |coord: i32, delta: i32| {
            if coord.rem_euclid(2) == 0 {
                match delta {
                    0 => None,
                    d if d > 0 => Some(coord / 2),
                    _ => Some(coord / 2 - 1),
                }
            } else {
                Some((coord - 1) / 2)
            }
        };

        let horizontal = (position.x.rem_euclid(2) == 0 && dx != 0)
            .then(|| enter(position.x, dx).zip(enter(position.y, dy)))
            .flatten()
            .map(|(x, y)| (CellCoord::new(x, y), Face::horizontal(dx)));
        let vertical = (position.y.rem_euclid(2) == 0 && dy != 0)
            .then(|| enter(position.x, dx).zip(enter(position.y, dy)))
            .flatten()
            .map(|(x, y)| (CellCoord::new(x, y), Face::vertical(dy)));

        [horizontal, vertical]
    }

    /// The first non-empty cell a step from `position` would strike.
    pub fn impact(&self, position: HalfCoord, direction: Direction) -> Option<Impact> {
        Self::neighbours(position, direction)
            .into_iter()
            .flatten()
            .map(|(cell, face)| Impact {
                cell,
                face,
                block: self.block(cell),
            })
            .find(|impact| impact.block != Block::Empty)
    }
}

/// Formats a puzzle board with an optional placement as `.bff` grid rows.
///
/// Placed blocks show their letter, unfilled placeable cells `o`, and
/// unplaceable cells `x`.
pub fn format_board(puzzle: &Puzzle, placement: &Placement) -> String {
    let mut output = String::new();
    for row in 0..puzzle.rows() as i32 {
        for col in 0..puzzle.cols() as i32 {
            let cell = CellCoord::new(col, row);
            if col > 0 {
                output.push(' ');
            }
            let symbol = match placement.get(&cell) {
                Some(block) => block.symbol(),
                None => puzzle.tile(cell).map_or('?', Tile::symbol),
            };
            output.push(symbol);
        }
        output.push('\n');
    }
    output
}
