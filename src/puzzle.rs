//! Puzzle definitions: board tiles, block inventory, lasers and targets.

use std::collections::BTreeMap;

use crate::blocks::Block;
use crate::error::{ConfigError, GeometryError};
use crate::geometry::{CellCoord, Direction, HalfCoord};

/// What the puzzle says about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// A movable block may be placed here.
    Open,
    /// No block may be placed here; beams pass freely.
    Blocked,
    /// A block that is part of the puzzle and never moves.
    Fixed(Block),
}

impl Tile {
    pub const fn symbol(self) -> char {
        match self {
            Tile::Open => 'o',
            Tile::Blocked => 'x',
            Tile::Fixed(block) => block.symbol(),
        }
    }
}

/// Multiset of movable blocks available to the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    pub reflectors: usize,
    pub absorbers: usize,
    pub splitters: usize,
}

impl Inventory {
    pub const fn new(reflectors: usize, absorbers: usize, splitters: usize) -> Self {
        Self {
            reflectors,
            absorbers,
            splitters,
        }
    }

    pub const fn total(&self) -> usize {
        self.reflectors + self.absorbers + self.splitters
    }

    pub fn count_mut(&mut self, kind: Block) -> Option<&mut usize> {
        match kind {
            Block::Reflector => Some(&mut self.reflectors),
            Block::Absorber => Some(&mut self.absorbers),
            Block::Splitter => Some(&mut self.splitters),
            Block::Empty => None,
        }
    }

    /// Every movable block, sorted by kind.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.total());
        blocks.extend(std::iter::repeat(Block::Reflector).take(self.reflectors));
        blocks.extend(std::iter::repeat(Block::Absorber).take(self.absorbers));
        blocks.extend(std::iter::repeat(Block::Splitter).take(self.splitters));
        blocks
    }
}

/// Movable blocks assigned to placeable cells.
pub type Placement = BTreeMap<CellCoord, Block>;

/// A laser source on the half-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laser {
    pub origin: HalfCoord,
    pub direction: Direction,
}

impl Laser {
    pub fn new(x: i32, y: i32, dx: i32, dy: i32) -> Result<Self, GeometryError> {
        Ok(Self {
            origin: HalfCoord::new(x, y),
            direction: Direction::new(dx, dy)?,
        })
    }
}

/// A validated puzzle.
///
/// Tiles are stored row-major. Every target and laser origin lies on the
/// half-grid `[0, 2 * cols] x [0, 2 * rows]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
    pub inventory: Inventory,
    pub lasers: Vec<Laser>,
    pub targets: Vec<HalfCoord>,
}

impl Puzzle {
    /// Builds a puzzle from rows of tiles, checking its shape and that every
    /// laser and target is on the board.
    pub fn new(
        tile_rows: Vec<Vec<Tile>>,
        inventory: Inventory,
        lasers: Vec<Laser>,
        targets: Vec<HalfCoord>,
    ) -> Result<Self, ConfigError> {
        let rows = tile_rows.len();
        let cols = tile_rows.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard);
        }

        let mut tiles = Vec::with_capacity(rows * cols);
        for (row, tile_row) in tile_rows.into_iter().enumerate() {
            if tile_row.len() != cols {
                return Err(ConfigError::RaggedRow {
                    row,
                    expected: cols,
                    found: tile_row.len(),
                });
            }
            tiles.extend(tile_row);
        }

        let puzzle = Self {
            cols,
            rows,
            tiles,
            inventory,
            lasers,
            targets,
        };

        if let Some(target) = puzzle.targets.iter().find(|t| !puzzle.contains_half(**t)) {
            return Err(ConfigError::TargetOutOfBounds(*target));
        }
        if let Some(laser) = puzzle.lasers.iter().find(|l| !puzzle.contains_half(l.origin)) {
            return Err(ConfigError::LaserOutOfBounds(laser.origin));
        }

        Ok(puzzle)
    }

    /// A puzzle whose every cell is placeable.
    pub fn open(
        cols: usize,
        rows: usize,
        inventory: Inventory,
        lasers: Vec<Laser>,
        targets: Vec<HalfCoord>,
    ) -> Result<Self, ConfigError> {
        Self::new(vec![vec![Tile::Open; cols]; rows], inventory, lasers, targets)
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.contains_cell(cell)
            .then(|| self.tiles[cell.y as usize * self.cols + cell.x as usize])
    }

    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        (0..self.cols as i32).contains(&cell.x) && (0..self.rows as i32).contains(&cell.y)
    }

    pub fn contains_half(&self, point: HalfCoord) -> bool {
        (0..=2 * self.cols as i32).contains(&point.x) && (0..=2 * self.rows as i32).contains(&point.y)
    }

    /// All cells with their tiles, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let cols = self.cols;
        self.tiles.iter().enumerate().map(move |(index, &tile)| {
            let cell = CellCoord::new((index % cols) as i32, (index / cols) as i32);
            (cell, tile)
        })
    }

    /// Cells that may receive a movable block, in row-major order.
    pub fn open_cells(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|(_, tile)| *tile == Tile::Open)
            .map(|(cell, _)| cell)
            .collect()
    }
}
