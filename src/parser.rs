//! Reader for `.bff` puzzle files.
//!
//! ```text
//! # comment
//! GRID START
//! o B o
//! x o o
//! GRID STOP
//! A 2            movable reflectors
//! B 1            movable absorbers
//! C 1            movable splitters
//! L 2 7 1 -1     laser at (2, 7) heading (1, -1)
//! P 3 0          target at (3, 0)
//! ```
//!
//! Grid tokens: `o` placeable, `x` unplaceable, `A`/`B`/`C` fixed blocks.

use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::blocks::Block;
use crate::error::ParseError;
use crate::geometry::HalfCoord;
use crate::puzzle::{Inventory, Laser, Puzzle, Tile};

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

/// Parses exactly `N` integers from `fields`.
fn numbers<const N: usize>(line: usize, fields: &[&str]) -> Result<[i32; N], ParseError> {
    if fields.len() != N {
        return Err(syntax(
            line,
            format!("expected {} numbers, found {}", N, fields.len()),
        ));
    }
    let mut values = [0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field
            .parse()
            .map_err(|_| syntax(line, format!("invalid number {field:?}")))?;
    }
    Ok(values)
}

fn parse_tile(line: usize, symbol: char) -> Result<Tile, ParseError> {
    match symbol {
        'o' => Ok(Tile::Open),
        'x' => Ok(Tile::Blocked),
        other => Block::from_symbol(other)
            .map(Tile::Fixed)
            .ok_or_else(|| syntax(line, format!("unknown grid token {other:?}"))),
    }
}

/// Parses a puzzle from `.bff` text.
pub fn parse_bff(input: &str) -> Result<Puzzle, ParseError> {
    let mut rows: Vec<Vec<Tile>> = Vec::new();
    let mut grid_seen = false;
    let mut in_grid = false;
    let mut inventory = Inventory::default();
    let mut lasers = Vec::new();
    let mut targets = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if in_grid {
            if text == "GRID STOP" {
                in_grid = false;
            } else {
                let row = text
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|symbol| parse_tile(line, symbol))
                    .collect::<Result<Vec<_>, _>>()?;
                rows.push(row);
            }
            continue;
        }

        if text == "GRID START" {
            if grid_seen {
                return Err(syntax(line, "second GRID START"));
            }
            grid_seen = true;
            in_grid = true;
            continue;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        match fields[0] {
            "L" => {
                let [x, y, dx, dy] = numbers::<4>(line, &fields[1..])?;
                let laser = Laser::new(x, y, dx, dy).map_err(|e| syntax(line, e.to_string()))?;
                lasers.push(laser);
            }
            "P" => {
                let [x, y] = numbers::<2>(line, &fields[1..])?;
                targets.push(HalfCoord::new(x, y));
            }
            key => {
                let kind = key
                    .chars()
                    .exactly_one()
                    .ok()
                    .and_then(Block::from_symbol)
                    .ok_or_else(|| syntax(line, format!("unknown directive {key:?}")))?;
                let [count] = numbers::<1>(line, &fields[1..])?;
                let count = usize::try_from(count)
                    .map_err(|_| syntax(line, format!("negative block count {count}")))?;
                if let Some(slot) = inventory.count_mut(kind) {
                    *slot += count;
                }
            }
        }
    }

    if in_grid {
        return Err(syntax(input.lines().count(), "GRID START without GRID STOP"));
    }
    if !grid_seen {
        return Err(ParseError::MissingGrid);
    }

    Ok(Puzzle::new(rows, inventory, lasers, targets)?)
}

/// Reads and parses a `.bff` file.
pub fn load(path: &Path) -> Result<Puzzle, ParseError> {
    let text = fs::read_to_string(path)?;
    parse_bff(&text)
}
