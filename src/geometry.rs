//! Lattice coordinates, directions and the reflection rule.
//!
//! Two coordinate systems are related by a factor of two. Blocks live on
//! cells `(cx, cy)`; beams live on the half-grid, where cell `(cx, cy)` has its
//! centre at `(2cx + 1, 2cy + 1)` and its edges on the even lines around it.
//! A half-coordinate with an even `x` lies on a vertical cell edge, one with an
//! even `y` lies on a horizontal cell edge. `y` grows downwards.

use std::fmt;

use crate::error::GeometryError;

/// A point on the half-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfCoord {
    pub x: i32,
    pub y: i32,
}

impl HalfCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring half-coordinate one unit step along `direction`.
    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        Self {
            x: self.x + direction.dx,
            y: self.y + direction.dy,
        }
    }

    /// The cell whose centre is this point, if it is a cell centre.
    pub const fn cell(self) -> Option<CellCoord> {
        if self.x % 2 != 0 && self.y % 2 != 0 {
            Some(CellCoord::new((self.x - 1) / 2, (self.y - 1) / 2))
        } else {
            None
        }
    }

    /// The two cells sharing the edge this point is the midpoint of.
    ///
    /// Midpoints of vertical edges yield `[left, right]`, midpoints of
    /// horizontal edges yield `[above, below]`. Corners and cell centres have
    /// no such pair. Cells may lie outside the board.
    pub fn edge_cells(self) -> Option<[CellCoord; 2]> {
        let x_even = self.x.rem_euclid(2) == 0;
        let y_even = self.y.rem_euclid(2) == 0;
        match (x_even, y_even) {
            (true, false) => {
                let row = (self.y - 1) / 2;
                Some([
                    CellCoord::new(self.x / 2 - 1, row),
                    CellCoord::new(self.x / 2, row),
                ])
            }
            (false, true) => {
                let column = (self.x - 1) / 2;
                Some([
                    CellCoord::new(column, self.y / 2 - 1),
                    CellCoord::new(column, self.y / 2),
                ])
            }
            _ => None,
        }
    }
}

impl fmt::Display for HalfCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell of the obstacle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The half-coordinate at the centre of this cell.
    #[inline]
    pub const fn center(self) -> HalfCoord {
        HalfCoord::new(2 * self.x + 1, 2 * self.y + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// One of the eight unit lattice steps.
///
/// Fields are private so that `(0, 0)` and components outside `{-1, 0, 1}`
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Direction {
    dx: i32,
    dy: i32,
}

impl Direction {
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    pub const UP: Self = Self { dx: 0, dy: -1 };

    /// All eight directions, axis-aligned first.
    pub const ALL: [Self; 8] = [
        Self::RIGHT,
        Self::LEFT,
        Self::DOWN,
        Self::UP,
        Self { dx: 1, dy: 1 },
        Self { dx: 1, dy: -1 },
        Self { dx: -1, dy: 1 },
        Self { dx: -1, dy: -1 },
    ];

    pub fn new(dx: i32, dy: i32) -> Result<Self, GeometryError> {
        let unit = |c: i32| (-1..=1).contains(&c);
        if unit(dx) && unit(dy) && (dx, dy) != (0, 0) {
            Ok(Self { dx, dy })
        } else {
            Err(GeometryError::InvalidDirection { dx, dy })
        }
    }

    #[inline]
    pub const fn dx(self) -> i32 {
        self.dx
    }

    #[inline]
    pub const fn dy(self) -> i32 {
        self.dy
    }

    /// Mirrors this direction off the given face of a cell.
    ///
    /// Striking `Up`/`Down` negates the vertical component, striking
    /// `Left`/`Right` negates the horizontal one. A face parallel to the
    /// direction of travel cannot be struck.
    pub fn reflect(self, face: Face) -> Result<Self, GeometryError> {
        let parallel = GeometryError::ParallelImpact {
            direction: self,
            face,
        };
        match face {
            Face::Up | Face::Down if self.dy == 0 => Err(parallel),
            Face::Left | Face::Right if self.dx == 0 => Err(parallel),
            Face::Up | Face::Down => Ok(Self {
                dx: self.dx,
                dy: -self.dy,
            }),
            Face::Left | Face::Right => Ok(Self {
                dx: -self.dx,
                dy: self.dy,
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Which edge of a cell a beam strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    /// The face a beam moving with horizontal component `dx` strikes.
    pub const fn horizontal(dx: i32) -> Self {
        if dx > 0 {
            Face::Left
        } else {
            Face::Right
        }
    }

    /// The face a beam moving with vertical component `dy` strikes.
    pub const fn vertical(dy: i32) -> Self {
        if dy > 0 {
            Face::Up
        } else {
            Face::Down
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Up => "up",
            Face::Down => "down",
            Face::Left => "left",
            Face::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_rejects_zero_and_long_steps() {
        assert_eq!(
            Direction::new(0, 0),
            Err(GeometryError::InvalidDirection { dx: 0, dy: 0 })
        );
        assert!(Direction::new(2, 0).is_err());
        assert!(Direction::new(1, -2).is_err());
        for direction in Direction::ALL {
            assert_eq!(Direction::new(direction.dx(), direction.dy()), Ok(direction));
        }
    }

    #[test]
    fn test_reflect_off_up_down_negates_vertical() {
        for direction in Direction::ALL.into_iter().filter(|d| d.dy() != 0) {
            for face in [Face::Up, Face::Down] {
                let reflected = direction.reflect(face).unwrap();
                assert_eq!((reflected.dx(), reflected.dy()), (direction.dx(), -direction.dy()));
            }
        }
    }

    #[test]
    fn test_reflect_off_left_right_negates_horizontal() {
        for direction in Direction::ALL.into_iter().filter(|d| d.dx() != 0) {
            for face in [Face::Left, Face::Right] {
                let reflected = direction.reflect(face).unwrap();
                assert_eq!((reflected.dx(), reflected.dy()), (-direction.dx(), direction.dy()));
            }
        }
    }

    #[test]
    fn test_reflect_parallel_face_is_geometry_error() {
        assert_eq!(
            Direction::RIGHT.reflect(Face::Up),
            Err(GeometryError::ParallelImpact {
                direction: Direction::RIGHT,
                face: Face::Up
            })
        );
        assert!(Direction::DOWN.reflect(Face::Left).is_err());
    }

    #[test]
    fn test_cell_centre_and_back() {
        let cell = CellCoord::new(2, 1);
        assert_eq!(cell.center(), HalfCoord::new(5, 3));
        assert_eq!(cell.center().cell(), Some(cell));
        assert_eq!(HalfCoord::new(4, 3).cell(), None);
    }

    #[test]
    fn test_edge_cells() {
        assert_eq!(
            HalfCoord::new(2, 1).edge_cells(),
            Some([CellCoord::new(0, 0), CellCoord::new(1, 0)])
        );
        assert_eq!(
            HalfCoord::new(3, 4).edge_cells(),
            Some([CellCoord::new(1, 1), CellCoord::new(1, 2)])
        );
        assert_eq!(HalfCoord::new(2, 2).edge_cells(), None);
        assert_eq!(HalfCoord::new(3, 3).edge_cells(), None);
    }
}
