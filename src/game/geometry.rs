//! Points and headings on the wrap-around grid.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A position (or offset) on the board.
///
/// The board is a torus: every coordinate operation that takes a `size`
/// wraps into `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing northwards.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Wrap both coordinates into `0..size`.
    #[must_use]
    pub const fn wrap(self, size: i32) -> Self {
        Self {
            x: self.x.rem_euclid(size),
            y: self.y.rem_euclid(size),
        }
    }

    /// Move by `offset` and wrap around the board edges.
    #[must_use]
    pub fn translate(self, offset: Point, size: i32) -> Self {
        (self + offset).wrap(size)
    }

    /// Whether the point lies on a `size` x `size` board without wrapping.
    #[must_use]
    pub const fn in_bounds(self, size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }

    /// Manhattan distance, taking the shorter way round on each axis.
    #[must_use]
    pub fn distance_to(self, other: Point, size: i32) -> i32 {
        let dx = (self.x - other.x).rem_euclid(size);
        let dy = (self.y - other.y).rem_euclid(size);
        dx.min(size - dx) + dy.min(size - dy)
    }

    /// Flat row-major index of this point. Row 0 is the top row (`y = size - 1`).
    ///
    /// The point must be in bounds.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn to_index(self, size: i32) -> usize {
        ((size - self.y - 1) * size + self.x) as usize
    }

    /// Inverse of [`Point::to_index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn from_index(index: usize, size: i32) -> Self {
        let row = (index / size as usize) as i32;
        let col = (index % size as usize) as i32;
        Self {
            x: col,
            y: size - row - 1,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, factor: i32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<Direction> for Point {
    fn from(direction: Direction) -> Self {
        direction.to_point()
    }
}

/// One of the four compass headings a fleet can fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards larger `y`.
    North,
    /// Towards larger `x`.
    East,
    /// Towards smaller `y`.
    South,
    /// Towards smaller `x`.
    West,
}

impl Direction {
    /// All headings in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset for this heading.
    #[must_use]
    pub const fn to_point(self) -> Point {
        match self {
            Direction::North => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::South => Point::new(0, -1),
            Direction::West => Point::new(-1, 0),
        }
    }

    /// Heading after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn rotate_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    /// Heading after a quarter turn clockwise.
    #[must_use]
    pub const fn rotate_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The reverse heading.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Canonical index: N=0, E=1, S=2, W=3. Used as a tie-break key.
    #[must_use]
    pub const fn to_index(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Inverse of [`Direction::to_index`].
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// Flight-plan letter for this heading.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    /// Parse a flight-plan letter.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
