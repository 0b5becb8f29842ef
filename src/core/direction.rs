//! Compass directions and turning.
//!
//! `turn_left`, `turn_right` and `inverse` form a cyclic group of order 4.
//! NORTH points towards increasing `y`.

use serde::{Deserialize, Serialize};

/// One of the four facing directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at NORTH.
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    /// Rotate 90 degrees counter-clockwise.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Rotate 90 degrees clockwise.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit x delta.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::East => 1,
            Direction::West => -1,
            Direction::North | Direction::South => 0,
        }
    }

    /// Unit y delta.
    #[must_use]
    pub const fn dy(self) -> i32 {
        match self {
            Direction::North => 1,
            Direction::South => -1,
            Direction::East | Direction::West => 0,
        }
    }

    /// Map a unit delta back to a direction.
    ///
    /// Defined only when exactly one component is non-zero and has magnitude 1.
    ///
    /// ```
    /// use robo_engine::core::Direction;
    ///
    /// assert_eq!(Direction::from_delta(0, 1), Some(Direction::North));
    /// assert_eq!(Direction::from_delta(-1, 0), Some(Direction::West));
    /// assert_eq!(Direction::from_delta(1, 1), None);
    /// assert_eq!(Direction::from_delta(0, 2), None);
    /// ```
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        };
        f.write_str(name)
    }
}

/// Rotation sense for gears, rotating conveyors and turn cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rotation {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

impl Rotation {
    /// Apply this rotation to a facing.
    #[must_use]
    pub const fn apply(self, direction: Direction) -> Direction {
        match self {
            Rotation::Left => direction.turn_left(),
            Rotation::Right => direction.turn_right(),
        }
    }

    /// The rotation that turns `from` into `to`, if they are a quarter turn apart.
    #[must_use]
    pub fn between(from: Direction, to: Direction) -> Option<Self> {
        if from.turn_left() == to {
            Some(Rotation::Left)
        } else if from.turn_right() == to {
            Some(Rotation::Right)
        } else {
            None
        }
    }
}
