//! Cell positions on the board grid.

use serde::{Deserialize, Serialize};

use super::Direction;

/// An integer cell coordinate.
///
/// A position by itself may lie off the board; only
/// [`Board::contains`](crate::board::Board::contains) decides validity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// The cell `distance` steps away in `direction` (negative walks backwards).
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i32) -> Self {
        Self {
            x: self.x + direction.dx() * distance,
            y: self.y + direction.dy() * distance,
        }
    }

    /// Direction of a single unit step from `self` to `to`.
    #[must_use]
    pub const fn direction_to(self, to: Position) -> Option<Direction> {
        Direction::from_delta(to.x - self.x, to.y - self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let p = Position::new(5, 5);
        assert_eq!(p.offset(Direction::North, 3), Position::new(5, 8));
        assert_eq!(p.offset(Direction::North, -1), Position::new(5, 4));
        assert_eq!(p.step(Direction::West), Position::new(4, 5));
    }

    #[test]
    fn test_direction_to() {
        let p = Position::new(2, 2);
        assert_eq!(p.direction_to(Position::new(3, 2)), Some(Direction::East));
        assert_eq!(p.direction_to(Position::new(2, 1)), Some(Direction::South));
        assert_eq!(p.direction_to(Position::new(4, 2)), None);
    }
}
