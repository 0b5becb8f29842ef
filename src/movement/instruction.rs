//! Movement instructions and program cards.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Rotation};

/// A movement instruction printed on a program card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Movement {
    #[serde(rename = "MOVE_1")]
    Move1,
    #[serde(rename = "MOVE_2")]
    Move2,
    #[serde(rename = "MOVE_3")]
    Move3,
    BackUp,
    LeftTurn,
    RightTurn,
    UTurn,
}

/// What an instruction does to its robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Repeat a unit step `steps` times; `backward` steps against the facing.
    Steps { steps: u32, backward: bool },
    Turn(Rotation),
    UTurn,
}

impl Movement {
    pub const ALL: [Movement; 7] = [
        Movement::Move1,
        Movement::Move2,
        Movement::Move3,
        Movement::BackUp,
        Movement::LeftTurn,
        Movement::RightTurn,
        Movement::UTurn,
    ];

    pub const fn motion(self) -> Motion {
        match self {
            Movement::Move1 => Motion::Steps { steps: 1, backward: false },
            Movement::Move2 => Motion::Steps { steps: 2, backward: false },
            Movement::Move3 => Motion::Steps { steps: 3, backward: false },
            Movement::BackUp => Motion::Steps { steps: 1, backward: true },
            Movement::LeftTurn => Motion::Turn(Rotation::Left),
            Movement::RightTurn => Motion::Turn(Rotation::Right),
            Movement::UTurn => Motion::UTurn,
        }
    }

    /// Number of unit steps; zero for turns.
    pub const fn steps(self) -> u32 {
        match self.motion() {
            Motion::Steps { steps, .. } => steps,
            Motion::Turn(_) | Motion::UTurn => 0,
        }
    }

    /// Direction of each unit step for a robot facing `facing`.
    pub const fn step_direction(self, facing: Direction) -> Direction {
        match self {
            Movement::BackUp => facing.inverse(),
            _ => facing,
        }
    }
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Movement::Move1 => "MOVE_1",
            Movement::Move2 => "MOVE_2",
            Movement::Move3 => "MOVE_3",
            Movement::BackUp => "BACK_UP",
            Movement::LeftTurn => "LEFT_TURN",
            Movement::RightTurn => "RIGHT_TURN",
            Movement::UTurn => "U_TURN",
        };
        f.write_str(name)
    }
}

/// A program card: an instruction and its round priority.
///
/// Priorities are unique across the deck. Lower priorities execute first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramCard {
    #[serde(rename = "action")]
    pub movement: Movement,
    pub priority: u32,
}

impl ProgramCard {
    pub const fn new(movement: Movement, priority: u32) -> Self {
        Self { movement, priority }
    }
}

impl PartialOrd for ProgramCard {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProgramCard {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.movement.cmp(&other.movement))
    }
}

impl std::fmt::Display for ProgramCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.movement, self.priority)
    }
}
