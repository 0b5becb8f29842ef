//! Flat round records for the networking collaborator.
//!
//! Messages are single lines of the form `TAG:<json>`. Round results can
//! also be stored as compact bincode snapshots.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{Direction, EngineError, EntityId, GameState, GameStatus, Result};
use crate::movement::ProgramCard;
use crate::robots::{Robot, RobotStatus};

pub const ROUND_RESULT_TAG: &str = "ROUND_RESULT";
pub const SELECTED_CARDS_TAG: &str = "SELECTED_CARDS";

/// Final state of one robot after a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotRecord {
    pub entity: EntityId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub health: i32,
    pub lives: i32,
    pub flags: u32,
    pub status: RobotStatus,
}

impl From<&Robot> for RobotRecord {
    fn from(robot: &Robot) -> Self {
        Self {
            entity: robot.id(),
            name: robot.name().to_string(),
            x: robot.position().x,
            y: robot.position().y,
            direction: robot.direction(),
            health: robot.health(),
            lives: robot.lives(),
            flags: robot.flags(),
            status: robot.status(),
        }
    }
}

/// Entity id → final position, direction, health, lives and flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub robots: Vec<RobotRecord>,
    pub status: GameStatus,
}

impl RoundResult {
    /// Snapshot the current state.
    pub fn capture(state: &GameState) -> Self {
        Self {
            round: state.round(),
            robots: state.robots().map(RobotRecord::from).collect(),
            status: state.status(),
        }
    }

    pub fn get(&self, entity: EntityId) -> Option<&RobotRecord> {
        self.robots.iter().find(|r| r.entity == entity)
    }

    /// `ROUND_RESULT:<json>`
    pub fn to_message(&self) -> Result<String> {
        encode_line(ROUND_RESULT_TAG, self)
    }

    pub fn from_message(line: &str) -> Result<Self> {
        decode_line(ROUND_RESULT_TAG, line)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Message(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Message(e.to_string()))
    }
}

/// A client's program for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCards {
    #[serde(rename = "poweredDown", default)]
    pub powered_down: bool,
    #[serde(default)]
    pub cards: Vec<ProgramCard>,
}

impl SelectedCards {
    pub fn new(cards: impl IntoIterator<Item = ProgramCard>) -> Self {
        Self {
            powered_down: false,
            cards: cards.into_iter().collect(),
        }
    }

    pub fn power_down() -> Self {
        Self {
            powered_down: true,
            cards: Vec::new(),
        }
    }

    /// `SELECTED_CARDS:<json>`
    pub fn to_message(&self) -> Result<String> {
        encode_line(SELECTED_CARDS_TAG, self)
    }

    pub fn from_message(line: &str) -> Result<Self> {
        decode_line(SELECTED_CARDS_TAG, line)
    }
}

fn encode_line<T: Serialize>(tag: &str, value: &T) -> Result<String> {
    let json = serde_json::to_string(value).map_err(|e| EngineError::Message(e.to_string()))?;
    Ok(format!("{tag}:{json}"))
}

fn decode_line<T: DeserializeOwned>(tag: &str, line: &str) -> Result<T> {
    let (found, json) = line
        .trim_end()
        .split_once(':')
        .ok_or_else(|| EngineError::Message(format!("missing tag in {line:?}")))?;
    if found != tag {
        return Err(EngineError::Message(format!("expected {tag}, got {found}")));
    }
    serde_json::from_str(json).map_err(|e| EngineError::Message(e.to_string()))
}
