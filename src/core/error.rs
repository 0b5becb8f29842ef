//! Engine error types.
//!
//! Three families, matching how failures propagate:
//! - [`MapError`] / [`TileError`]: fatal at map load. Nothing is simulated.
//! - [`EngineError`]: invalid input rejected at the call boundary, or fatal
//!   engine construction (player count, config).
//!
//! Blocked moves, capability mismatches, robots destroyed mid-round and
//! out-of-order flags are ordinary outcomes and never surface here.

use thiserror::Error;

use super::{EntityId, Position};

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Invalid tile configuration, detected once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("{tile} at {position} rotates both to the left and to the right")]
    ContradictoryRotation { tile: String, position: Position },

    #[error("{tile} at {position} does not rotate")]
    MissingRotation { tile: String, position: Position },

    #[error("{tile} at {position} needs a direction")]
    MissingDirection { tile: String, position: Position },

    #[error("flag at {position} has invalid number {number}")]
    InvalidFlagNumber { position: Position, number: u32 },

    #[error("laser at {position} must fire at least one beam")]
    NoBeams { position: Position },

    #[error("laser at {position} fires {beams} beams, at most {max} allowed")]
    TooManyBeams { position: Position, beams: u32, max: u32 },

    #[error("wall at {position} does not block any edge")]
    NoWallEdges { position: Position },

    #[error("attribute {attribute} is not valid on {tile} at {position}")]
    UnsupportedAttribute {
        attribute: String,
        tile: String,
        position: Position,
    },
}

/// Invalid map, detected once at load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map must have a non-zero size, got {width}x{height}")]
    EmptyBoard { width: i32, height: i32 },

    #[error("map is {width}x{height}, sides are limited to {max} cells")]
    BoardTooLarge { width: i32, height: i32, max: i32 },

    #[error("map does not have a board layer named \"{0}\"")]
    MissingBoardLayer(String),

    #[error("layer \"{name}\" is {width}x{height}, expected a {expected_width}x{expected_height} tile grid")]
    LayerShape {
        name: String,
        width: i32,
        height: i32,
        expected_width: i32,
        expected_height: i32,
    },

    #[error("layer \"{0}\" is not a tile layer")]
    NotTileLayer(String),

    #[error("layer \"{0}\" is defined more than once")]
    DuplicateLayer(String),

    #[error("layer \"{layer}\" places a tile outside the board at {position}")]
    TileOutOfBounds { layer: String, position: Position },

    #[error("layer \"{layer}\" places two tiles at {position}")]
    DuplicateTile { layer: String, position: Position },

    #[error(transparent)]
    Tile(#[from] TileError),
}

/// Invalid input or engine construction failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("invalid player count {count}, expected {min}..={max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    #[error("cannot {action} a non-positive amount ({amount})")]
    NonPositiveAmount { action: &'static str, amount: i32 },

    #[error("{position} is outside the board")]
    OffBoard { position: Position },

    #[error("cell {position} is already occupied by {occupant}")]
    Occupied { position: Position, occupant: EntityId },

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("{0} is not on the board")]
    NotOnBoard(EntityId),

    #[error("invalid program for {entity}: {reason}")]
    InvalidProgram { entity: EntityId, reason: String },

    #[error("zoom direction cannot be 0")]
    ZeroZoom,

    #[error("malformed message: {0}")]
    Message(String),
}

impl EngineError {
    pub(crate) fn program(entity: EntityId, reason: impl Into<String>) -> Self {
        Self::InvalidProgram {
            entity,
            reason: reason.into(),
        }
    }
}
