//! # robo-engine
//!
//! Deterministic round-resolution engine for a programmed-robot board game.
//!
//! Robots execute up to five program cards per round on a tiled board full
//! of conveyors, gears, lasers, pits, walls and flags. The engine turns a
//! round's programs into one reproducible state transition.
//!
//! ## Design Principles
//!
//! 1. **Capabilities, not types**: tiles declare the capabilities they
//!    need (`Movable`, `Directional`, …); robots expose an open set. A
//!    robot missing a capability is simply skipped.
//!
//! 2. **Order-independent conflicts**: simultaneous moves are arbitrated
//!    against an occupancy snapshot, so the outcome never depends on the
//!    order proposals were listed in.
//!
//! 3. **Pure transitions**: a round is computed in one go. Presentation
//!    delays are attached to the resulting event log and never influence
//!    which move wins.
//!
//! ## Modules
//!
//! - `core`: entity ids, geometry, state, RNG, configuration, errors
//! - `board`: layered tile grid and the occupancy index
//! - `tiles`: tile kinds, capabilities and capability-checked dispatch
//! - `robots`: robot state and lifecycle
//! - `movement`: instructions, conflict resolver, unit-step execution
//! - `cards`: program deck and per-round program queue
//! - `round`: phase scheduler and flat round records
//! - `events`: presentation timeline, sinks, input validation
//!
//! ## Example
//!
//! ```
//! use robo_engine::{
//!     Board, Direction, EngineConfig, GameState, Movement, PhaseScheduler, Position, ProgramCard,
//!     ProgramQueue, RobotSpec,
//! };
//!
//! let board = Board::new(20, 20).unwrap();
//! let mut state = GameState::new(EngineConfig::default(), board).unwrap();
//! let robot = state
//!     .add_robot(RobotSpec::player("Twonky", Position::new(5, 5), Direction::North))
//!     .unwrap();
//!
//! let mut queue = ProgramQueue::new(state.config());
//! queue.submit(robot, [ProgramCard::new(Movement::Move3, 790)]).unwrap();
//! let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();
//!
//! assert_eq!(state.robot(robot).unwrap().position(), Position::new(5, 8));
//! assert!(report.result.to_message().unwrap().starts_with("ROUND_RESULT:"));
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod movement;
pub mod robots;
pub mod round;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{
    Direction, EngineConfig, EngineError, EntityId, GameRng, GameState, GameStatus, MapError,
    Position, Result, Rotation, TileError,
};

pub use crate::board::{Board, Layer, LayerKind, LayerSpec, MapSpec, BOARD_LAYER, FLAG_LAYER, MAX_BOARD_SIDE};

pub use crate::tiles::{
    ActionOutcome, Attribute, AttributeSet, Capability, CapabilitySet, Tile, TileDispatcher, TileEffect,
    TileKind, TileSpec, TileType, MAX_BEAMS,
};

pub use crate::robots::{LifeChange, Robot, RobotSpec, RobotStatus};

pub use crate::movement::{
    execute_instruction, resolve_batch, ConflictResolver, Motion, Movement, ProgramCard, Proposal, Rejection,
    Resolution, StepOutcome,
};

pub use crate::cards::{Program, ProgramDeck, ProgramQueue};

pub use crate::round::{Phase, PhaseScheduler, RobotRecord, RoundReport, RoundResult, SelectedCards};

pub use crate::events::{EngineEvent, EventLog, EventSink, SoundCue, SoundPlayer, SoundSink, TimedEvent, ZoomInput};
