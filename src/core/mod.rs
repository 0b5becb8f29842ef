//! Core engine types: entities, geometry, state, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these. Rule constants come from
//! [`EngineConfig`] rather than being hardcoded in the phases.

pub mod config;
pub mod direction;
pub mod entity;
pub mod error;
pub mod position;
pub mod rng;
pub mod state;

pub use config::EngineConfig;
pub use direction::{Direction, Rotation};
pub use entity::EntityId;
pub use error::{EngineError, MapError, Result, TileError};
pub use position::Position;
pub use rng::GameRng;
pub use state::{GameState, GameStatus};
