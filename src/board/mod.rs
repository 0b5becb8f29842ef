//! Board model.
//!
//! A fixed rectangle of cells. Each cell holds at most one static tile per
//! named layer and at most one entity. The map collaborator supplies a
//! [`MapSpec`]; [`Board::from_spec`] validates it once and fails fatally
//! on any inconsistency.

mod grid;
mod layer;

pub use grid::{Board, MapSpec, MAX_BOARD_SIDE};
pub use layer::{Layer, LayerKind, LayerSpec, BOARD_LAYER, FLAG_LAYER};
