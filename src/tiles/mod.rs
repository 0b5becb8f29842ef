//! Tile capability system.
//!
//! Tiles are a tagged enum with an explicit required-capability set.
//! Entities expose an open [`CapabilitySet`]. The [`TileDispatcher`]
//! matches the two at runtime; no tile ever inspects an entity's type.

mod attribute;
mod capability;
mod dispatch;
mod tile;

pub use attribute::{Attribute, AttributeSet};
pub use capability::{Capability, CapabilitySet};
pub use dispatch::{ActionOutcome, TileDispatcher, TileEffect};
pub use tile::{Tile, TileKind, TileSpec, TileType, MAX_BEAMS};
