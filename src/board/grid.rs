//! The board: static tile layers plus the authoritative entity-position index.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Direction, EngineError, EntityId, MapError, Position};
use crate::tiles::{Tile, TileKind};

use super::layer::{Layer, LayerSpec, BOARD_LAYER, FLAG_LAYER};

/// Longest board side accepted from a map.
pub const MAX_BOARD_SIDE: i32 = 1024;

/// Map description handed over by the map collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSpec {
    pub width: i32,
    pub height: i32,
    pub layers: Vec<LayerSpec>,
}

impl MapSpec {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }
}

/// Fixed-size rectangular board.
///
/// Owns every tile and the cell → entity index. Robots' own position
/// fields mirror this index; [`GameState`](crate::core::GameState) keeps
/// the two in sync.
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    layers: Vec<Layer>,
    occupancy: FxHashMap<Position, EntityId>,
}

impl Board {
    /// An empty board with just a board layer.
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        Self::from_spec(&MapSpec::new(width, height).with_layer(LayerSpec::new(BOARD_LAYER)))
    }

    /// Validate a map and build the board.
    ///
    /// Fails if the size is zero, any layer is not a full-size tile grid,
    /// a layer name repeats, no board layer exists, or any tile is invalid.
    pub fn from_spec(spec: &MapSpec) -> Result<Self, MapError> {
        if spec.width <= 0 || spec.height <= 0 {
            return Err(MapError::EmptyBoard {
                width: spec.width,
                height: spec.height,
            });
        }
        if spec.width > MAX_BOARD_SIDE || spec.height > MAX_BOARD_SIDE {
            return Err(MapError::BoardTooLarge {
                width: spec.width,
                height: spec.height,
                max: MAX_BOARD_SIDE,
            });
        }

        let mut layers: Vec<Layer> = Vec::with_capacity(spec.layers.len());
        for layer_spec in &spec.layers {
            if layers.iter().any(|l| l.name() == layer_spec.name) {
                return Err(MapError::DuplicateLayer(layer_spec.name.clone()));
            }
            layers.push(Layer::from_spec(layer_spec, spec.width, spec.height)?);
        }
        if !layers.iter().any(|l| l.name() == BOARD_LAYER) {
            return Err(MapError::MissingBoardLayer(BOARD_LAYER.to_string()));
        }

        log::debug!("loaded {}x{} map with {} layers", spec.width, spec.height, layers.len());
        Ok(Self {
            width: spec.width,
            height: spec.height,
            layers,
            occupancy: FxHashMap::default(),
        })
    }

    /// Add a tile to a layer, creating the layer if needed.
    pub fn with_tile(mut self, layer: &str, tile: Tile) -> Result<Self, MapError> {
        let index = match self.layers.iter().position(|l| l.name() == layer) {
            Some(index) => index,
            None => {
                self.layers.push(Layer::empty(layer, self.width, self.height));
                self.layers.len() - 1
            }
        };
        self.layers[index].insert(tile)?;
        Ok(self)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True if `position` lies on the board.
    pub fn contains(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn tile(&self, layer: &str, position: Position) -> Option<&Tile> {
        self.layer(layer).and_then(|l| l.get(position))
    }

    pub fn board_tile(&self, position: Position) -> Option<&Tile> {
        self.tile(BOARD_LAYER, position)
    }

    pub fn flag_tile(&self, position: Position) -> Option<&Tile> {
        self.tile(FLAG_LAYER, position)
    }

    /// Every tile at a cell, in layer order.
    pub fn tiles_at(&self, position: Position) -> SmallVec<[&Tile; 4]> {
        self.layers.iter().filter_map(|l| l.get(position)).collect()
    }

    /// Tiles of one layer in scan order.
    pub fn tiles_on<'a>(&'a self, layer: &str) -> impl Iterator<Item = &'a Tile> + 'a {
        self.layer(layer).into_iter().flat_map(Layer::tiles)
    }

    /// All tiles on all layers.
    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.layers.iter().flat_map(Layer::tiles)
    }

    /// True if a wall stops movement (or a beam) from `from` towards `direction`.
    ///
    /// Checks the exit edge of `from` and the entry edge of the neighbour.
    pub fn wall_blocks(&self, from: Position, direction: Direction) -> bool {
        let to = from.step(direction);
        self.tiles_at(from).iter().any(|t| t.blocks_edge(direction))
            || self.tiles_at(to).iter().any(|t| t.blocks_edge(direction.inverse()))
    }

    /// Number of distinct flags on the board.
    pub fn flag_count(&self) -> u32 {
        let mut numbers: SmallVec<[u32; 8]> = self
            .all_tiles()
            .filter_map(|t| match t.kind() {
                TileKind::Flag { number } => Some(*number),
                _ => None,
            })
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers.len() as u32
    }

    /// Spawn docks sorted by dock number.
    pub fn spawns(&self) -> Vec<(u32, Position)> {
        let mut spawns: Vec<_> = self
            .all_tiles()
            .filter_map(|t| match t.kind() {
                TileKind::Spawn { number } => Some((*number, t.position())),
                _ => None,
            })
            .collect();
        spawns.sort();
        spawns
    }

    pub fn entity_at(&self, position: Position) -> Option<EntityId> {
        self.occupancy.get(&position).copied()
    }

    /// Current cell → entity index.
    pub fn occupancy(&self) -> &FxHashMap<Position, EntityId> {
        &self.occupancy
    }

    pub(crate) fn place(&mut self, entity: EntityId, position: Position) -> Result<(), EngineError> {
        if !self.contains(position) {
            return Err(EngineError::OffBoard { position });
        }
        if let Some(occupant) = self.entity_at(position) {
            if occupant != entity {
                return Err(EngineError::Occupied { position, occupant });
            }
        }
        self.occupancy.insert(position, entity);
        Ok(())
    }

    pub(crate) fn vacate(&mut self, position: Position) -> Option<EntityId> {
        self.occupancy.remove(&position)
    }

    /// Apply a batch of already-arbitrated moves as one transition.
    pub(crate) fn apply_moves(&mut self, moves: &[(EntityId, Position, Position)]) {
        for (entity, from, _) in moves {
            if self.occupancy.get(from) == Some(entity) {
                self.occupancy.remove(from);
            }
        }
        for (entity, _, to) in moves {
            debug_assert!(self.contains(*to));
            let previous = self.occupancy.insert(*to, *entity);
            debug_assert!(previous.is_none(), "move into occupied cell {to}");
        }
    }
}
