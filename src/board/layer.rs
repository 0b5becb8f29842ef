//! Named tile layers.
//!
//! Every layer is a dense `width * height` grid holding at most one tile
//! per cell. Cells are stored column-major (x outer, y inner), which is
//! also the scan order phases use.

use serde::{Deserialize, Serialize};

use crate::core::{MapError, Position};
use crate::tiles::{Tile, TileSpec};

/// Name of the mandatory layer holding conveyors, gears, lasers and holes.
pub const BOARD_LAYER: &str = "board";

/// Name of the optional layer holding flags and wrenches.
pub const FLAG_LAYER: &str = "flag";

/// Kind of a map layer. Only tile grids can be simulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerKind {
    #[default]
    Tiles,
    Objects,
    Image,
}

/// Unvalidated layer record from a map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    #[serde(default)]
    pub kind: LayerKind,
    /// Defaults to the map size.
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Tiles,
            width: None,
            height: None,
            tiles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tile(mut self, tile: TileSpec) -> Self {
        self.tiles.push(tile);
        self
    }
}

/// A validated tile grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    name: String,
    width: i32,
    height: i32,
    cells: Vec<Option<Tile>>,
}

impl Layer {
    /// An empty layer of the given size.
    pub fn empty(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            cells: vec![None; width.max(0) as usize * height.max(0) as usize],
        }
    }

    /// Validate a layer record against the board size.
    pub fn from_spec(spec: &LayerSpec, width: i32, height: i32) -> Result<Self, MapError> {
        let layer_width = spec.width.unwrap_or(width);
        let layer_height = spec.height.unwrap_or(height);
        if spec.kind != LayerKind::Tiles {
            return Err(MapError::NotTileLayer(spec.name.clone()));
        }
        if layer_width != width || layer_height != height {
            return Err(MapError::LayerShape {
                name: spec.name.clone(),
                width: layer_width,
                height: layer_height,
                expected_width: width,
                expected_height: height,
            });
        }

        let mut layer = Self::empty(spec.name.clone(), width, height);
        for tile_spec in &spec.tiles {
            let tile = Tile::from_spec(tile_spec)?;
            layer.insert(tile)?;
        }
        Ok(layer)
    }

    /// Place a tile, rejecting off-grid or doubled cells.
    pub fn insert(&mut self, tile: Tile) -> Result<(), MapError> {
        let position = tile.position();
        let index = self.index(position).ok_or_else(|| MapError::TileOutOfBounds {
            layer: self.name.clone(),
            position,
        })?;
        if self.cells[index].is_some() {
            return Err(MapError::DuplicateTile {
                layer: self.name.clone(),
                position,
            });
        }
        self.cells[index] = Some(tile);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|i| self.cells[i].as_ref())
    }

    /// Tiles in scan order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let inside = (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y);
        inside.then(|| (position.x * self.height + position.y) as usize)
    }
}
