//! Board tiles.
//!
//! Maps describe tiles as loose [`TileSpec`] records (type, direction,
//! attributes, number). [`Tile::from_spec`] validates a record once and
//! turns it into a tagged [`TileKind`]; nothing downstream re-checks it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Direction, Position, Rotation, TileError};
use crate::events::SoundCue;

use super::{Attribute, AttributeSet, Capability, CapabilitySet};

/// Most parallel beams one laser emitter can fire.
pub const MAX_BEAMS: u32 = 4;

/// Tile type tag as written in a map file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Conveyor,
    Gear,
    Laser,
    Wall,
    Hole,
    Flag,
    Wrench,
    HammerAndWrench,
    Spawn,
}

impl TileType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileType::Conveyor => "conveyor",
            TileType::Gear => "gear",
            TileType::Laser => "laser",
            TileType::Wall => "wall",
            TileType::Hole => "hole",
            TileType::Flag => "flag",
            TileType::Wrench => "wrench",
            TileType::HammerAndWrench => "hammer and wrench",
            TileType::Spawn => "spawn",
        }
    }
}

/// Unvalidated tile record from a map layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Flag or spawn dock number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Laser beam count (defaults to 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beams: Option<u32>,
    /// Blocked wall edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Direction>,
}

impl TileSpec {
    pub fn new(x: i32, y: i32, tile_type: TileType) -> Self {
        Self {
            x,
            y,
            tile_type,
            direction: None,
            attributes: Vec::new(),
            number: None,
            beams: None,
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn facing(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn numbered(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    #[must_use]
    pub fn with_beams(mut self, beams: u32) -> Self {
        self.beams = Some(beams);
        self
    }

    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = Direction>) -> Self {
        self.edges.extend(edges);
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Validated tile behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Moves entities one cell in `direction`. A `turn` makes it a rotating conveyor.
    Conveyor {
        direction: Direction,
        express: bool,
        turn: Option<Rotation>,
    },
    Gear {
        rotation: Rotation,
    },
    /// Laser emitter firing `beams` parallel beams starting at its own cell.
    Laser {
        direction: Direction,
        beams: u32,
    },
    Wall {
        edges: SmallVec<[Direction; 4]>,
    },
    Hole,
    Flag {
        number: u32,
    },
    Wrench,
    HammerAndWrench,
    Spawn {
        number: u32,
    },
}

/// A validated tile at a fixed position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    position: Position,
    kind: TileKind,
    attributes: AttributeSet,
}

impl Tile {
    /// Validate a map record.
    pub fn from_spec(spec: &TileSpec) -> Result<Self, TileError> {
        let position = spec.position();
        let name = spec.tile_type.name();
        let attributes: AttributeSet = spec.attributes.iter().collect();

        let rotation = match (attributes.has(Attribute::Left), attributes.has(Attribute::Right)) {
            (true, true) => {
                return Err(TileError::ContradictoryRotation {
                    tile: name.to_string(),
                    position,
                })
            }
            (true, false) => Some(Rotation::Left),
            (false, true) => Some(Rotation::Right),
            (false, false) => None,
        };

        let unsupported = |attribute: Attribute| TileError::UnsupportedAttribute {
            attribute: attribute.to_string(),
            tile: name.to_string(),
            position,
        };
        let direction = || {
            spec.direction.ok_or_else(|| TileError::MissingDirection {
                tile: name.to_string(),
                position,
            })
        };

        if attributes.has(Attribute::HighPriority) && spec.tile_type != TileType::Conveyor {
            return Err(unsupported(Attribute::HighPriority));
        }
        if rotation.is_some() && !matches!(spec.tile_type, TileType::Conveyor | TileType::Gear) {
            let attribute = if attributes.has(Attribute::Left) { Attribute::Left } else { Attribute::Right };
            return Err(unsupported(attribute));
        }

        let kind = match spec.tile_type {
            TileType::Conveyor => TileKind::Conveyor {
                direction: direction()?,
                express: attributes.has(Attribute::HighPriority),
                turn: rotation,
            },
            TileType::Gear => TileKind::Gear {
                rotation: rotation.ok_or_else(|| TileError::MissingRotation {
                    tile: name.to_string(),
                    position,
                })?,
            },
            TileType::Laser => {
                let beams = spec.beams.unwrap_or(1);
                if beams == 0 {
                    return Err(TileError::NoBeams { position });
                }
                if beams > MAX_BEAMS {
                    return Err(TileError::TooManyBeams {
                        position,
                        beams,
                        max: MAX_BEAMS,
                    });
                }
                TileKind::Laser {
                    direction: direction()?,
                    beams,
                }
            }
            TileType::Wall => {
                let mut edges: SmallVec<[Direction; 4]> = SmallVec::new();
                for edge in &spec.edges {
                    if !edges.contains(edge) {
                        edges.push(*edge);
                    }
                }
                if edges.is_empty() {
                    return Err(TileError::NoWallEdges { position });
                }
                TileKind::Wall { edges }
            }
            TileType::Hole => TileKind::Hole,
            TileType::Flag => match spec.number {
                Some(number) if number >= 1 => TileKind::Flag { number },
                other => {
                    return Err(TileError::InvalidFlagNumber {
                        position,
                        number: other.unwrap_or(0),
                    })
                }
            },
            TileType::Wrench => TileKind::Wrench,
            TileType::HammerAndWrench => TileKind::HammerAndWrench,
            TileType::Spawn => TileKind::Spawn {
                number: spec.number.unwrap_or(0),
            },
        };

        let mut tile = Self {
            position,
            kind,
            attributes,
        };
        if matches!(tile.kind, TileKind::Hole) {
            tile.attributes = tile.attributes.with(Attribute::ActiveOnlyOnStep);
        }
        if tile.attributes.has(Attribute::ActiveOnlyOnStep) && tile.required_capabilities().is_empty() {
            return Err(unsupported(Attribute::ActiveOnlyOnStep));
        }
        Ok(tile)
    }

    fn build(position: Position, kind: TileKind) -> Self {
        let attributes = match &kind {
            TileKind::Conveyor { express, turn, .. } => {
                let mut set = AttributeSet::EMPTY;
                if *express {
                    set = set.with(Attribute::HighPriority);
                }
                match turn {
                    Some(Rotation::Left) => set.with(Attribute::Left),
                    Some(Rotation::Right) => set.with(Attribute::Right),
                    None => set,
                }
            }
            TileKind::Gear { rotation: Rotation::Left } => AttributeSet::EMPTY.with(Attribute::Left),
            TileKind::Gear { rotation: Rotation::Right } => AttributeSet::EMPTY.with(Attribute::Right),
            TileKind::Hole => AttributeSet::EMPTY.with(Attribute::ActiveOnlyOnStep),
            _ => AttributeSet::EMPTY,
        };
        Self {
            position,
            kind,
            attributes,
        }
    }

    pub fn conveyor(position: Position, direction: Direction, express: bool) -> Self {
        Self::build(
            position,
            TileKind::Conveyor {
                direction,
                express,
                turn: None,
            },
        )
    }

    pub fn rotating_conveyor(position: Position, direction: Direction, express: bool, turn: Rotation) -> Self {
        Self::build(
            position,
            TileKind::Conveyor {
                direction,
                express,
                turn: Some(turn),
            },
        )
    }

    pub fn gear(position: Position, rotation: Rotation) -> Self {
        Self::build(position, TileKind::Gear { rotation })
    }

    pub fn laser(position: Position, direction: Direction, beams: u32) -> Self {
        Self::build(
            position,
            TileKind::Laser {
                direction,
                beams: beams.clamp(1, MAX_BEAMS),
            },
        )
    }

    pub fn wall(position: Position, edges: &[Direction]) -> Self {
        Self::build(
            position,
            TileKind::Wall {
                edges: edges.iter().copied().collect(),
            },
        )
    }

    pub fn hole(position: Position) -> Self {
        Self::build(position, TileKind::Hole)
    }

    pub fn flag(position: Position, number: u32) -> Self {
        Self::build(
            position,
            TileKind::Flag {
                number: number.max(1),
            },
        )
    }

    pub fn wrench(position: Position) -> Self {
        Self::build(position, TileKind::Wrench)
    }

    pub fn hammer_and_wrench(position: Position) -> Self {
        Self::build(position, TileKind::HammerAndWrench)
    }

    pub fn spawn(position: Position, number: u32) -> Self {
        Self::build(position, TileKind::Spawn { number })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> &TileKind {
        &self.kind
    }

    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.has(attribute)
    }

    /// Acts only when an entity completes a step onto it.
    pub fn is_step_triggered(&self) -> bool {
        self.has_attribute(Attribute::ActiveOnlyOnStep)
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            TileKind::Conveyor { turn: Some(_), .. } => "rotating conveyor",
            TileKind::Conveyor { .. } => TileType::Conveyor.name(),
            TileKind::Gear { .. } => TileType::Gear.name(),
            TileKind::Laser { .. } => TileType::Laser.name(),
            TileKind::Wall { .. } => TileType::Wall.name(),
            TileKind::Hole => TileType::Hole.name(),
            TileKind::Flag { .. } => TileType::Flag.name(),
            TileKind::Wrench => TileType::Wrench.name(),
            TileKind::HammerAndWrench => TileType::HammerAndWrench.name(),
            TileKind::Spawn { .. } => TileType::Spawn.name(),
        }
    }

    /// Capabilities an entity needs for this tile to act on it.
    ///
    /// Empty for passive tiles (walls, spawns), which never act.
    pub fn required_capabilities(&self) -> CapabilitySet {
        match &self.kind {
            TileKind::Conveyor { .. } => CapabilitySet::of(&[Capability::Movable]),
            TileKind::Gear { .. } => CapabilitySet::of(&[Capability::Directional]),
            TileKind::Laser { .. } | TileKind::Hole => CapabilitySet::of(&[Capability::Damageable]),
            TileKind::Flag { .. } => CapabilitySet::of(&[Capability::FlagCollector, Capability::Backupable]),
            TileKind::Wrench | TileKind::HammerAndWrench => CapabilitySet::of(&[Capability::Backupable]),
            TileKind::Wall { .. } | TileKind::Spawn { .. } => CapabilitySet::EMPTY,
        }
    }

    /// Capability check that must pass before the tile's action is applied.
    pub fn can_act(&self, capabilities: CapabilitySet) -> bool {
        let required = self.required_capabilities();
        !required.is_empty() && capabilities.contains_all(required)
    }

    /// True if this tile has a wall on `edge`.
    pub fn blocks_edge(&self, edge: Direction) -> bool {
        match &self.kind {
            TileKind::Wall { edges } => edges.contains(&edge),
            _ => false,
        }
    }

    pub fn is_conveyor(&self) -> bool {
        matches!(self.kind, TileKind::Conveyor { .. })
    }

    pub fn is_express(&self) -> bool {
        matches!(self.kind, TileKind::Conveyor { express: true, .. })
    }

    /// Sound played after a successful action.
    pub fn action_sound(&self) -> Option<SoundCue> {
        match &self.kind {
            TileKind::Conveyor { .. } | TileKind::Gear { .. } => Some(SoundCue::Conveyor),
            TileKind::Laser { .. } => Some(SoundCue::Laser),
            TileKind::Hole => Some(SoundCue::RobotDestroyed),
            TileKind::Flag { .. } => Some(SoundCue::Flag),
            TileKind::Wrench => Some(SoundCue::BackupUpdated),
            TileKind::HammerAndWrench => Some(SoundCue::OptionCard),
            TileKind::Wall { .. } | TileKind::Spawn { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gear_requires_one_rotation() {
        let left = TileSpec::new(0, 0, TileType::Gear).with_attribute(Attribute::Left);
        assert_eq!(
            Tile::from_spec(&left).unwrap().kind(),
            &TileKind::Gear { rotation: Rotation::Left }
        );

        let both = left.clone().with_attribute(Attribute::Right);
        assert!(matches!(
            Tile::from_spec(&both),
            Err(TileError::ContradictoryRotation { .. })
        ));

        let none = TileSpec::new(0, 0, TileType::Gear);
        assert!(matches!(Tile::from_spec(&none), Err(TileError::MissingRotation { .. })));
    }

    #[test]
    fn test_conveyor_spec() {
        let spec = TileSpec::new(1, 2, TileType::Conveyor)
            .facing(Direction::East)
            .with_attribute(Attribute::HighPriority)
            .with_attribute(Attribute::Right);
        let tile = Tile::from_spec(&spec).unwrap();

        assert!(tile.is_express());
        assert_eq!(tile.name(), "rotating conveyor");
        assert_eq!(
            tile.kind(),
            &TileKind::Conveyor {
                direction: Direction::East,
                express: true,
                turn: Some(Rotation::Right),
            }
        );

        let missing = TileSpec::new(1, 2, TileType::Conveyor);
        assert!(matches!(Tile::from_spec(&missing), Err(TileError::MissingDirection { .. })));
    }

    #[test]
    fn test_unsupported_attributes() {
        let express_gear = TileSpec::new(0, 0, TileType::Gear)
            .with_attribute(Attribute::Left)
            .with_attribute(Attribute::HighPriority);
        assert!(matches!(
            Tile::from_spec(&express_gear),
            Err(TileError::UnsupportedAttribute { .. })
        ));

        let turning_flag = TileSpec::new(0, 0, TileType::Flag).numbered(1).with_attribute(Attribute::Left);
        assert!(Tile::from_spec(&turning_flag).is_err());

        let step_wall = TileSpec::new(0, 0, TileType::Wall)
            .with_edges([Direction::North])
            .with_attribute(Attribute::ActiveOnlyOnStep);
        assert!(Tile::from_spec(&step_wall).is_err());
    }

    #[test]
    fn test_flag_and_laser_validation() {
        assert!(matches!(
            Tile::from_spec(&TileSpec::new(0, 0, TileType::Flag)),
            Err(TileError::InvalidFlagNumber { number: 0, .. })
        ));
        let laser = TileSpec::new(0, 0, TileType::Laser).facing(Direction::North).with_beams(0);
        assert!(matches!(Tile::from_spec(&laser), Err(TileError::NoBeams { .. })));
        let huge = TileSpec::new(0, 0, TileType::Laser).facing(Direction::North).with_beams(u32::MAX);
        assert_eq!(
            Tile::from_spec(&huge).unwrap_err(),
            TileError::TooManyBeams {
                position: Position::new(0, 0),
                beams: u32::MAX,
                max: MAX_BEAMS
            }
        );
        assert_eq!(
            Tile::laser(Position::new(0, 0), Direction::North, 1000).kind(),
            &TileKind::Laser {
                direction: Direction::North,
                beams: MAX_BEAMS
            }
        );

        let double = TileSpec::new(0, 0, TileType::Laser).facing(Direction::North).with_beams(2);
        assert_eq!(
            Tile::from_spec(&double).unwrap().kind(),
            &TileKind::Laser {
                direction: Direction::North,
                beams: 2
            }
        );
    }

    #[test]
    fn test_wall_edges() {
        let spec = TileSpec::new(0, 0, TileType::Wall).with_edges([Direction::East, Direction::East]);
        let wall = Tile::from_spec(&spec).unwrap();
        assert!(wall.blocks_edge(Direction::East));
        assert!(!wall.blocks_edge(Direction::West));
        assert!(wall.required_capabilities().is_empty());

        let empty = TileSpec::new(0, 0, TileType::Wall);
        assert!(matches!(Tile::from_spec(&empty), Err(TileError::NoWallEdges { .. })));
    }

    #[test]
    fn test_hole_is_step_triggered() {
        let hole = Tile::from_spec(&TileSpec::new(3, 3, TileType::Hole)).unwrap();
        assert!(hole.is_step_triggered());
        assert_eq!(hole, Tile::hole(Position::new(3, 3)));
    }

    #[test]
    fn test_capability_dispatch() {
        let gear = Tile::gear(Position::new(0, 0), Rotation::Right);
        assert!(gear.can_act(CapabilitySet::of(&[Capability::Directional])));
        assert!(!gear.can_act(CapabilitySet::of(&[Capability::Movable])));

        let flag = Tile::flag(Position::new(0, 0), 1);
        let npc = CapabilitySet::FULL.without(Capability::FlagCollector);
        assert!(!flag.can_act(npc));
        assert!(flag.can_act(CapabilitySet::FULL));

        let spawn = Tile::spawn(Position::new(0, 0), 1);
        assert!(!spawn.can_act(CapabilitySet::FULL));
    }

    #[test]
    fn test_spec_json() {
        let json = r#"{"x": 2, "y": 3, "type": "CONVEYOR", "direction": "WEST", "attributes": ["HIGH_PRIORITY"]}"#;
        let spec: TileSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.tile_type, TileType::Conveyor);
        assert_eq!(spec.direction, Some(Direction::West));
        assert!(Tile::from_spec(&spec).unwrap().is_express());
    }
}
