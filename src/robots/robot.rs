//! Robot state and its lifecycle arithmetic.
//!
//! The methods here only touch the robot's own fields. Anything that also
//! touches the board (removal, respawn placement) goes through
//! [`GameState`](crate::core::GameState), which calls into these.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, EngineConfig, EngineError, EntityId, Position, Result};
use crate::tiles::{Capability, CapabilitySet};

/// Lifecycle state.
///
/// `Alive` robots are on the board. `Respawning` robots lost a life and
/// wait for their backup cell to free up. `Destroyed` robots have no
/// lives left and never return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotStatus {
    Alive,
    Respawning,
    Destroyed,
}

/// Result of losing health or a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeChange {
    /// Health dropped but stayed positive.
    Damaged,
    /// A life was lost and lives remain; health is back to max.
    LifeLost,
    /// The last life was lost.
    Destroyed,
}

/// Placement request for a new robot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotSpec {
    pub name: String,
    pub position: Position,
    pub direction: Direction,
    #[serde(default = "default_capabilities")]
    pub capabilities: CapabilitySet,
    #[serde(default)]
    pub dock: u32,
}

fn default_capabilities() -> CapabilitySet {
    CapabilitySet::FULL
}

impl RobotSpec {
    /// A player robot supporting every capability.
    pub fn player(name: impl Into<String>, position: Position, direction: Direction) -> Self {
        Self {
            name: name.into(),
            position,
            direction,
            capabilities: CapabilitySet::FULL,
            dock: 0,
        }
    }

    /// A non-player robot: moved and shot by the board but cannot collect flags.
    pub fn non_player(name: impl Into<String>, position: Position, direction: Direction) -> Self {
        Self {
            capabilities: CapabilitySet::FULL.without(Capability::FlagCollector),
            ..Self::player(name, position, direction)
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_dock(mut self, dock: u32) -> Self {
        self.dock = dock;
        self
    }
}

/// A mobile actor on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) health: i32,
    pub(crate) lives: i32,
    pub(crate) flags: u32,
    pub(crate) backup: Position,
    pub(crate) capabilities: CapabilitySet,
    pub(crate) status: RobotStatus,
    pub(crate) dock: u32,
    pub(crate) powered_down: bool,
}

impl Robot {
    pub(crate) fn new(id: EntityId, spec: RobotSpec, config: &EngineConfig) -> Self {
        Self {
            id,
            name: spec.name,
            position: spec.position,
            direction: spec.direction,
            health: config.max_health,
            lives: config.max_lives,
            flags: 0,
            backup: spec.position,
            capabilities: spec.capabilities,
            status: RobotStatus::Alive,
            dock: spec.dock,
            powered_down: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last settled cell. Meaningful on the board only while `Alive`.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    /// Number of flags registered so far.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn backup(&self) -> Position {
        self.backup
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn status(&self) -> RobotStatus {
        self.status
    }

    pub fn dock(&self) -> u32 {
        self.dock
    }

    pub fn is_alive(&self) -> bool {
        self.status == RobotStatus::Alive
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == RobotStatus::Destroyed
    }

    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    /// `max_health - health`.
    pub fn damage_tokens(&self, config: &EngineConfig) -> i32 {
        config.max_health - self.health
    }

    /// Flags must be collected strictly in order: 1, 2, 3, …
    pub fn can_get_flag(&self, number: u32) -> bool {
        self.flags + 1 == number
    }

    pub(crate) fn register_flag(&mut self) {
        self.flags += 1;
    }

    pub(crate) fn take_damage(&mut self, amount: i32, config: &EngineConfig) -> Result<LifeChange> {
        if amount <= 0 {
            return Err(EngineError::NonPositiveAmount { action: "damage", amount });
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            Ok(self.lose_life(config))
        } else {
            Ok(LifeChange::Damaged)
        }
    }

    pub(crate) fn heal(&mut self, amount: i32, config: &EngineConfig) -> Result<()> {
        if amount <= 0 {
            return Err(EngineError::NonPositiveAmount { action: "heal", amount });
        }
        self.health = (self.health + amount).min(config.max_health);
        Ok(())
    }

    pub(crate) fn lose_life(&mut self, config: &EngineConfig) -> LifeChange {
        self.lives = (self.lives - 1).max(0);
        if self.lives == 0 {
            self.health = 0;
            self.status = RobotStatus::Destroyed;
            LifeChange::Destroyed
        } else {
            self.health = config.max_health;
            self.status = RobotStatus::Respawning;
            LifeChange::LifeLost
        }
    }
}
