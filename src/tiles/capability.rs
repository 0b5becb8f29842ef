//! Entity capabilities.
//!
//! A tile never asks what *kind* of entity stands on it, only which
//! behaviours the entity supports. Each robot carries a [`CapabilitySet`];
//! each action tile declares the set it requires.

use serde::{Deserialize, Serialize};

/// A behaviour an entity may or may not support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Can be moved one cell by the board (conveyors).
    Movable,
    /// Can report and change its facing (gears, rotating conveyors).
    Directional,
    /// Has health and lives (lasers, pits).
    Damageable,
    /// Can store a respawn backup point (wrenches, flags).
    Backupable,
    /// Can register flag visits.
    FlagCollector,
    /// Blocks other entities and laser beams.
    Collidable,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Movable,
        Capability::Directional,
        Capability::Damageable,
        Capability::Backupable,
        Capability::FlagCollector,
        Capability::Collidable,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A small bitset of capabilities.
///
/// ```
/// use robo_engine::tiles::{Capability, CapabilitySet};
///
/// let robot = CapabilitySet::of(&[Capability::Movable, Capability::Directional]);
/// let gear = CapabilitySet::of(&[Capability::Directional]);
/// assert!(robot.contains_all(gear));
/// assert!(!gear.contains_all(robot));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const EMPTY: Self = Self(0);

    /// Every capability; what a player robot supports.
    pub const FULL: Self = Self::of(&Capability::ALL);

    #[must_use]
    pub const fn of(capabilities: &[Capability]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < capabilities.len() {
            bits |= capabilities[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    #[must_use]
    pub const fn without(self, capability: Capability) -> Self {
        Self(self.0 & !capability.bit())
    }

    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// True if every capability in `required` is present.
    #[must_use]
    pub const fn contains_all(self, required: CapabilitySet) -> bool {
        self.0 & required.0 == required.0
    }

    /// Capabilities in `required` that this set lacks.
    #[must_use]
    pub const fn missing(self, required: CapabilitySet) -> CapabilitySet {
        Self(required.0 & !self.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, CapabilitySet::with)
    }
}

impl std::fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
