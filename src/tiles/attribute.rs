//! Declared tile attributes.
//!
//! Attributes are flags read from the map. They tweak how a tile type
//! behaves (express conveyor, rotation sense, step-triggered) and are
//! validated once when the tile is built.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attribute {
    /// Express conveyor: also acts in the express sub-phase.
    HighPriority,
    /// Acts only when an entity completes a step onto the tile.
    ActiveOnlyOnStep,
    /// Rotates counter-clockwise.
    Left,
    /// Rotates clockwise.
    Right,
}

impl Attribute {
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::HighPriority => "HIGH_PRIORITY",
            Attribute::ActiveOnlyOnStep => "ACTIVE_ONLY_ON_STEP",
            Attribute::Left => "LEFT",
            Attribute::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// Set of attributes carried by one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSet(u8);

impl AttributeSet {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn with(self, attribute: Attribute) -> Self {
        Self(self.0 | attribute.bit())
    }

    #[must_use]
    pub const fn has(self, attribute: Attribute) -> bool {
        self.0 & attribute.bit() != 0
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, AttributeSet::with)
    }
}

impl<'a> FromIterator<&'a Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = &'a Attribute>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
