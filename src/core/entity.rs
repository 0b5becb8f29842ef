//! Robot identifiers.
//!
//! Ids are handed out in placement order and never reused, so id order is
//! also the fixed scan order of every phase.
//!
//! ```
//! use robo_engine::core::EntityId;
//!
//! let first = EntityId::new(0);
//! assert!(first < first.next());
//! assert_eq!(first.next().to_string(), "robot #1");
//! ```

use serde::{Deserialize, Serialize};

/// Identifies one robot, player-controlled or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "robot #{}", self.0)
    }
}
