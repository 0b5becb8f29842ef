use serde::{Deserialize, Serialize};

/// One stage of the fixed per-round order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// One register of program cards, in ascending priority.
    Movement,
    /// Express conveyors move entities one cell.
    ExpressConveyors,
    /// All conveyors move entities one cell.
    Conveyors,
    /// Entities carried onto a rotating conveyor turn with it.
    ConveyorRotation,
    Gears,
    Lasers,
    /// Flags and repair tiles.
    Registration,
    /// Pending respawns and power-down repairs.
    Cleanup,
}

impl Phase {
    /// Board phases in execution order, after all movement registers.
    pub const BOARD: [Phase; 7] = [
        Phase::ExpressConveyors,
        Phase::Conveyors,
        Phase::ConveyorRotation,
        Phase::Gears,
        Phase::Lasers,
        Phase::Registration,
        Phase::Cleanup,
    ];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Movement => "movement",
            Phase::ExpressConveyors => "express conveyors",
            Phase::Conveyors => "conveyors",
            Phase::ConveyorRotation => "conveyor rotation",
            Phase::Gears => "gears",
            Phase::Lasers => "lasers",
            Phase::Registration => "registration",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}
