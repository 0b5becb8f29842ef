//! Engine events and the presentation timeline.
//!
//! The engine computes a round as one pure state transition. Every change
//! it makes along the way is appended to an [`EventLog`] together with the
//! presentation time at which an animation layer should show it. The
//! timestamps are derived from the configured step and phase delays and
//! never feed back into simulation order.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, EntityId, Position};
use crate::round::Phase;

/// Sound requested by a successful action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundCue {
    RobotMoving,
    Conveyor,
    Laser,
    Flag,
    BackupUpdated,
    OptionCard,
    RobotDestroyed,
}

/// Something that changed during a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    PhaseStarted { round: u32, phase: Phase },
    Moved { entity: EntityId, from: Position, to: Position },
    Turned { entity: EntityId, from: Direction, to: Direction },
    Damaged { entity: EntityId, amount: i32, health: i32 },
    Healed { entity: EntityId, amount: i32, health: i32 },
    /// A life was lost; `lives` is what remains.
    LifeLost { entity: EntityId, lives: i32 },
    Respawned { entity: EntityId, position: Position },
    /// Backup cell was occupied; the robot waits off-board until cleanup.
    AwaitingRespawn { entity: EntityId },
    Destroyed { entity: EntityId },
    FlagRegistered { entity: EntityId, number: u32 },
    BackupUpdated { entity: EntityId, position: Position },
    PoweredDown { entity: EntityId },
    Repaired { entity: EntityId, health: i32 },
    Sound { cue: SoundCue },
}

impl EngineEvent {
    /// The robot this event is about, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            EngineEvent::Moved { entity, .. }
            | EngineEvent::Turned { entity, .. }
            | EngineEvent::Damaged { entity, .. }
            | EngineEvent::Healed { entity, .. }
            | EngineEvent::LifeLost { entity, .. }
            | EngineEvent::Respawned { entity, .. }
            | EngineEvent::AwaitingRespawn { entity }
            | EngineEvent::Destroyed { entity }
            | EngineEvent::FlagRegistered { entity, .. }
            | EngineEvent::BackupUpdated { entity, .. }
            | EngineEvent::PoweredDown { entity }
            | EngineEvent::Repaired { entity, .. } => Some(*entity),
            EngineEvent::PhaseStarted { .. } | EngineEvent::Sound { .. } => None,
        }
    }
}

/// An event with its presentation time, relative to the round start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: EngineEvent,
}

/// Ordered record of everything that happened in a round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    clock_ms: u64,
    events: Vec<TimedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the current presentation time.
    pub fn record(&mut self, event: EngineEvent) {
        log::trace!("t={}ms {:?}", self.clock_ms, event);
        self.events.push(TimedEvent {
            at_ms: self.clock_ms,
            event,
        });
    }

    /// Move the presentation clock forward.
    pub fn advance(&mut self, delay_ms: u64) {
        self.clock_ms += delay_ms;
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineEvent> {
        self.events.iter().map(|e| &e.event)
    }

    /// Events about one robot, in order.
    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = &EngineEvent> {
        self.iter().filter(move |e| e.entity() == Some(entity))
    }

    /// Sounds requested so far, in order.
    pub fn sounds(&self) -> impl Iterator<Item = SoundCue> + '_ {
        self.iter().filter_map(|e| match e {
            EngineEvent::Sound { cue } => Some(*cue),
            _ => None,
        })
    }
}
