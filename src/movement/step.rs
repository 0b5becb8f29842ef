//! Unit-step execution.
//!
//! Every movement, from a program card or a conveyor, is broken into unit
//! steps. A batch of unit steps happening in the same instant goes through
//! [`resolve_batch`]: off-board targets destroy the mover, walls block,
//! the [`ConflictResolver`] arbitrates the rest, and step-triggered tiles
//! act on whoever arrived.

use smallvec::SmallVec;

use crate::core::{Direction, EntityId, GameState, Position};
use crate::events::{EngineEvent, SoundCue};
use crate::tiles::{Tile, TileDispatcher};

use super::instruction::{Motion, Movement};
use super::resolver::{ConflictResolver, Proposal, Rejection};

/// What happened to one unit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { from: Position, to: Position },
    /// Lost to another entity.
    Blocked { reason: Rejection },
    /// A wall on the edge between the two cells.
    Walled,
    /// The target was off the board; the entity lost a life.
    FellOff,
    /// The entity is not on the board.
    Skipped,
}

impl StepOutcome {
    pub fn is_moved(self) -> bool {
        matches!(self, StepOutcome::Moved { .. })
    }
}

/// Resolve one instant of simultaneous unit steps.
///
/// Returns one outcome per requested entity, sorted by entity id.
pub fn resolve_batch(state: &mut GameState, steps: &[(EntityId, Direction)]) -> Vec<(EntityId, StepOutcome)> {
    let mut outcomes: Vec<(EntityId, StepOutcome)> = Vec::with_capacity(steps.len());
    let mut proposals: Vec<Proposal> = Vec::new();
    let mut falling: Vec<EntityId> = Vec::new();

    for &(entity, direction) in steps {
        let Some(robot) = state.robot(entity).filter(|r| r.is_alive()) else {
            outcomes.push((entity, StepOutcome::Skipped));
            continue;
        };
        let from = robot.position();
        let to = from.step(direction);
        if !state.board().contains(to) {
            falling.push(entity);
        } else if state.board().wall_blocks(from, direction) {
            outcomes.push((entity, StepOutcome::Walled));
        } else {
            proposals.push(Proposal::new(entity, from, to));
        }
    }

    // robots leaving the board free their cell for this instant
    for entity in &falling {
        state.lift_off(*entity);
    }

    let resolution = ConflictResolver::resolve(state.board().occupancy(), &proposals);
    for (proposal, reason) in &resolution.rejected {
        log::debug!("{} blocked moving to {}: {:?}", proposal.entity, proposal.to, reason);
        outcomes.push((proposal.entity, StepOutcome::Blocked { reason: *reason }));
    }

    let moves: Vec<(EntityId, Position, Position)> =
        resolution.accepted.iter().map(|p| (p.entity, p.from, p.to)).collect();
    state.apply_moves(&moves);

    for entity in falling {
        log::debug!("{} fell off the board", entity);
        if state.kill(entity).is_ok() {
            state.record(EngineEvent::Sound {
                cue: SoundCue::RobotDestroyed,
            });
        }
        outcomes.push((entity, StepOutcome::FellOff));
    }

    for &(entity, from, to) in &moves {
        outcomes.push((entity, StepOutcome::Moved { from, to }));
        trigger_step_tiles(state, entity, to);
    }

    outcomes.sort_by_key(|(entity, _)| *entity);
    outcomes
}

/// Let every step-triggered tile at `position` act on the entity that
/// just arrived.
fn trigger_step_tiles(state: &mut GameState, entity: EntityId, position: Position) {
    let tiles: SmallVec<[Tile; 2]> = state
        .board()
        .tiles_at(position)
        .into_iter()
        .filter(|t| t.is_step_triggered())
        .cloned()
        .collect();
    for tile in &tiles {
        TileDispatcher::dispatch(state, tile, entity);
    }
}

/// Execute one program instruction, one unit step at a time.
///
/// Movement halts at the first step that does not succeed. Returns the
/// number of unit steps actually taken.
pub fn execute_instruction(state: &mut GameState, entity: EntityId, movement: Movement) -> u32 {
    let Some(robot) = state.robot(entity).filter(|r| r.is_alive()) else {
        return 0;
    };
    let facing = robot.direction();
    log::debug!("{} executes {}", entity, movement);

    match movement.motion() {
        Motion::Turn(rotation) => {
            if state.turn(entity, rotation).is_ok() {
                state.record(EngineEvent::Sound {
                    cue: SoundCue::RobotMoving,
                });
            }
            0
        }
        Motion::UTurn => {
            if state.set_direction(entity, facing.inverse()).is_ok() {
                state.record(EngineEvent::Sound {
                    cue: SoundCue::RobotMoving,
                });
            }
            0
        }
        Motion::Steps { steps, .. } => {
            let direction = movement.step_direction(facing);
            let step_delay = state.config().step_delay_ms;
            let mut taken = 0;
            for _ in 0..steps {
                let outcome = resolve_batch(state, &[(entity, direction)]);
                let moved = outcome.first().is_some_and(|(_, o)| o.is_moved());
                if !moved {
                    break;
                }
                taken += 1;
                state.record(EngineEvent::Sound {
                    cue: SoundCue::RobotMoving,
                });
                state.advance_clock(step_delay);
                // a pit on the way ends the instruction
                if state.is_casualty(entity) {
                    break;
                }
            }
            taken
        }
    }
}
