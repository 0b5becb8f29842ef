//! Phase scheduler.
//!
//! Runs one round as a single state transition:
//!
//! 1. every program register, one instruction at a time in ascending
//!    priority
//! 2. express conveyors, then all conveyors, then conveyor rotation
//! 3. gears
//! 4. lasers
//! 5. flag and repair registration
//! 6. cleanup (pending respawns, power-down repairs)
//!
//! Robots that lose a life during the round drop their remaining
//! instructions and sit out the remaining board phases. Once a phase
//! settles it is never rolled back.

use rustc_hash::FxHashMap;

use crate::cards::ProgramQueue;
use crate::core::{Direction, EngineError, EntityId, GameState, GameStatus, Position, Result, Rotation};
use crate::events::{EngineEvent, EventLog};
use crate::movement::execute_instruction;
use crate::tiles::{Capability, Tile, TileDispatcher, TileKind};

use super::phase::Phase;
use super::protocol::RoundResult;

/// Everything a round produced.
#[derive(Clone, Debug)]
pub struct RoundReport {
    pub round: u32,
    pub result: RoundResult,
    pub status: GameStatus,
    /// Presentation timeline for the round.
    pub events: EventLog,
}

/// Last conveyor move of an entity this round: direction and arrival cell.
type ConveyorMoves = FxHashMap<EntityId, (Direction, Position)>;

/// Drives the fixed per-round phase sequence.
pub struct PhaseScheduler;

impl PhaseScheduler {
    /// Run one full round.
    ///
    /// Fails without touching the state if the queue names an unknown
    /// robot.
    pub fn run_round(state: &mut GameState, queue: &ProgramQueue) -> Result<RoundReport> {
        if let Some(unknown) = queue.entities().find(|id| state.robot(*id).is_none()) {
            return Err(EngineError::UnknownEntity(unknown));
        }

        state.begin_round();
        let round = state.round();
        log::info!("round {} begins", round);

        for entity in queue.powered_down() {
            if state.robot(entity).is_some_and(|r| !r.is_destroyed()) {
                state.power_down(entity)?;
            }
        }

        Self::movement(state, queue);

        let mut carried = ConveyorMoves::default();
        Self::conveyors(state, Phase::ExpressConveyors, &mut carried);
        Self::conveyors(state, Phase::Conveyors, &mut carried);
        Self::conveyor_rotation(state, &carried);
        Self::gears(state);
        Self::lasers(state);
        Self::registration(state);
        Self::cleanup(state);

        let status = state.status();
        if status.is_over() {
            log::info!("game over after round {}: {:?}", round, status);
        }
        Ok(RoundReport {
            round,
            result: RoundResult::capture(state),
            status,
            events: state.take_events(),
        })
    }

    fn start(state: &mut GameState, phase: Phase) {
        log::debug!("round {}: {}", state.round(), phase);
        let round = state.round();
        state.record(EngineEvent::PhaseStarted { round, phase });
    }

    fn finish(state: &mut GameState) {
        let delay = state.config().phase_delay_ms;
        state.advance_clock(delay);
    }

    /// Robots still taking part in this round, in id order.
    fn active(state: &GameState) -> Vec<EntityId> {
        state
            .alive_ids()
            .into_iter()
            .filter(|id| !state.is_casualty(*id))
            .collect()
    }

    /// Pair each active robot with the first matching tile under it.
    fn tiles_under(state: &GameState, accept: impl Fn(&Tile) -> bool) -> Vec<(Tile, EntityId)> {
        Self::active(state)
            .into_iter()
            .filter_map(|id| {
                let position = state.robot(id)?.position();
                let tile = state
                    .board()
                    .tiles_at(position)
                    .into_iter()
                    .find(|t| !t.is_step_triggered() && accept(*t))?;
                Some((tile.clone(), id))
            })
            .collect()
    }

    // === Phases ===

    fn movement(state: &mut GameState, queue: &ProgramQueue) {
        for tier in queue.tiers() {
            Self::start(state, Phase::Movement);
            for (entity, card) in tier {
                if state.is_casualty(entity) {
                    log::debug!("{} dropped {}", entity, card);
                    continue;
                }
                execute_instruction(state, entity, card.movement);
            }
            Self::finish(state);
        }
    }

    fn conveyors(state: &mut GameState, phase: Phase, carried: &mut ConveyorMoves) {
        Self::start(state, phase);
        let express_only = phase == Phase::ExpressConveyors;
        let actions = Self::tiles_under(state, |t| t.is_conveyor() && (!express_only || t.is_express()));

        let outcomes = TileDispatcher::dispatch_batch(state, &actions);
        for ((tile, entity), (_, outcome)) in actions.iter().zip(outcomes) {
            let TileKind::Conveyor { direction, .. } = tile.kind() else {
                continue;
            };
            let arrived = tile.position().step(*direction);
            let on_board = state.robot(*entity).is_some_and(|r| r.is_alive() && r.position() == arrived);
            if outcome.is_applied() && on_board {
                carried.insert(*entity, (*direction, arrived));
            }
        }
        Self::finish(state);
    }

    fn conveyor_rotation(state: &mut GameState, carried: &ConveyorMoves) {
        Self::start(state, Phase::ConveyorRotation);
        let mut entities: Vec<EntityId> = carried.keys().copied().collect();
        entities.sort();

        for entity in entities {
            let Some(&(entered, arrived)) = carried.get(&entity) else {
                continue;
            };
            let Some(robot) = state.robot(entity) else {
                continue;
            };
            if !robot.is_alive() || state.is_casualty(entity) || robot.position() != arrived {
                continue;
            }
            if !robot.has(Capability::Directional) {
                continue;
            }
            let turn = state.board().tiles_at(arrived).into_iter().find_map(|t| match t.kind() {
                TileKind::Conveyor {
                    direction,
                    turn: Some(_),
                    ..
                } => Rotation::between(entered, *direction),
                _ => None,
            });
            if let Some(rotation) = turn {
                if state.turn(entity, rotation).is_ok() {
                    log::trace!("{} turned {:?} by conveyor at {}", entity, rotation, arrived);
                }
            }
        }
        Self::finish(state);
    }

    fn gears(state: &mut GameState) {
        Self::start(state, Phase::Gears);
        let actions = Self::tiles_under(state, |t| matches!(t.kind(), TileKind::Gear { .. }));
        TileDispatcher::dispatch_batch(state, &actions);
        Self::finish(state);
    }

    fn lasers(state: &mut GameState) {
        Self::start(state, Phase::Lasers);

        // every beam is traced against the same snapshot
        let lasers: Vec<Tile> = state
            .board()
            .all_tiles()
            .filter(|t| matches!(t.kind(), TileKind::Laser { .. }))
            .cloned()
            .collect();
        let mut hits: Vec<(Tile, EntityId)> = lasers
            .into_iter()
            .filter_map(|laser| {
                let target = Self::trace_beam(state, &laser)?;
                Some((laser, target))
            })
            .collect();
        hits.sort_by_key(|(_, entity)| *entity);

        for (laser, entity) in &hits {
            if state.is_casualty(*entity) {
                continue;
            }
            TileDispatcher::dispatch(state, laser, *entity);
        }
        Self::finish(state);
    }

    /// First collidable robot in the beam's path, starting at the emitter's
    /// own cell and stopping at walls and the board edge.
    fn trace_beam(state: &GameState, laser: &Tile) -> Option<EntityId> {
        let TileKind::Laser { direction, .. } = laser.kind() else {
            return None;
        };
        let board = state.board();
        let mut cell = laser.position();
        while board.contains(cell) {
            if let Some(robot) = state.robot_at(cell) {
                if robot.has(Capability::Collidable) {
                    return Some(robot.id());
                }
            }
            if board.wall_blocks(cell, *direction) {
                return None;
            }
            cell = cell.step(*direction);
        }
        None
    }

    fn registration(state: &mut GameState) {
        Self::start(state, Phase::Registration);
        for entity in Self::active(state) {
            let Some(position) = state.robot(entity).map(|r| r.position()) else {
                continue;
            };
            let tiles: Vec<Tile> = state
                .board()
                .tiles_at(position)
                .into_iter()
                .filter(|t| {
                    matches!(
                        t.kind(),
                        TileKind::Flag { .. } | TileKind::Wrench | TileKind::HammerAndWrench
                    )
                })
                .cloned()
                .collect();
            for tile in &tiles {
                TileDispatcher::dispatch(state, tile, entity);
            }
        }
        Self::finish(state);
    }

    fn cleanup(state: &mut GameState) {
        Self::start(state, Phase::Cleanup);
        for entity in state.place_pending_respawns() {
            log::warn!("{} has no free cell to respawn on", entity);
            state.record(EngineEvent::AwaitingRespawn { entity });
        }
        state.finish_power_downs();
        Self::finish(state);
    }
}
