//! Simulation context.
//!
//! [`GameState`] is the one object every phase and tile action receives.
//! It owns the board, the robot table and the round's event log, and is
//! the only place that keeps the board's occupancy index and the robots'
//! position fields in sync.
//!
//! Every public mutator validates its input before touching anything, so
//! a rejected call leaves the state exactly as it was.

use im::OrdMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::direction::{Direction, Rotation};
use super::entity::EntityId;
use super::error::{EngineError, Result};
use super::position::Position;
use crate::board::Board;
use crate::events::{EngineEvent, EventLog};
use crate::robots::{LifeChange, Robot, RobotSpec, RobotStatus};

/// Whether the game has been decided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    /// These robots hold every flag on the board.
    Won(Vec<EntityId>),
    /// Every other robot has been destroyed.
    LastStanding(EntityId),
    AllDestroyed,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Board, robots and round bookkeeping.
///
/// Uses an `im::OrdMap` for robots so snapshots are cheap and iteration is
/// always in entity-id order.
#[derive(Clone, Debug)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    robots: OrdMap<EntityId, Robot>,
    next_id: EntityId,

    // === Round bookkeeping ===
    round: u32,
    events: EventLog,
    /// Robots that lost a life this round; their remaining instructions are dropped.
    casualties: FxHashSet<EntityId>,
}

impl GameState {
    pub fn new(config: EngineConfig, board: Board) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            board,
            robots: OrdMap::new(),
            next_id: EntityId::new(0),
            round: 0,
            events: EventLog::new(),
            casualties: FxHashSet::default(),
        })
    }

    /// Create a game with `count` player robots placed on the spawn docks.
    ///
    /// Docks are used in ascending dock number. A map without docks places
    /// robots along the bottom row, facing north.
    pub fn with_players(config: EngineConfig, board: Board, count: usize) -> Result<Self> {
        config.check_player_count(count)?;
        let mut state = Self::new(config, board)?;

        let spawns = state.board.spawns();
        if !spawns.is_empty() && spawns.len() < count {
            return Err(EngineError::InvalidPlayerCount {
                count,
                min: state.config.min_players,
                max: spawns.len(),
            });
        }

        for index in 0..count {
            let (dock, position) = match spawns.get(index) {
                Some(&(dock, position)) => (dock, position),
                None => (index as u32 + 1, Position::new(index as i32, 0)),
            };
            let spec = RobotSpec::player(format!("Robot {}", index + 1), position, Direction::North).with_dock(dock);
            state.add_robot(spec)?;
        }
        log::info!("created game with {} robots", count);
        Ok(state)
    }

    /// Place a new robot. Its backup point starts at its placement cell.
    pub fn add_robot(&mut self, spec: RobotSpec) -> Result<EntityId> {
        let id = self.next_id;
        self.board.place(id, spec.position)?;
        self.next_id = id.next();
        log::debug!("{} \"{}\" placed at {}", id, spec.name, spec.position);
        self.robots.insert(id, Robot::new(id, spec, &self.config));
        Ok(id)
    }

    // === Queries ===

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn robot(&self, id: EntityId) -> Option<&Robot> {
        self.robots.get(&id)
    }

    /// All robots in entity-id order, including destroyed ones.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.values()
    }

    /// Ids of robots currently on the board, in entity-id order.
    pub fn alive_ids(&self) -> Vec<EntityId> {
        self.robots.values().filter(|r| r.is_alive()).map(Robot::id).collect()
    }

    pub fn robot_at(&self, position: Position) -> Option<&Robot> {
        self.board.entity_at(position).and_then(|id| self.robot(id))
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take the event log, leaving an empty one behind.
    pub fn take_events(&mut self) -> EventLog {
        std::mem::take(&mut self.events)
    }

    /// True if `id` lost a life during the current round.
    pub fn is_casualty(&self, id: EntityId) -> bool {
        self.casualties.contains(&id)
    }

    pub fn status(&self) -> GameStatus {
        let flags = self.board.flag_count();
        if flags > 0 {
            let winners: Vec<EntityId> = self
                .robots
                .values()
                .filter(|r| !r.is_destroyed() && r.flags() >= flags)
                .map(Robot::id)
                .collect();
            if !winners.is_empty() {
                return GameStatus::Won(winners);
            }
        }

        let mut active = self.robots.values().filter(|r| !r.is_destroyed());
        match (active.next(), active.next()) {
            (None, _) if !self.robots.is_empty() => GameStatus::AllDestroyed,
            (Some(last), None) if self.robots.len() > 1 => GameStatus::LastStanding(last.id()),
            _ => GameStatus::InProgress,
        }
    }

    // === Validated mutators ===

    /// Deal damage. A robot reaching zero health loses a life.
    pub fn damage(&mut self, id: EntityId, amount: i32) -> Result<LifeChange> {
        if amount <= 0 {
            return Err(EngineError::NonPositiveAmount { action: "damage", amount });
        }
        self.alive(id)?;

        let config = self.config.clone();
        let robot = self.robot_mut(id)?;
        let change = robot.take_damage(amount, &config)?;
        let health = robot.health();
        self.events.record(EngineEvent::Damaged { entity: id, amount, health });
        log::debug!("{} takes {} damage ({} health left)", id, amount, health);

        if change != LifeChange::Damaged {
            self.after_life_lost(id, change)?;
        }
        Ok(change)
    }

    /// Restore health, clamped to the configured maximum.
    pub fn heal(&mut self, id: EntityId, amount: i32) -> Result<()> {
        if amount <= 0 {
            return Err(EngineError::NonPositiveAmount { action: "heal", amount });
        }
        let config = self.config.clone();
        let robot = self.robot_mut(id)?;
        robot.heal(amount, &config)?;
        let health = robot.health();
        self.events.record(EngineEvent::Healed { entity: id, amount, health });
        Ok(())
    }

    /// Take one life regardless of health (pits, falling off the board).
    pub fn kill(&mut self, id: EntityId) -> Result<LifeChange> {
        self.alive(id)?;
        let config = self.config.clone();
        let change = self.robot_mut(id)?.lose_life(&config);
        self.after_life_lost(id, change)?;
        Ok(change)
    }

    /// Change the respawn point. The cell must be on the board.
    pub fn set_backup(&mut self, id: EntityId, position: Position) -> Result<()> {
        if !self.board.contains(position) {
            return Err(EngineError::OffBoard { position });
        }
        self.robot_mut(id)?.backup = position;
        self.events.record(EngineEvent::BackupUpdated { entity: id, position });
        Ok(())
    }

    /// Move a robot straight to a free cell.
    pub fn teleport(&mut self, id: EntityId, position: Position) -> Result<()> {
        if !self.board.contains(position) {
            return Err(EngineError::OffBoard { position });
        }
        let from = self.alive(id)?.position();
        if let Some(occupant) = self.board.entity_at(position) {
            if occupant != id {
                return Err(EngineError::Occupied { position, occupant });
            }
            return Ok(());
        }

        self.board.vacate(from);
        self.board.place(id, position)?;
        self.robot_mut(id)?.position = position;
        self.events.record(EngineEvent::Moved { entity: id, from, to: position });
        Ok(())
    }

    pub fn set_direction(&mut self, id: EntityId, direction: Direction) -> Result<()> {
        let robot = self.robot_mut(id)?;
        let from = robot.direction;
        if from != direction {
            robot.direction = direction;
            self.events.record(EngineEvent::Turned { entity: id, from, to: direction });
        }
        Ok(())
    }

    pub fn turn(&mut self, id: EntityId, rotation: Rotation) -> Result<()> {
        let direction = self.robot(id).ok_or(EngineError::UnknownEntity(id))?.direction();
        self.set_direction(id, rotation.apply(direction))
    }

    /// Announce a power-down for the current round.
    pub fn power_down(&mut self, id: EntityId) -> Result<()> {
        let robot = self.robot_mut(id)?;
        if !robot.powered_down {
            robot.powered_down = true;
            self.events.record(EngineEvent::PoweredDown { entity: id });
        }
        Ok(())
    }

    /// Append an event to the round log.
    pub fn record(&mut self, event: EngineEvent) {
        self.events.record(event);
    }

    // === Engine internals ===

    /// Register flag `number` if it is the robot's next one. Registering a
    /// flag also moves the backup point onto it.
    pub(crate) fn register_flag(&mut self, id: EntityId, number: u32) -> Result<bool> {
        let robot = self.alive(id)?;
        if !robot.can_get_flag(number) {
            log::trace!("{} skips flag {} (has {})", id, number, robot.flags());
            return Ok(false);
        }
        let position = robot.position();
        self.robot_mut(id)?.register_flag();
        self.events.record(EngineEvent::FlagRegistered { entity: id, number });
        log::info!("{} registered flag {}", id, number);
        self.set_backup(id, position)?;
        Ok(true)
    }

    /// Commit a batch of arbitrated unit steps.
    pub(crate) fn apply_moves(&mut self, moves: &[(EntityId, Position, Position)]) {
        self.board.apply_moves(moves);
        for &(id, from, to) in moves {
            if let Some(robot) = self.robots.get_mut(&id) {
                robot.position = to;
            }
            self.events.record(EngineEvent::Moved { entity: id, from, to });
        }
    }

    /// Take a robot's cell out of the occupancy index while it drops off
    /// the board, so a robot following it can move in during the same step.
    pub(crate) fn lift_off(&mut self, id: EntityId) {
        let Some(position) = self.robot(id).map(Robot::position) else {
            return;
        };
        if self.board.entity_at(position) == Some(id) {
            self.board.vacate(position);
        }
    }

    pub(crate) fn begin_round(&mut self) {
        self.round += 1;
        self.casualties.clear();
        self.events = EventLog::new();
    }

    pub(crate) fn advance_clock(&mut self, delay_ms: u64) {
        self.events.advance(delay_ms);
    }

    /// Place robots still waiting to respawn on their backup cell or the
    /// first free neighbour (north, east, south, west). Returns those that
    /// are still waiting.
    pub(crate) fn place_pending_respawns(&mut self) -> Vec<EntityId> {
        let waiting: Vec<EntityId> = self
            .robots
            .values()
            .filter(|r| r.status() == RobotStatus::Respawning)
            .map(Robot::id)
            .collect();

        let mut stuck = Vec::new();
        for id in waiting {
            let Some(backup) = self.robot(id).map(Robot::backup) else {
                continue;
            };
            let candidate = std::iter::once(backup)
                .chain(Direction::ALL.iter().map(|d| backup.step(*d)))
                .find(|p| self.board.contains(*p) && self.board.entity_at(*p).is_none());
            match candidate {
                Some(position) => self.respawn_at(id, position),
                None => stuck.push(id),
            }
        }
        stuck
    }

    /// Repair powered-down robots to full health and clear the flag.
    pub(crate) fn finish_power_downs(&mut self) {
        let max_health = self.config.max_health;
        let ids: Vec<EntityId> = self.robots.values().filter(|r| r.powered_down).map(Robot::id).collect();
        for id in ids {
            if let Some(robot) = self.robots.get_mut(&id) {
                robot.powered_down = false;
                if robot.is_destroyed() {
                    continue;
                }
                robot.health = max_health;
                self.events.record(EngineEvent::Repaired {
                    entity: id,
                    health: max_health,
                });
            }
        }
    }

    fn robot_mut(&mut self, id: EntityId) -> Result<&mut Robot> {
        self.robots.get_mut(&id).ok_or(EngineError::UnknownEntity(id))
    }

    fn alive(&self, id: EntityId) -> Result<&Robot> {
        let robot = self.robot(id).ok_or(EngineError::UnknownEntity(id))?;
        if !robot.is_alive() {
            return Err(EngineError::NotOnBoard(id));
        }
        Ok(robot)
    }

    fn after_life_lost(&mut self, id: EntityId, change: LifeChange) -> Result<()> {
        let robot = self.robot(id).ok_or(EngineError::UnknownEntity(id))?;
        let (position, backup, lives) = (robot.position(), robot.backup(), robot.lives());

        if self.board.entity_at(position) == Some(id) {
            self.board.vacate(position);
        }
        self.casualties.insert(id);
        self.events.record(EngineEvent::LifeLost { entity: id, lives });

        if change == LifeChange::Destroyed {
            log::info!("{} destroyed", id);
            self.events.record(EngineEvent::Destroyed { entity: id });
            return Ok(());
        }

        log::debug!("{} lost a life ({} left)", id, lives);
        if self.board.entity_at(backup).is_none() {
            self.respawn_at(id, backup);
        } else {
            self.events.record(EngineEvent::AwaitingRespawn { entity: id });
        }
        Ok(())
    }

    fn respawn_at(&mut self, id: EntityId, position: Position) {
        if self.board.place(id, position).is_err() {
            return;
        }
        if let Some(robot) = self.robots.get_mut(&id) {
            robot.position = position;
            robot.status = RobotStatus::Alive;
        }
        self.events.record(EngineEvent::Respawned { entity: id, position });
        log::debug!("{} respawned at {}", id, position);
    }
}
