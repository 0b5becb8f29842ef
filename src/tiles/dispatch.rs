//! Capability-checked tile actions.
//!
//! A tile turns into a [`TileEffect`]; the [`TileDispatcher`] applies it to
//! an entity only after [`Tile::can_act`] passes for that entity's
//! capabilities. Failing the check is a normal outcome (`Skipped`), never
//! an error.

use crate::core::{Direction, EngineConfig, EntityId, GameState, Position, Rotation};
use crate::events::EngineEvent;
use crate::movement::{resolve_batch, StepOutcome};

use super::{Tile, TileKind};

/// What a tile does to an eligible entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileEffect {
    /// Move one cell, arbitrated with every other push of the same instant.
    Push(Direction),
    Rotate(Rotation),
    Damage(i32),
    Destroy,
    SetBackup(Position),
    RegisterFlag(u32),
}

/// Result of dispatching a tile action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The effect changed the entity.
    Applied,
    /// The effect was attempted but lost to occupancy or a wall.
    Blocked,
    /// The entity is not eligible or the effect would not change anything.
    Skipped,
}

impl ActionOutcome {
    pub fn is_applied(self) -> bool {
        self == ActionOutcome::Applied
    }
}

impl Tile {
    /// The effect this tile applies, or `None` for passive tiles.
    pub fn effect(&self, config: &EngineConfig) -> Option<TileEffect> {
        match self.kind() {
            TileKind::Conveyor { direction, .. } => Some(TileEffect::Push(*direction)),
            TileKind::Gear { rotation } => Some(TileEffect::Rotate(*rotation)),
            TileKind::Laser { beams, .. } => {
                let beams = i32::try_from(*beams).unwrap_or(i32::MAX);
                Some(TileEffect::Damage(beams.saturating_mul(config.laser_damage_per_beam)))
            }
            TileKind::Hole => Some(TileEffect::Destroy),
            TileKind::Flag { number } => Some(TileEffect::RegisterFlag(*number)),
            TileKind::Wrench | TileKind::HammerAndWrench => Some(TileEffect::SetBackup(self.position())),
            TileKind::Wall { .. } | TileKind::Spawn { .. } => None,
        }
    }
}

/// Applies tile effects to entities.
pub struct TileDispatcher;

impl TileDispatcher {
    /// Dispatch one tile action onto one entity.
    pub fn dispatch(state: &mut GameState, tile: &Tile, entity: EntityId) -> ActionOutcome {
        match Self::eligible_effect(state, tile, entity) {
            Some(TileEffect::Push(direction)) => {
                let outcomes = resolve_batch(state, &[(entity, direction)]);
                let outcome = Self::push_outcome(outcomes.first().map(|(_, o)| *o));
                Self::finish(state, tile, outcome)
            }
            Some(effect) => {
                let outcome = Self::apply(state, entity, effect);
                Self::finish(state, tile, outcome)
            }
            None => ActionOutcome::Skipped,
        }
    }

    /// Dispatch a batch of actions that happen in the same instant.
    ///
    /// Non-movement effects are applied in batch order. All pushes are then
    /// resolved together through the conflict resolver, so their outcome
    /// does not depend on batch order. Results come back in batch order.
    pub fn dispatch_batch(state: &mut GameState, actions: &[(Tile, EntityId)]) -> Vec<(EntityId, ActionOutcome)> {
        let mut results: Vec<(EntityId, ActionOutcome)> =
            actions.iter().map(|(_, entity)| (*entity, ActionOutcome::Skipped)).collect();
        let mut pushes: Vec<(usize, EntityId, Direction)> = Vec::new();

        for (index, (tile, entity)) in actions.iter().enumerate() {
            match Self::eligible_effect(state, tile, *entity) {
                Some(TileEffect::Push(direction)) => pushes.push((index, *entity, direction)),
                Some(effect) => {
                    let outcome = Self::apply(state, *entity, effect);
                    results[index].1 = Self::finish(state, tile, outcome);
                }
                None => {}
            }
        }

        if !pushes.is_empty() {
            let moves: Vec<(EntityId, Direction)> = pushes.iter().map(|(_, e, d)| (*e, *d)).collect();
            let outcomes = resolve_batch(state, &moves);
            for (index, entity, _) in pushes {
                let step = outcomes.iter().find(|(e, _)| *e == entity).map(|(_, o)| *o);
                let outcome = Self::push_outcome(step);
                results[index].1 = Self::finish(state, &actions[index].0, outcome);
            }
        }

        results
    }

    /// The effect `tile` would apply to `entity`, if the entity is on the
    /// board and has every required capability.
    pub fn eligible_effect(state: &GameState, tile: &Tile, entity: EntityId) -> Option<TileEffect> {
        let robot = state.robot(entity)?;
        if !robot.is_alive() || !tile.can_act(robot.capabilities()) {
            return None;
        }
        tile.effect(state.config())
    }

    /// Apply a non-movement effect without a capability check.
    pub fn apply(state: &mut GameState, entity: EntityId, effect: TileEffect) -> ActionOutcome {
        let result = match effect {
            TileEffect::Push(direction) => {
                let outcomes = resolve_batch(state, &[(entity, direction)]);
                return Self::push_outcome(outcomes.first().map(|(_, o)| *o));
            }
            TileEffect::Rotate(rotation) => state.turn(entity, rotation).map(|_| true),
            TileEffect::Damage(amount) => state.damage(entity, amount).map(|_| true),
            TileEffect::Destroy => state.kill(entity).map(|_| true),
            TileEffect::SetBackup(position) => {
                if state.robot(entity).map(|r| r.backup()) == Some(position) {
                    Ok(false)
                } else {
                    state.set_backup(entity, position).map(|_| true)
                }
            }
            TileEffect::RegisterFlag(number) => state.register_flag(entity, number),
        };

        match result {
            Ok(true) => ActionOutcome::Applied,
            Ok(false) => ActionOutcome::Skipped,
            Err(err) => {
                log::warn!("{:?} on {} rejected: {}", effect, entity, err);
                ActionOutcome::Skipped
            }
        }
    }

    fn push_outcome(step: Option<StepOutcome>) -> ActionOutcome {
        match step {
            Some(StepOutcome::Moved { .. }) | Some(StepOutcome::FellOff) => ActionOutcome::Applied,
            Some(StepOutcome::Blocked { .. }) | Some(StepOutcome::Walled) => ActionOutcome::Blocked,
            Some(StepOutcome::Skipped) | None => ActionOutcome::Skipped,
        }
    }

    fn finish(state: &mut GameState, tile: &Tile, outcome: ActionOutcome) -> ActionOutcome {
        if outcome.is_applied() {
            if let Some(cue) = tile.action_sound() {
                state.record(EngineEvent::Sound { cue });
            }
        }
        outcome
    }
}
