//! Per-round program queue.
//!
//! Collects each robot's chosen cards for the round, validates them once,
//! and hands the scheduler one priority tier at a time.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::{EngineConfig, EngineError, EntityId, Result};
use crate::movement::ProgramCard;
use crate::round::SelectedCards;

/// One robot's program: its cards in register order.
pub type Program = SmallVec<[ProgramCard; 5]>;

/// All programs submitted for one round.
#[derive(Clone, Debug)]
pub struct ProgramQueue {
    max_cards: usize,
    programs: BTreeMap<EntityId, Program>,
    powered_down: BTreeSet<EntityId>,
    priorities: FxHashSet<u32>,
}

impl ProgramQueue {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_cards: config.max_program_cards,
            programs: BTreeMap::new(),
            powered_down: BTreeSet::new(),
            priorities: FxHashSet::default(),
        }
    }

    /// Submit a robot's program.
    ///
    /// Rejected without any change if the robot already has a program,
    /// has more cards than registers, or reuses a priority already taken
    /// this round.
    pub fn submit(&mut self, entity: EntityId, cards: impl IntoIterator<Item = ProgramCard>) -> Result<()> {
        let cards: Program = cards.into_iter().collect();
        if self.programs.contains_key(&entity) || self.powered_down.contains(&entity) {
            return Err(EngineError::program(entity, "program already submitted"));
        }
        if cards.len() > self.max_cards {
            return Err(EngineError::program(
                entity,
                format!("{} cards for {} registers", cards.len(), self.max_cards),
            ));
        }
        let mut seen = FxHashSet::default();
        for card in &cards {
            if self.priorities.contains(&card.priority) || !seen.insert(card.priority) {
                return Err(EngineError::program(
                    entity,
                    format!("priority {} is already in use", card.priority),
                ));
            }
        }

        self.priorities.extend(seen);
        self.programs.insert(entity, cards);
        Ok(())
    }

    /// Announce a power-down: the robot runs no program this round.
    pub fn power_down(&mut self, entity: EntityId) -> Result<()> {
        if self.programs.contains_key(&entity) {
            return Err(EngineError::program(entity, "program already submitted"));
        }
        self.powered_down.insert(entity);
        Ok(())
    }

    /// Submit a client's card selection.
    pub fn submit_selection(&mut self, entity: EntityId, selection: &SelectedCards) -> Result<()> {
        if selection.powered_down {
            self.power_down(entity)
        } else {
            self.submit(entity, selection.cards.iter().copied())
        }
    }

    pub fn program(&self, entity: EntityId) -> Option<&[ProgramCard]> {
        self.programs.get(&entity).map(|p| p.as_slice())
    }

    pub fn is_powered_down(&self, entity: EntityId) -> bool {
        self.powered_down.contains(&entity)
    }

    pub fn powered_down(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.powered_down.iter().copied()
    }

    /// Every robot with a program or a power-down, in id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        let mut all: Vec<EntityId> = self.programs.keys().chain(self.powered_down.iter()).copied().collect();
        all.sort();
        all.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() && self.powered_down.is_empty()
    }

    /// Number of register tiers: the longest program's length.
    pub fn tier_count(&self) -> usize {
        self.programs.values().map(|p| p.len()).max().unwrap_or(0)
    }

    /// Register `tier` of every program, in ascending priority.
    pub fn tier(&self, tier: usize) -> Vec<(EntityId, ProgramCard)> {
        let mut cards: Vec<(EntityId, ProgramCard)> = self
            .programs
            .iter()
            .filter_map(|(entity, program)| program.get(tier).map(|card| (*entity, *card)))
            .collect();
        cards.sort_by_key(|(_, card)| *card);
        cards
    }

    /// All tiers in register order.
    pub fn tiers(&self) -> impl Iterator<Item = Vec<(EntityId, ProgramCard)>> + '_ {
        (0..self.tier_count()).map(move |tier| self.tier(tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Movement;

    fn card(movement: Movement, priority: u32) -> ProgramCard {
        ProgramCard::new(movement, priority)
    }

    #[test]
    fn test_tiers_in_priority_order() {
        let mut queue = ProgramQueue::new(&EngineConfig::default());
        let a = EntityId::new(0);
        let b = EntityId::new(1);
        queue
            .submit(a, [card(Movement::Move1, 500), card(Movement::LeftTurn, 70)])
            .unwrap();
        queue
            .submit(b, [card(Movement::Move2, 300), card(Movement::UTurn, 10), card(Movement::Move3, 800)])
            .unwrap();

        let tiers: Vec<Vec<(EntityId, ProgramCard)>> = queue.tiers().collect();
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0], vec![(b, card(Movement::Move2, 300)), (a, card(Movement::Move1, 500))]);
        assert_eq!(tiers[1], vec![(b, card(Movement::UTurn, 10)), (a, card(Movement::LeftTurn, 70))]);
        assert_eq!(tiers[2], vec![(b, card(Movement::Move3, 800))]);
    }

    #[test]
    fn test_rejects_invalid_programs() {
        let mut queue = ProgramQueue::new(&EngineConfig::default());
        let a = EntityId::new(0);
        let b = EntityId::new(1);

        let six: Vec<ProgramCard> = (1..=6).map(|i| card(Movement::Move1, i * 10)).collect();
        assert!(matches!(queue.submit(a, six), Err(EngineError::InvalidProgram { .. })));

        let repeated = [card(Movement::Move1, 10), card(Movement::Move2, 10)];
        assert!(queue.submit(a, repeated).is_err());

        queue.submit(a, [card(Movement::Move1, 10)]).unwrap();
        assert!(queue.submit(b, [card(Movement::Move2, 10)]).is_err());
        assert!(queue.submit(a, [card(Movement::Move2, 20)]).is_err());

        // failed submissions left nothing behind
        assert!(queue.program(b).is_none());
        queue.submit(b, [card(Movement::Move2, 20)]).unwrap();
    }

    #[test]
    fn test_power_down_selection() {
        let mut queue = ProgramQueue::new(&EngineConfig::default());
        let a = EntityId::new(3);
        let selection = SelectedCards {
            powered_down: true,
            cards: vec![card(Movement::Move1, 500)],
        };
        queue.submit_selection(a, &selection).unwrap();

        assert!(queue.is_powered_down(a));
        assert!(queue.program(a).is_none());
        assert_eq!(queue.tier_count(), 0);
        assert_eq!(queue.entities().collect::<Vec<_>>(), vec![a]);
    }
}
