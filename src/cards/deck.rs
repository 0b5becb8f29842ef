//! The program deck.
//!
//! 84 cards with unique priorities:
//!
//! | movement   | count | priorities         |
//! |------------|-------|--------------------|
//! | U-turn     | 6     | 10, 20, … 60       |
//! | left turn  | 18    | 70, 90, … 410      |
//! | right turn | 18    | 80, 100, … 420     |
//! | back up    | 6     | 430, 440, … 480    |
//! | move 1     | 18    | 490, 500, … 660    |
//! | move 2     | 12    | 670, 680, … 780    |
//! | move 3     | 6     | 790, 800, … 840    |

use crate::core::{EngineConfig, GameRng};
use crate::movement::{Movement, ProgramCard};
use crate::robots::Robot;

/// A shuffled draw pile plus a discard pile.
#[derive(Clone, Debug)]
pub struct ProgramDeck {
    draw: Vec<ProgramCard>,
    discard: Vec<ProgramCard>,
}

impl ProgramDeck {
    pub const SIZE: usize = 84;

    /// The standard deck, unshuffled, in ascending priority.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        let mut run = |movement: Movement, count: u32, first: u32, stride: u32| {
            cards.extend((0..count).map(|i| ProgramCard::new(movement, first + i * stride)));
        };
        run(Movement::UTurn, 6, 10, 10);
        run(Movement::LeftTurn, 18, 70, 20);
        run(Movement::RightTurn, 18, 80, 20);
        run(Movement::BackUp, 6, 430, 10);
        run(Movement::Move1, 18, 490, 10);
        run(Movement::Move2, 12, 670, 10);
        run(Movement::Move3, 6, 790, 10);
        cards.sort();
        Self {
            draw: cards,
            discard: Vec::new(),
        }
    }

    /// The standard deck shuffled with `rng`.
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    /// Return the discard pile to the draw pile and shuffle.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn discarded(&self) -> usize {
        self.discard.len()
    }

    /// Draw up to `count` cards, reshuffling the discard pile if the draw
    /// pile runs out.
    pub fn deal(&mut self, count: usize, rng: &mut GameRng) -> Vec<ProgramCard> {
        if self.draw.len() < count && !self.discard.is_empty() {
            self.shuffle(rng);
        }
        let take = count.min(self.draw.len());
        self.draw.split_off(self.draw.len() - take)
    }

    /// Deal a robot's hand: one card fewer than its current health.
    pub fn deal_hand(&mut self, robot: &Robot, config: &EngineConfig, rng: &mut GameRng) -> Vec<ProgramCard> {
        self.deal(config.hand_size(robot.health()), rng)
    }

    pub fn discard(&mut self, cards: impl IntoIterator<Item = ProgramCard>) {
        self.discard.extend(cards);
    }
}

impl Default for ProgramDeck {
    fn default() -> Self {
        Self::standard()
    }
}
