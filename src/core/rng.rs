//! Seeded randomness for dealing program cards.
//!
//! Round resolution never draws random numbers. Only the deck does, and
//! each round deals from its own stream derived from the game seed, so a
//! replay of round `n` does not depend on how many cards earlier rounds
//! drew.
//!
//! ```
//! use robo_engine::core::GameRng;
//!
//! let game = GameRng::new(42);
//! let mut first: Vec<u32> = (0..10).collect();
//! let mut again = first.clone();
//! game.round_stream(3).shuffle(&mut first);
//! game.round_stream(3).shuffle(&mut again);
//! assert_eq!(first, again);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Mixes the round number into the game seed.
const ROUND_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// ChaCha8 stream seeded once per game.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Independent stream for dealing round `round`.
    #[must_use]
    pub fn round_stream(&self, round: u32) -> Self {
        Self::new(self.seed ^ u64::from(round).wrapping_mul(ROUND_MIX))
    }

    pub fn shuffle<T>(&mut self, cards: &mut [T]) {
        cards.shuffle(&mut self.inner);
    }
}
