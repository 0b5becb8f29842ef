//! Program cards: the standard deck and the per-round program queue.

mod deck;
mod queue;

pub use deck::ProgramDeck;
pub use queue::{Program, ProgramQueue};
