//! Round resolution: the phase order, the scheduler that drives it and the
//! flat records handed to the networking collaborator.

mod phase;
mod protocol;
mod scheduler;

pub use phase::Phase;
pub use protocol::{RobotRecord, RoundResult, SelectedCards, ROUND_RESULT_TAG, SELECTED_CARDS_TAG};
pub use scheduler::{PhaseScheduler, RoundReport};
