//! Movement: instructions, conflict resolution and unit-step execution.

mod instruction;
mod resolver;
mod step;

pub use instruction::{Motion, Movement, ProgramCard};
pub use resolver::{ConflictResolver, Proposal, Rejection, Resolution};
pub use step::{execute_instruction, resolve_batch, StepOutcome};
