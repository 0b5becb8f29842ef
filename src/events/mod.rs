//! Notifications for the presentation, audio and networking collaborators.
//!
//! - [`EventLog`]: the timestamped record of a round
//! - [`EventSink`] / [`SoundPlayer`]: read-only consumers
//! - [`ZoomInput`]: the one presentation input the engine validates

mod event;
mod input;
mod sink;

pub use event::{EngineEvent, EventLog, SoundCue, TimedEvent};
pub use input::ZoomInput;
pub use sink::{EventSink, SoundPlayer, SoundSink};
