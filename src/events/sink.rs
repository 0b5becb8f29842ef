//! Presentation and audio collaborators.
//!
//! Sinks only observe. A failing sink is logged and ignored; it can never
//! change what the engine computed.

use super::{EngineEvent, EventLog, SoundCue, TimedEvent};

/// Consumer of the presentation timeline.
pub trait EventSink {
    fn notify(&mut self, event: &TimedEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&TimedEvent),
{
    fn notify(&mut self, event: &TimedEvent) {
        self(event)
    }
}

/// Fire-and-forget audio backend.
pub trait SoundPlayer {
    type Error: std::fmt::Display;

    fn play(&mut self, cue: SoundCue) -> Result<(), Self::Error>;
}

/// Routes [`EngineEvent::Sound`] events to a [`SoundPlayer`].
pub struct SoundSink<P> {
    player: P,
    failures: usize,
}

impl<P: SoundPlayer> SoundSink<P> {
    pub fn new(player: P) -> Self {
        Self { player, failures: 0 }
    }

    /// Number of cues the player failed to play.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn into_inner(self) -> P {
        self.player
    }
}

impl<P: SoundPlayer> EventSink for SoundSink<P> {
    fn notify(&mut self, event: &TimedEvent) {
        if let EngineEvent::Sound { cue } = event.event {
            if let Err(err) = self.player.play(cue) {
                self.failures += 1;
                log::warn!("failed to play {:?}: {}", cue, err);
            }
        }
    }
}

impl EventLog {
    /// Play the whole timeline back into a sink, in order.
    pub fn replay(&self, sink: &mut impl EventSink) {
        for event in self.events() {
            sink.notify(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;

    struct BrokenSpeaker;

    impl SoundPlayer for BrokenSpeaker {
        type Error = String;

        fn play(&mut self, _cue: SoundCue) -> Result<(), String> {
            Err("no audio device".into())
        }
    }

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.record(EngineEvent::Sound { cue: SoundCue::Laser });
        log.record(EngineEvent::Damaged {
            entity: EntityId::new(0),
            amount: 2,
            health: 8,
        });
        log.record(EngineEvent::Sound { cue: SoundCue::Flag });
        log
    }

    #[test]
    fn test_closure_sink() {
        let log = sample_log();
        let mut seen = Vec::new();
        log.replay(&mut |e: &TimedEvent| seen.push(e.event.clone()));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_sound_failures_are_contained() {
        let log = sample_log();
        let mut sink = SoundSink::new(BrokenSpeaker);
        log.replay(&mut sink);
        assert_eq!(sink.failures(), 2);
        // the log itself is untouched
        assert_eq!(log.len(), 3);
    }
}
