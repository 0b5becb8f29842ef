//! Collaborator boundaries.
//!
//! Selected cards come in as `SELECTED_CARDS` lines, results go out as
//! `ROUND_RESULT` lines, and the presentation timeline is replayed into
//! sinks that can fail without affecting the engine.

use robo_engine::{
    Board, Direction, EngineConfig, EngineError, EngineEvent, EntityId, GameRng, GameState, GameStatus,
    Movement, Phase, PhaseScheduler, Position, ProgramCard, ProgramDeck, ProgramQueue, RobotSpec, RobotStatus,
    RoundResult, SelectedCards, SoundCue, SoundPlayer, SoundSink, Tile, TimedEvent, ZoomInput, BOARD_LAYER,
};

fn two_robot_game() -> (GameState, EntityId, EntityId) {
    let board = Board::new(8, 8)
        .unwrap()
        .with_tile(BOARD_LAYER, Tile::conveyor(Position::new(6, 1), Direction::North, false))
        .unwrap();
    let mut state = GameState::new(EngineConfig::default(), board).unwrap();
    let a = state
        .add_robot(RobotSpec::player("Squash Bot", Position::new(1, 1), Direction::East))
        .unwrap();
    let b = state
        .add_robot(RobotSpec::player("Zoom Bot", Position::new(6, 1), Direction::West))
        .unwrap();
    (state, a, b)
}

/// A client line drives a round whose result line reflects the new state.
#[test]
fn test_selected_cards_to_round_result() {
    let (mut state, a, b) = two_robot_game();
    let line = r#"SELECTED_CARDS:{"poweredDown":false,"cards":[{"action":"MOVE_2","priority":700},{"action":"RIGHT_TURN","priority":80}]}"#;
    let selection = SelectedCards::from_message(line).unwrap();
    assert_eq!(selection.cards[0], ProgramCard::new(Movement::Move2, 700));

    let mut queue = ProgramQueue::new(state.config());
    queue.submit_selection(a, &selection).unwrap();
    let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();

    let message = report.result.to_message().unwrap();
    let parsed = RoundResult::from_message(&message).unwrap();
    assert_eq!(parsed, report.result);
    assert_eq!(parsed.round, 1);
    assert_eq!(parsed.status, GameStatus::InProgress);

    let first = parsed.get(a).unwrap();
    assert_eq!((first.x, first.y, first.direction), (3, 1, Direction::South));
    let second = parsed.get(b).unwrap();
    assert_eq!((second.x, second.y), (6, 2));
    assert_eq!(second.status, RobotStatus::Alive);
}

/// A power-down selection runs no program and repairs at the end of the round.
#[test]
fn test_power_down_selection() {
    let (mut state, a, _) = two_robot_game();
    state.damage(a, 4).unwrap();

    let selection = SelectedCards::from_message(r#"SELECTED_CARDS:{"poweredDown":true}"#).unwrap();
    assert_eq!(selection, SelectedCards::power_down());

    let mut queue = ProgramQueue::new(state.config());
    queue.submit_selection(a, &selection).unwrap();
    let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();

    assert_eq!(report.result.get(a).unwrap().health, 10);
    assert!(report.events.for_entity(a).any(|e| matches!(e, EngineEvent::PoweredDown { .. })));
    assert!(!state.robot(a).unwrap().is_powered_down());
}

/// Malformed lines and invalid programs are rejected at the boundary.
#[test]
fn test_rejects_bad_input() {
    assert!(matches!(
        SelectedCards::from_message(r#"ROUND_RESULT:{"cards":[]}"#),
        Err(EngineError::Message(_))
    ));
    assert!(matches!(SelectedCards::from_message("no tag here"), Err(EngineError::Message(_))));
    assert!(matches!(
        SelectedCards::from_message(r#"SELECTED_CARDS:{"cards":[{"action":"JUMP","priority":1}]}"#),
        Err(EngineError::Message(_))
    ));

    let (state, a, _) = two_robot_game();
    let mut queue = ProgramQueue::new(state.config());
    let six = SelectedCards::new((0..6).map(|i| ProgramCard::new(Movement::Move1, 490 + i * 10)));
    assert!(matches!(
        queue.submit_selection(a, &six),
        Err(EngineError::InvalidProgram { .. })
    ));

    assert_eq!(ZoomInput::new(0).unwrap_err(), EngineError::ZeroZoom);
    assert!(ZoomInput::new(-3).unwrap().step() == -1);
}

/// Round results survive a compact binary snapshot.
#[test]
fn test_binary_snapshot() {
    let (mut state, a, _) = two_robot_game();
    let mut queue = ProgramQueue::new(state.config());
    queue.submit(a, [ProgramCard::new(Movement::UTurn, 10)]).unwrap();
    let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();

    let bytes = report.result.to_bytes().unwrap();
    assert_eq!(RoundResult::from_bytes(&bytes).unwrap(), report.result);
}

struct Speaker {
    played: Vec<SoundCue>,
    broken: bool,
}

impl SoundPlayer for Speaker {
    type Error = String;

    fn play(&mut self, cue: SoundCue) -> Result<(), Self::Error> {
        if self.broken {
            return Err("no audio device".to_string());
        }
        self.played.push(cue);
        Ok(())
    }
}

/// Replayed sounds match the log; a broken player is counted, not fatal.
#[test]
fn test_sound_sink_replay() {
    let (mut state, a, _) = two_robot_game();
    let mut queue = ProgramQueue::new(state.config());
    queue.submit(a, [ProgramCard::new(Movement::Move2, 700)]).unwrap();
    let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();

    let expected: Vec<SoundCue> = report.events.sounds().collect();
    assert!(expected.contains(&SoundCue::RobotMoving));
    assert!(expected.contains(&SoundCue::Conveyor));

    let mut sink = SoundSink::new(Speaker {
        played: Vec::new(),
        broken: false,
    });
    report.events.replay(&mut sink);
    assert_eq!(sink.failures(), 0);
    assert_eq!(sink.into_inner().played, expected);

    let mut broken = SoundSink::new(Speaker {
        played: Vec::new(),
        broken: true,
    });
    report.events.replay(&mut broken);
    assert_eq!(broken.failures(), expected.len());
}

/// The timeline is ordered by phase with non-decreasing timestamps.
#[test]
fn test_timeline_order() {
    let (mut state, a, _) = two_robot_game();
    let mut queue = ProgramQueue::new(state.config());
    queue.submit(a, [ProgramCard::new(Movement::Move1, 500)]).unwrap();
    let report = PhaseScheduler::run_round(&mut state, &queue).unwrap();

    let mut seen = Vec::new();
    let mut last_ms = 0;
    report.events.replay(&mut |event: &TimedEvent| {
        assert!(event.at_ms >= last_ms);
        last_ms = event.at_ms;
        if let EngineEvent::PhaseStarted { phase, .. } = event.event {
            seen.push(phase);
        }
    });

    assert_eq!(
        seen,
        vec![
            Phase::Movement,
            Phase::ExpressConveyors,
            Phase::Conveyors,
            Phase::ConveyorRotation,
            Phase::Gears,
            Phase::Lasers,
            Phase::Registration,
            Phase::Cleanup,
        ]
    );
}

/// Identical seeds deal identical rounds.
#[test]
fn test_seeded_rounds_are_reproducible() {
    fn play(seed: u64) -> Vec<RoundResult> {
        let mut state = GameState::with_players(EngineConfig::default(), Board::new(12, 12).unwrap(), 4).unwrap();
        let mut rng = GameRng::new(seed);
        let mut results = Vec::new();
        for _ in 0..3 {
            let mut deck = ProgramDeck::shuffled(&mut rng);
            let mut queue = ProgramQueue::new(state.config());
            let ids: Vec<EntityId> = state.alive_ids();
            for id in ids {
                queue.submit(id, deck.deal(5, &mut rng)).unwrap();
            }
            results.push(PhaseScheduler::run_round(&mut state, &queue).unwrap().result);
        }
        results
    }

    assert_eq!(play(7), play(7));
}
