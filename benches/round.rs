use criterion::{black_box, criterion_group, criterion_main, Criterion};

use robo_engine::{
    Board, Direction, EngineConfig, GameRng, GameState, PhaseScheduler, Position, ProgramDeck, ProgramQueue,
    Rotation, Tile, BOARD_LAYER,
};

/// A 12x12 board with a conveyor loop, gears and a laser row.
fn factory_floor() -> Board {
    let mut board = Board::new(12, 12).expect("board");
    for x in 2..10 {
        board = board
            .with_tile(BOARD_LAYER, Tile::conveyor(Position::new(x, 2), Direction::East, x % 2 == 0))
            .expect("conveyor");
    }
    board = board
        .with_tile(BOARD_LAYER, Tile::gear(Position::new(5, 6), Rotation::Left))
        .expect("gear")
        .with_tile(BOARD_LAYER, Tile::gear(Position::new(6, 6), Rotation::Right))
        .expect("gear")
        .with_tile(BOARD_LAYER, Tile::laser(Position::new(0, 9), Direction::East, 2))
        .expect("laser");
    board
}

fn bench_round(c: &mut Criterion) {
    let mut state = GameState::with_players(EngineConfig::default(), factory_floor(), 8).expect("state");
    let mut rng = GameRng::new(11);
    let mut deck = ProgramDeck::shuffled(&mut rng);
    let mut queue = ProgramQueue::new(state.config());
    let ids: Vec<_> = state.robots().map(|r| r.id()).collect();
    for id in ids {
        let hand = deck.deal(5, &mut rng);
        queue.submit(id, hand).expect("program");
    }
    // move everyone onto the board interior first
    for (i, robot) in state.alive_ids().into_iter().enumerate() {
        state
            .teleport(robot, Position::new(2 + i as i32, 4 + (i % 3) as i32))
            .expect("teleport");
    }

    c.bench_function("round_8_robots", |b| {
        b.iter(|| {
            let mut round = state.clone();
            black_box(PhaseScheduler::run_round(&mut round, &queue).expect("round"))
        })
    });
}

criterion_group!(benches, bench_round);
criterion_main!(benches);
