//! Map loading and game setup.
//!
//! Maps arrive as JSON from the map collaborator; every structural problem
//! must be reported before any robot is placed.

use robo_engine::{
    Board, Direction, EngineConfig, EngineError, GameState, MapError, MapSpec, Position, RobotSpec, TileError,
    TileKind, BOARD_LAYER, FLAG_LAYER, MAX_BOARD_SIDE,
};

fn load(json: &str) -> Result<Board, MapError> {
    let spec: MapSpec = serde_json::from_str(json).unwrap();
    Board::from_spec(&spec)
}

/// A complete map with every tile type loads and exposes its tiles.
#[test]
fn test_load_full_map() {
    let board = load(
        r#"{
            "width": 8,
            "height": 6,
            "layers": [
                {
                    "name": "board",
                    "tiles": [
                        {"x": 0, "y": 0, "type": "CONVEYOR", "direction": "EAST", "attributes": ["HIGH_PRIORITY"]},
                        {"x": 1, "y": 0, "type": "CONVEYOR", "direction": "NORTH", "attributes": ["LEFT"]},
                        {"x": 2, "y": 2, "type": "GEAR", "attributes": ["RIGHT"]},
                        {"x": 0, "y": 5, "type": "LASER", "direction": "EAST", "beams": 2},
                        {"x": 4, "y": 4, "type": "HOLE"},
                        {"x": 3, "y": 1, "type": "SPAWN", "number": 2},
                        {"x": 5, "y": 1, "type": "SPAWN", "number": 1}
                    ]
                },
                {
                    "name": "walls",
                    "tiles": [{"x": 3, "y": 3, "type": "WALL", "edges": ["NORTH", "WEST"]}]
                },
                {
                    "name": "flag",
                    "tiles": [
                        {"x": 7, "y": 5, "type": "FLAG", "number": 1},
                        {"x": 6, "y": 0, "type": "WRENCH"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!((board.width(), board.height()), (8, 6));
    assert_eq!(board.flag_count(), 1);
    assert_eq!(
        board.spawns(),
        vec![(1, Position::new(5, 1)), (2, Position::new(3, 1))]
    );
    assert!(matches!(
        board.board_tile(Position::new(0, 0)).unwrap().kind(),
        TileKind::Conveyor { express: true, turn: None, .. }
    ));
    assert!(board.board_tile(Position::new(4, 4)).unwrap().is_step_triggered());
    assert!(board.flag_tile(Position::new(6, 0)).is_some());
    assert!(board.wall_blocks(Position::new(3, 3), Direction::North));
    assert!(board.wall_blocks(Position::new(2, 3), Direction::East));
    assert!(!board.wall_blocks(Position::new(3, 3), Direction::South));
}

/// A map without a board layer is rejected.
#[test]
fn test_missing_board_layer() {
    let err = load(r#"{"width": 4, "height": 4, "layers": [{"name": "flag"}]}"#).unwrap_err();
    assert_eq!(err, MapError::MissingBoardLayer(BOARD_LAYER.to_string()));
}

/// Zero-sized maps are rejected.
#[test]
fn test_empty_map() {
    let err = load(r#"{"width": 0, "height": 4, "layers": [{"name": "board"}]}"#).unwrap_err();
    assert!(matches!(err, MapError::EmptyBoard { width: 0, height: 4 }));
}

/// Oversized maps are rejected before any layer is allocated.
#[test]
fn test_oversized_map() {
    let err = load(r#"{"width": 2147483647, "height": 2147483647, "layers": [{"name": "board"}]}"#).unwrap_err();
    assert_eq!(
        err,
        MapError::BoardTooLarge {
            width: i32::MAX,
            height: i32::MAX,
            max: MAX_BOARD_SIDE
        }
    );
}

/// Layers must be full-size tile grids.
#[test]
fn test_layer_shape_and_kind() {
    let err = load(r#"{"width": 4, "height": 4, "layers": [{"name": "board", "width": 3}]}"#).unwrap_err();
    assert!(matches!(err, MapError::LayerShape { width: 3, height: 4, .. }));

    let err = load(
        r#"{"width": 4, "height": 4, "layers": [{"name": "board"}, {"name": "art", "kind": "IMAGE"}]}"#,
    )
    .unwrap_err();
    assert_eq!(err, MapError::NotTileLayer("art".to_string()));
}

/// Invalid tiles surface as tile errors wrapped in the map error.
#[test]
fn test_invalid_tiles() {
    let gear_both_ways = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 1, "y": 1, "type": "GEAR", "attributes": ["LEFT", "RIGHT"]}
    ]}]}"#;
    assert!(matches!(
        load(gear_both_ways).unwrap_err(),
        MapError::Tile(TileError::ContradictoryRotation { .. })
    ));

    let pointless_gear = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 1, "y": 1, "type": "GEAR"}
    ]}]}"#;
    assert!(matches!(
        load(pointless_gear).unwrap_err(),
        MapError::Tile(TileError::MissingRotation { .. })
    ));

    let flag_zero = r#"{"width": 3, "height": 3, "layers": [{"name": "board"}, {"name": "flag", "tiles": [
        {"x": 1, "y": 1, "type": "FLAG", "number": 0}
    ]}]}"#;
    assert!(matches!(
        load(flag_zero).unwrap_err(),
        MapError::Tile(TileError::InvalidFlagNumber { number: 0, .. })
    ));

    let blinding_laser = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 1, "y": 1, "type": "LASER", "direction": "EAST", "beams": 4294967295}
    ]}]}"#;
    assert!(matches!(
        load(blinding_laser).unwrap_err(),
        MapError::Tile(TileError::TooManyBeams { beams: u32::MAX, .. })
    ));

    let express_wall = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 1, "y": 1, "type": "WALL", "edges": ["EAST"], "attributes": ["HIGH_PRIORITY"]}
    ]}]}"#;
    assert!(matches!(
        load(express_wall).unwrap_err(),
        MapError::Tile(TileError::UnsupportedAttribute { .. })
    ));
}

/// Tiles outside the grid or stacked on one cell are rejected.
#[test]
fn test_tile_placement_errors() {
    let outside = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 3, "y": 0, "type": "HOLE"}
    ]}]}"#;
    assert!(matches!(load(outside).unwrap_err(), MapError::TileOutOfBounds { .. }));

    let stacked = r#"{"width": 3, "height": 3, "layers": [{"name": "board", "tiles": [
        {"x": 1, "y": 1, "type": "HOLE"},
        {"x": 1, "y": 1, "type": "CONVEYOR", "direction": "EAST"}
    ]}]}"#;
    assert!(matches!(load(stacked).unwrap_err(), MapError::DuplicateTile { .. }));
}

/// Players start on spawn docks in dock order.
#[test]
fn test_players_on_spawn_docks() {
    let board = Board::new(6, 6)
        .unwrap()
        .with_tile(BOARD_LAYER, robo_engine::Tile::spawn(Position::new(4, 0), 2))
        .unwrap()
        .with_tile(BOARD_LAYER, robo_engine::Tile::spawn(Position::new(1, 0), 1))
        .unwrap();
    let state = GameState::with_players(EngineConfig::default(), board, 2).unwrap();

    let cells: Vec<Position> = state.robots().map(|r| r.position()).collect();
    assert_eq!(cells, vec![Position::new(1, 0), Position::new(4, 0)]);
    assert!(state.robots().all(|r| r.backup() == r.position()));
}

/// Player counts outside the configured range are fatal.
#[test]
fn test_player_count_limits() {
    let config = EngineConfig::default();
    for count in [0, 9] {
        let err = GameState::with_players(config.clone(), Board::new(10, 10).unwrap(), count).unwrap_err();
        assert_eq!(err, EngineError::InvalidPlayerCount { count, min: 1, max: 8 });
    }
    assert!(GameState::with_players(config.with_player_range(2..=4), Board::new(10, 10).unwrap(), 1).is_err());
}

/// Robots can only be placed on free board cells.
#[test]
fn test_add_robot_validation() {
    let mut state = GameState::new(EngineConfig::default(), Board::new(4, 4).unwrap()).unwrap();
    let first = state
        .add_robot(RobotSpec::player("Hammer Bot", Position::new(1, 1), Direction::East))
        .unwrap();

    assert_eq!(
        state
            .add_robot(RobotSpec::player("Spin Bot", Position::new(1, 1), Direction::East))
            .unwrap_err(),
        EngineError::Occupied {
            position: Position::new(1, 1),
            occupant: first
        }
    );
    assert!(matches!(
        state.add_robot(RobotSpec::non_player("Twitch", Position::new(4, 0), Direction::North)),
        Err(EngineError::OffBoard { .. })
    ));
    assert!(state.board().layer(FLAG_LAYER).is_none());
}
