use battleship_arena::{
    AttackResult, Coord, FirstMover, Fleet, GameError, GameId, GameRecord, GameStatus,
    HouseRules, Orientation, Player, PlayerId, ShipKind, TOTAL_SHIP_CELLS,
};
use chrono::Utc;

/// Every ship flush left on its own even row, destroyer on top.
const LAYOUT: [(ShipKind, usize); 5] = [
    (ShipKind::Destroyer, 0),
    (ShipKind::Carrier, 2),
    (ShipKind::Battleship, 4),
    (ShipKind::Cruiser, 6),
    (ShipKind::Submarine, 8),
];

fn layout_fleet() -> Fleet {
    let mut fleet = Fleet::new();
    for (kind, row) in LAYOUT {
        fleet
            .place(kind, Coord::new(row, 0).unwrap(), Orientation::Horizontal)
            .unwrap();
    }
    fleet
}

fn layout_cells() -> Vec<Coord> {
    layout_fleet()
        .ships()
        .iter()
        .flat_map(|s| s.cells().to_vec())
        .collect()
}

fn players() -> (Player, Player) {
    (
        Player::new(PlayerId::new("player_a"), "A"),
        Player::new(PlayerId::new("player_b"), "B"),
    )
}

fn playing_game(rules: HouseRules) -> (GameRecord, Player, Player) {
    let (a, b) = players();
    let mut game = GameRecord::create(GameId::new("game_1"), &a, rules, Utc::now());
    game.join(&b).unwrap();
    game.submit_fleet(&a.id, layout_fleet()).unwrap();
    game.submit_fleet(&b.id, layout_fleet()).unwrap();
    (game, a, b)
}

fn at(row: usize, col: usize) -> Coord {
    Coord::new(row, col).unwrap()
}

#[test]
fn test_lifecycle_to_playing() {
    let (a, b) = players();
    let mut game = GameRecord::create(GameId::new("game_1"), &a, HouseRules::default(), Utc::now());
    assert_eq!(game.status(), GameStatus::Waiting);
    assert_eq!(game.player_count(), 1);

    game.join(&b).unwrap();
    assert_eq!(game.status(), GameStatus::PlacingShips);
    assert_eq!(game.seat(1).map(|s| s.name.as_str()), Some("B"));

    game.submit_fleet(&a.id, layout_fleet()).unwrap();
    assert_eq!(game.status(), GameStatus::PlacingShips);
    assert!(game.is_ready(&a.id).unwrap());
    assert!(!game.is_ready(&b.id).unwrap());
    assert_eq!(game.current_turn(), None);

    game.submit_fleet(&b.id, layout_fleet()).unwrap();
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.current_turn(), Some(&a.id));
}

#[test]
fn test_place_ship_one_by_one() -> Result<(), GameError> {
    let (a, b) = players();
    let mut game = GameRecord::create(GameId::new("game_1"), &a, HouseRules::default(), Utc::now());
    assert_eq!(
        game.place_ship(&a.id, ShipKind::Carrier, at(0, 0), Orientation::Horizontal),
        Err(GameError::IllegalTransition)
    );
    game.join(&b)?;
    for (kind, row) in LAYOUT {
        game.place_ship(&a.id, kind, at(row, 0), Orientation::Horizontal)?;
    }
    assert_eq!(
        game.place_ship(&a.id, ShipKind::Carrier, at(0, 5), Orientation::Vertical),
        Err(GameError::ShipAlreadyPlaced(ShipKind::Carrier))
    );
    for (kind, row) in LAYOUT {
        game.place_ship(&b.id, kind, at(row, 5), Orientation::Horizontal)?;
    }
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.fleet_status(&b.id)?.total, 5);
    Ok(())
}

#[test]
fn test_join_guards() {
    let (a, b) = players();
    let c = Player::new(PlayerId::new("player_c"), "C");
    let mut game = GameRecord::create(GameId::new("game_1"), &a, HouseRules::default(), Utc::now());
    assert_eq!(game.join(&a), Err(GameError::IllegalTransition));
    game.join(&b).unwrap();
    let before = game.clone();
    assert_eq!(game.join(&c), Err(GameError::IllegalTransition));
    assert_eq!(game, before);
}

#[test]
fn test_submit_fleet_guards() {
    let (a, b) = players();
    let mut game = GameRecord::create(GameId::new("game_1"), &a, HouseRules::default(), Utc::now());
    game.join(&b).unwrap();

    let mut partial = Fleet::new();
    partial
        .place(ShipKind::Carrier, at(0, 0), Orientation::Horizontal)
        .unwrap();
    assert_eq!(game.submit_fleet(&a.id, partial), Err(GameError::InvalidState));

    game.submit_fleet(&a.id, layout_fleet()).unwrap();
    assert_eq!(
        game.submit_fleet(&a.id, layout_fleet()),
        Err(GameError::IllegalTransition)
    );
    assert_eq!(
        game.submit_fleet(&PlayerId::new("stranger"), layout_fleet()),
        Err(GameError::UnknownPlayer)
    );
}

#[test]
fn test_attack_before_playing_is_illegal() {
    let (a, _) = players();
    let mut game = GameRecord::create(GameId::new("game_1"), &a, HouseRules::default(), Utc::now());
    let before = game.clone();
    assert_eq!(
        game.attack(&a.id, at(0, 0), Utc::now()),
        Err(GameError::IllegalTransition)
    );
    assert_eq!(game, before);
}

#[test]
fn test_miss_hands_over_hit_keeps_turn() {
    let (mut game, a, b) = playing_game(HouseRules::default());

    // A misses on an empty row.
    let out = game.attack(&a.id, at(3, 3), Utc::now()).unwrap();
    assert_eq!(out.result, AttackResult::Miss);
    assert_eq!(game.current_turn(), Some(&b.id));

    // B hits A's destroyer and keeps shooting.
    let out = game.attack(&b.id, at(0, 0), Utc::now()).unwrap();
    assert_eq!(out.result, AttackResult::Hit);
    assert_eq!(game.current_turn(), Some(&b.id));

    let out = game.attack(&b.id, at(0, 1), Utc::now()).unwrap();
    assert_eq!(out.result, AttackResult::Sink(ShipKind::Destroyer));
    assert_eq!(game.current_turn(), Some(&b.id));
    assert_eq!(game.fleet_status(&a.id).unwrap().sunk, 1);

    game.attack(&b.id, at(9, 9), Utc::now()).unwrap();
    assert_eq!(game.current_turn(), Some(&a.id));

    game.attack(&a.id, at(2, 0), Utc::now()).unwrap();
    assert_eq!(game.current_turn(), Some(&a.id));
    game.attack(&a.id, at(1, 9), Utc::now()).unwrap();
    assert_eq!(game.current_turn(), Some(&b.id));

    assert_eq!(game.moves().len(), 6);
    let hits: Vec<bool> = game.moves().iter().map(|m| m.hit).collect();
    assert_eq!(hits, vec![false, true, true, false, true, false]);
    let recent: Vec<Coord> = game.recent_moves(2).map(|m| m.target).collect();
    assert_eq!(recent, vec![at(1, 9), at(2, 0)]);
}

#[test]
fn test_full_game_b_wins() {
    let (mut game, a, b) = playing_game(HouseRules::default());
    game.attack(&a.id, at(3, 3), Utc::now()).unwrap();

    let targets = layout_cells();
    assert_eq!(targets.len(), TOTAL_SHIP_CELLS);
    for (i, target) in targets.iter().enumerate() {
        assert_eq!(game.current_turn(), Some(&b.id));
        let out = game.attack(&b.id, *target, Utc::now()).unwrap();
        assert!(out.result.is_hit());
        assert_eq!(out.fleet_destroyed, i + 1 == targets.len());
    }

    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.winner(), Some(&b.id));
    assert_eq!(game.current_turn(), None);
    assert_eq!(game.moves().len(), TOTAL_SHIP_CELLS + 1);
    assert_eq!(game.fleet_status(&a.id).unwrap().remaining(), 0);

    let before = game.clone();
    assert_eq!(
        game.attack(&b.id, at(9, 9), Utc::now()),
        Err(GameError::IllegalTransition)
    );
    assert_eq!(game, before);
}

#[test]
fn test_turn_and_identity_guards_do_not_mutate() {
    let (mut game, a, b) = playing_game(HouseRules::default());
    let before = game.clone();

    assert_eq!(
        game.attack(&b.id, at(0, 0), Utc::now()),
        Err(GameError::NotYourTurn)
    );
    assert_eq!(
        game.attack(&PlayerId::new("stranger"), at(0, 0), Utc::now()),
        Err(GameError::UnknownPlayer)
    );
    assert_eq!(game, before);

    game.attack(&a.id, at(0, 0), Utc::now()).unwrap();
    let before = game.clone();
    assert_eq!(
        game.attack(&a.id, at(0, 0), Utc::now()),
        Err(GameError::CellAlreadyAttacked)
    );
    assert_eq!(game, before);
}

#[test]
fn test_joiner_moves_first() {
    let rules = HouseRules {
        first_mover: FirstMover::Joiner,
        ..HouseRules::default()
    };
    let (game, _, b) = playing_game(rules);
    assert_eq!(game.current_turn(), Some(&b.id));
}

#[test]
fn test_no_extra_turn_on_hit() {
    let rules = HouseRules {
        extra_turn_on_hit: false,
        ..HouseRules::default()
    };
    let (mut game, a, b) = playing_game(rules);
    let out = game.attack(&a.id, at(0, 0), Utc::now()).unwrap();
    assert!(out.result.is_hit());
    assert_eq!(game.current_turn(), Some(&b.id));
}

#[test]
fn test_opponent_views() {
    let (game, a, b) = playing_game(HouseRules::default());
    assert_eq!(game.opponent_of(&a.id).unwrap().map(|s| &s.id), Some(&b.id));
    assert_eq!(game.opponent_of(&b.id).unwrap().map(|s| &s.id), Some(&a.id));
    assert!(game.involves(&a.id));
    assert!(!game.involves(&PlayerId::new("stranger")));
    assert_eq!(game.opponent_side(&a.id).unwrap(), game.side_of(&b.id).unwrap());
}
