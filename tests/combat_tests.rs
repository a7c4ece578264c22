use battleship_arena::{
    resolve_attack, AttackGrid, AttackResult, CellState, Coord, Fleet, GameError, HouseRules,
    Orientation, ShipKind,
};

fn lone_destroyer() -> Result<Fleet, GameError> {
    let mut fleet = Fleet::new();
    fleet.place(ShipKind::Destroyer, Coord::new(0, 0)?, Orientation::Horizontal)?;
    Ok(fleet)
}

#[test]
fn test_miss_hit_sink() -> Result<(), GameError> {
    let mut fleet = lone_destroyer()?;
    fleet.place(ShipKind::Cruiser, Coord::new(5, 5)?, Orientation::Vertical)?;
    let mut attacks = AttackGrid::new();

    let out = resolve_attack(Coord::new(3, 3)?, &mut fleet, &mut attacks)?;
    assert_eq!(out.result, AttackResult::Miss);
    assert_eq!(attacks.cell(Coord::new(3, 3)?), CellState::Miss);

    let out = resolve_attack(Coord::new(0, 0)?, &mut fleet, &mut attacks)?;
    assert_eq!(out.result, AttackResult::Hit);
    assert!(!out.fleet_destroyed);

    let out = resolve_attack(Coord::new(0, 1)?, &mut fleet, &mut attacks)?;
    assert_eq!(out.result, AttackResult::Sink(ShipKind::Destroyer));
    assert!(!out.fleet_destroyed);
    assert_eq!(fleet.status().sunk, 1);
    assert_eq!(fleet.status().remaining(), 1);
    Ok(())
}

#[test]
fn test_double_attack_changes_nothing() -> Result<(), GameError> {
    let mut fleet = lone_destroyer()?;
    let mut attacks = AttackGrid::new();
    let target = Coord::new(0, 0)?;
    resolve_attack(target, &mut fleet, &mut attacks)?;

    let (fleet_before, attacks_before) = (fleet.clone(), attacks);
    assert_eq!(
        resolve_attack(target, &mut fleet, &mut attacks),
        Err(GameError::CellAlreadyAttacked)
    );
    assert_eq!(fleet, fleet_before);
    assert_eq!(attacks, attacks_before);
    assert_eq!(fleet.ships()[0].hits(), 1);

    let miss = Coord::new(9, 9)?;
    resolve_attack(miss, &mut fleet, &mut attacks)?;
    assert_eq!(
        resolve_attack(miss, &mut fleet, &mut attacks),
        Err(GameError::CellAlreadyAttacked)
    );
    Ok(())
}

#[test]
fn test_last_sink_destroys_fleet() -> Result<(), GameError> {
    let mut fleet = lone_destroyer()?;
    let mut attacks = AttackGrid::new();
    resolve_attack(Coord::new(0, 0)?, &mut fleet, &mut attacks)?;
    let out = resolve_attack(Coord::new(0, 1)?, &mut fleet, &mut attacks)?;
    assert!(out.fleet_destroyed);
    assert!(fleet.all_sunk());
    // The winning shot never grants another turn.
    assert!(!out.attacker_keeps_turn(&HouseRules::default()));
    Ok(())
}

#[test]
fn test_extra_turn_rule() -> Result<(), GameError> {
    let mut fleet = lone_destroyer()?;
    fleet.place(ShipKind::Submarine, Coord::new(4, 4)?, Orientation::Horizontal)?;
    let mut attacks = AttackGrid::new();
    let hit = resolve_attack(Coord::new(4, 4)?, &mut fleet, &mut attacks)?;
    let miss = resolve_attack(Coord::new(8, 8)?, &mut fleet, &mut attacks)?;

    let default_rules = HouseRules::default();
    assert!(hit.attacker_keeps_turn(&default_rules));
    assert!(!miss.attacker_keeps_turn(&default_rules));

    let strict = HouseRules {
        extra_turn_on_hit: false,
        ..HouseRules::default()
    };
    assert!(!hit.attacker_keeps_turn(&strict));
    Ok(())
}
