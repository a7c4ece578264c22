use battleship_arena::{compute_footprint, Coord, GameError, Orientation, Ship, ShipKind, FLEET, TOTAL_SHIP_CELLS};

#[test]
fn test_catalog() {
    let lengths: Vec<usize> = FLEET.iter().map(|k| k.length()).collect();
    assert_eq!(lengths, vec![5, 4, 3, 3, 2]);
    assert_eq!(lengths.iter().sum::<usize>(), TOTAL_SHIP_CELLS);
    assert_eq!("submarine".parse::<ShipKind>(), Ok(ShipKind::Submarine));
    assert!("Rowboat".parse::<ShipKind>().is_err());
}

#[test]
fn test_footprint_horizontal_and_vertical() -> Result<(), GameError> {
    let cells = compute_footprint(Coord::new(2, 1)?, 3, Orientation::Horizontal)?;
    assert_eq!(
        cells,
        vec![Coord::new(2, 1)?, Coord::new(2, 2)?, Coord::new(2, 3)?]
    );
    let cells = compute_footprint(Coord::new(0, 0)?, 4, Orientation::Vertical)?;
    assert_eq!(
        cells,
        vec![
            Coord::new(0, 0)?,
            Coord::new(1, 0)?,
            Coord::new(2, 0)?,
            Coord::new(3, 0)?
        ]
    );
    Ok(())
}

#[test]
fn test_footprint_out_of_bounds() -> Result<(), GameError> {
    assert_eq!(
        compute_footprint(Coord::new(0, 6)?, 5, Orientation::Horizontal),
        Err(GameError::OutOfBounds)
    );
    assert_eq!(
        compute_footprint(Coord::new(8, 0)?, 3, Orientation::Vertical),
        Err(GameError::OutOfBounds)
    );
    // Exactly touching the last column is fine.
    assert!(compute_footprint(Coord::new(0, 5)?, 5, Orientation::Horizontal).is_ok());
    Ok(())
}

#[test]
fn test_register_hit_and_sunk() -> Result<(), GameError> {
    let mut ship = Ship::new(ShipKind::Destroyer, Coord::new(1, 1)?, Orientation::Horizontal)?;
    assert!(ship.contains(Coord::new(1, 2)?));
    assert!(!ship.contains(Coord::new(2, 1)?));
    assert_eq!(ship.origin(), Coord::new(1, 1)?);
    assert_eq!(ship.orientation(), Orientation::Horizontal);
    assert!(!ship.is_sunk());
    ship.register_hit();
    assert!(!ship.is_sunk());
    ship.register_hit();
    assert!(ship.is_sunk());
    // Hits never exceed the length.
    ship.register_hit();
    assert_eq!(ship.hits(), 2);
    Ok(())
}
