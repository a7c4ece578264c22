use battleship_arena::{AttackGrid, CellState, Coord, GameError, OccupancyGrid, BOARD_SIZE};

#[test]
fn test_coord_bounds() {
    assert!(Coord::new(0, 0).is_ok());
    assert!(Coord::new(9, 9).is_ok());
    assert_eq!(Coord::new(10, 0), Err(GameError::OutOfBounds));
    assert_eq!(Coord::new(0, 10), Err(GameError::OutOfBounds));
}

#[test]
fn test_coord_offset_and_labels() -> Result<(), GameError> {
    let c = Coord::new(2, 6)?;
    assert_eq!(c.label(), "C7");
    assert_eq!(Coord::new(0, 0)?.label(), "A1");
    assert_eq!(Coord::new(9, 9)?.label(), "J10");
    assert_eq!(c.offset(1, 2)?, Coord::new(3, 8)?);
    assert_eq!(c.offset(0, 4), Err(GameError::OutOfBounds));
    assert_eq!(c.to_string(), "(2, 6)");
    Ok(())
}

#[test]
fn test_chebyshev() -> Result<(), GameError> {
    let a = Coord::new(4, 4)?;
    assert_eq!(a.chebyshev(&Coord::new(5, 5)?), 1);
    assert_eq!(a.chebyshev(&Coord::new(4, 6)?), 2);
    assert_eq!(a.chebyshev(&Coord::new(0, 3)?), 4);
    assert_eq!(a.chebyshev(&a), 0);
    Ok(())
}

#[test]
fn test_all_coords_row_major() {
    let all: Vec<Coord> = Coord::all().collect();
    assert_eq!(all.len(), (BOARD_SIZE as usize).pow(2));
    assert_eq!(all[0], Coord::new(0, 0).unwrap());
    assert_eq!(all[11], Coord::new(1, 1).unwrap());
    assert_eq!(all[99], Coord::new(9, 9).unwrap());
}

#[test]
fn test_occupancy_marks_once() -> Result<(), GameError> {
    let mut grid = OccupancyGrid::new();
    let at = Coord::new(3, 3)?;
    assert!(!grid.is_occupied(at));
    grid.mark_occupied(at)?;
    assert!(grid.is_occupied(at));
    assert_eq!(grid.mark_occupied(at), Err(GameError::InvalidState));
    assert_eq!(grid.count(), 1);
    Ok(())
}

#[test]
fn test_attack_grid_states() -> Result<(), GameError> {
    let mut grid = AttackGrid::new();
    let hit = Coord::new(0, 0)?;
    let miss = Coord::new(5, 7)?;
    assert_eq!(grid.cell(hit), CellState::Untouched);

    assert_eq!(grid.mark(hit, true)?, CellState::Hit);
    assert_eq!(grid.mark(miss, false)?, CellState::Miss);
    assert_eq!(grid.cell(hit), CellState::Hit);
    assert_eq!(grid.cell(miss), CellState::Miss);
    assert_eq!(grid.attacked(), 2);

    // A marked cell never changes again.
    assert_eq!(grid.mark(hit, false), Err(GameError::InvalidState));
    assert_eq!(grid.mark(miss, true), Err(GameError::InvalidState));
    assert_eq!(grid.cell(hit), CellState::Hit);
    assert_eq!(grid.hits().count_ones(), 1);
    assert_eq!(grid.misses().count_ones(), 1);
    Ok(())
}
