//! Board model: coordinates and the two per-player grids.
//!
//! A player's board is split into an [`OccupancyGrid`], written during
//! placement, and an [`AttackGrid`], written only by the opponent's attacks.
//! Keeping them apart means a cell never has to be read with knowledge of
//! which phase the game is in.

use crate::bitboard::BitBoard;
use crate::common::GameError;
use crate::config::BOARD_SIZE;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Bitboard sized for the game grid.
pub type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

/// A validated grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Build a coordinate, failing with `OutOfBounds` outside `0..BOARD_SIZE`.
    pub fn new(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= BOARD_SIZE as usize || col >= BOARD_SIZE as usize {
            return Err(GameError::OutOfBounds);
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Coordinate shifted down/right by the given deltas, if still on the grid.
    pub fn offset(&self, d_row: usize, d_col: usize) -> Result<Self, GameError> {
        Self::new(self.row() + d_row, self.col() + d_col)
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Chebyshev (king-move) distance between two cells.
    pub fn chebyshev(&self, other: &Coord) -> usize {
        self.row().abs_diff(other.row()).max(self.col().abs_diff(other.col()))
    }

    /// Human label: row letter then 1-based column, e.g. `C7`.
    pub fn label(&self) -> String {
        format!("{}{}", (b'A' + self.row) as char, self.col + 1)
    }

    /// All coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        let n = BOARD_SIZE;
        (0..n).flat_map(move |row| (0..n).map(move |col| Coord { row, col }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which cells hold a ship. Written during placement only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    cells: BB,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, at: Coord) -> bool {
        self.cells.get(at.row(), at.col()).unwrap_or(false)
    }

    /// Mark a cell as holding a ship; `InvalidState` if it already does.
    pub fn mark_occupied(&mut self, at: Coord) -> Result<(), GameError> {
        if self.is_occupied(at) {
            return Err(GameError::InvalidState);
        }
        self.cells.set(at.row(), at.col())?;
        Ok(())
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells.count_ones()
    }

    /// Occupied cells plus every cell diagonally or orthogonally next to one.
    pub(crate) fn exclusion_zone(&self) -> BB {
        self.cells.halo()
    }

    pub fn mask(&self) -> BB {
        self.cells
    }
}

/// State of one cell of an [`AttackGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Untouched,
    Miss,
    Hit,
}

/// Outcome of the opponent's attacks against this player's fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackGrid {
    hits: BB,
    misses: BB,
}

impl AttackGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, at: Coord) -> CellState {
        if self.hits.get(at.row(), at.col()).unwrap_or(false) {
            CellState::Hit
        } else if self.misses.get(at.row(), at.col()).unwrap_or(false) {
            CellState::Miss
        } else {
            CellState::Untouched
        }
    }

    /// Record an attack result; `InvalidState` if the cell was already marked.
    pub fn mark(&mut self, at: Coord, hit: bool) -> Result<CellState, GameError> {
        if self.cell(at) != CellState::Untouched {
            return Err(GameError::InvalidState);
        }
        if hit {
            self.hits.set(at.row(), at.col())?;
            Ok(CellState::Hit)
        } else {
            self.misses.set(at.row(), at.col())?;
            Ok(CellState::Miss)
        }
    }

    pub fn hits(&self) -> BB {
        self.hits
    }

    pub fn misses(&self) -> BB {
        self.misses
    }

    /// Number of cells attacked so far.
    pub fn attacked(&self) -> usize {
        self.hits.count_ones() + self.misses.count_ones()
    }
}
