//! Ship catalog entries, footprints and damage tracking.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::common::GameError;
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The five members of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipKind {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipKind {
    /// Ship's length.
    pub const fn length(&self) -> usize {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Battleship => 4,
            ShipKind::Cruiser => 3,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 2,
        }
    }

    /// Ship's name.
    pub const fn name(&self) -> &'static str {
        match self {
            ShipKind::Carrier => "Carrier",
            ShipKind::Battleship => "Battleship",
            ShipKind::Cruiser => "Cruiser",
            ShipKind::Submarine => "Submarine",
            ShipKind::Destroyer => "Destroyer",
        }
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::config::FLEET
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown ship kind: {}", s))
    }
}

/// Cells covered by a ship of `length` starting at `origin`, in order from
/// the origin. Fails with `OutOfBounds` if any cell leaves the grid.
pub fn compute_footprint(
    origin: Coord,
    length: usize,
    orientation: Orientation,
) -> Result<Vec<Coord>, GameError> {
    let end = match orientation {
        Orientation::Horizontal => origin.col() + length,
        Orientation::Vertical => origin.row() + length,
    };
    if length == 0 || end > BOARD_SIZE as usize {
        return Err(GameError::OutOfBounds);
    }
    (0..length)
        .map(|i| match orientation {
            Orientation::Horizontal => origin.offset(0, i),
            Orientation::Vertical => origin.offset(i, 0),
        })
        .collect()
}

/// A placed ship and the damage it has taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    kind: ShipKind,
    origin: Coord,
    orientation: Orientation,
    cells: Vec<Coord>,
    hits: u8,
}

impl Ship {
    /// Place a ship of `kind` at `origin`.
    pub fn new(kind: ShipKind, origin: Coord, orientation: Orientation) -> Result<Self, GameError> {
        let cells = compute_footprint(origin, kind.length(), orientation)?;
        Ok(Self {
            kind,
            origin,
            orientation,
            cells,
            hits: 0,
        })
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn length(&self) -> usize {
        self.kind.length()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupied cells, starting at the origin.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn hits(&self) -> usize {
        self.hits as usize
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.contains(&at)
    }

    /// Register a hit; saturates at the ship's length.
    pub fn register_hit(&mut self) {
        if self.hits() < self.length() {
            self.hits += 1;
        }
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits() == self.length()
    }
}
