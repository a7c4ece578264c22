//! Fleet placement: bounds and no-touch validation, manual and random
//! placement.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Coord, OccupancyGrid};
use crate::common::GameError;
use crate::config::{BOARD_SIZE, FLEET, MAX_PLACEMENT_ATTEMPTS, NUM_SHIPS};
use crate::ship::{Orientation, Ship, ShipKind};

/// `true` when no cell of `footprint` is occupied or borders an occupied cell,
/// diagonals included.
pub fn validate_placement(footprint: &[Coord], occupancy: &OccupancyGrid) -> bool {
    let zone = occupancy.exclusion_zone();
    footprint
        .iter()
        .all(|c| !zone.get(c.row(), c.col()).unwrap_or(true))
}

/// Counts shown next to a fleet: ships afloat out of the full catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetStatus {
    pub total: usize,
    pub sunk: usize,
}

impl FleetStatus {
    pub fn remaining(&self) -> usize {
        self.total - self.sunk
    }
}

/// One player's ships together with their occupancy grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    occupancy: OccupancyGrid,
    ships: Vec<Ship>,
}

impl Fleet {
    /// Create an empty fleet (no ships placed).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Placed ships, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn is_placed(&self, kind: ShipKind) -> bool {
        self.ships.iter().any(|s| s.kind() == kind)
    }

    /// Catalog entries still to place, in catalog order.
    pub fn remaining(&self) -> Vec<ShipKind> {
        FLEET.iter().copied().filter(|k| !self.is_placed(*k)).collect()
    }

    /// All five catalog entries placed exactly once.
    pub fn is_complete(&self) -> bool {
        self.ships.len() == NUM_SHIPS
            && FLEET
                .iter()
                .all(|k| self.ships.iter().filter(|s| s.kind() == *k).count() == 1)
    }

    /// Place a single ship of `kind` at `origin` and `orientation`.
    pub fn place(
        &mut self,
        kind: ShipKind,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<&Ship, GameError> {
        if self.is_placed(kind) {
            return Err(GameError::ShipAlreadyPlaced(kind));
        }
        let ship = Ship::new(kind, origin, orientation)?;
        if !validate_placement(ship.cells(), &self.occupancy) {
            return Err(GameError::AdjacencyViolation);
        }
        let mut occupancy = self.occupancy;
        for cell in ship.cells() {
            occupancy.mark_occupied(*cell)?;
        }
        self.occupancy = occupancy;
        self.ships.push(ship);
        Ok(&self.ships[self.ships.len() - 1])
    }

    /// Discard every placement.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Place `kind` at the first valid random draw, trying at most
    /// `MAX_PLACEMENT_ATTEMPTS` times.
    pub fn place_random<R: Rng>(&mut self, rng: &mut R, kind: ShipKind) -> Result<(), GameError> {
        if self.is_placed(kind) {
            return Err(GameError::ShipAlreadyPlaced(kind));
        }
        let len = kind.length();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let max_r = if orient == Orientation::Vertical {
                BOARD_SIZE as usize - len
            } else {
                BOARD_SIZE as usize - 1
            };
            let max_c = if orient == Orientation::Horizontal {
                BOARD_SIZE as usize - len
            } else {
                BOARD_SIZE as usize - 1
            };
            let origin = Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c))?;
            match self.place(kind, origin, orient) {
                Ok(_) => return Ok(()),
                Err(GameError::AdjacencyViolation) => continue,
                Err(e) => return Err(e),
            }
        }
        debug!("gave up placing {} after {} draws", kind, MAX_PLACEMENT_ATTEMPTS);
        Err(GameError::PlacementExhausted(kind))
    }

    /// A complete random fleet, or `PlacementExhausted` naming the first ship
    /// that could not be fitted.
    pub fn random<R: Rng>(rng: &mut R) -> Result<Self, GameError> {
        let mut fleet = Self::new();
        for kind in FLEET {
            fleet.place_random(rng, kind)?;
        }
        Ok(fleet)
    }

    /// Try [`Fleet::random`] up to `rounds` times, then fall back to
    /// [`Fleet::packed`], which cannot fail to fit.
    pub fn random_or_packed<R: Rng>(rng: &mut R, rounds: usize) -> Result<Self, GameError> {
        for round in 0..rounds {
            match Self::random(rng) {
                Ok(fleet) => return Ok(fleet),
                Err(e) => debug!("random placement round {} failed: {}", round, e),
            }
        }
        warn!("random placement failed {} rounds; using packed layout", rounds);
        Self::packed(rng)
    }

    /// Constructive layout: each ship gets its own even row (or column), so no
    /// two ships can touch. Rows, offsets and the axis are still shuffled.
    pub fn packed<R: Rng>(rng: &mut R) -> Result<Self, GameError> {
        let mut lanes: Vec<usize> = (0..NUM_SHIPS).map(|i| i * 2).collect();
        lanes.shuffle(rng);
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let mut fleet = Self::new();
        for (kind, lane) in FLEET.iter().zip(lanes) {
            let along = rng.random_range(0..=BOARD_SIZE as usize - kind.length());
            let origin = match orient {
                Orientation::Horizontal => Coord::new(lane, along)?,
                Orientation::Vertical => Coord::new(along, lane)?,
            };
            fleet.place(*kind, origin, orient)?;
        }
        Ok(fleet)
    }

    /// Ship covering `at`, if any.
    pub(crate) fn ship_at_mut(&mut self, at: Coord) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.contains(at))
    }

    /// Returns `true` when every placed ship is sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.is_sunk())
    }

    pub fn status(&self) -> FleetStatus {
        FleetStatus {
            total: self.ships.len(),
            sunk: self.ships.iter().filter(|s| s.is_sunk()).count(),
        }
    }
}
