//! Attack resolution against a defending fleet.

use crate::board::{AttackGrid, CellState, Coord};
use crate::common::{AttackResult, GameError};
use crate::config::HouseRules;
use crate::placement::Fleet;

/// What one attack did to the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub target: Coord,
    pub result: AttackResult,
    /// The defender has no ship left afloat.
    pub fleet_destroyed: bool,
}

impl AttackOutcome {
    /// Whether the attacker keeps `current_turn` under `rules`.
    pub fn attacker_keeps_turn(&self, rules: &HouseRules) -> bool {
        rules.extra_turn_on_hit && self.result.is_hit() && !self.fleet_destroyed
    }
}

/// Resolve an attack on `target`, updating the defender's attack grid and
/// ship damage. Nothing is modified when the cell was already attacked.
pub fn resolve_attack(
    target: Coord,
    fleet: &mut Fleet,
    attacks: &mut AttackGrid,
) -> Result<AttackOutcome, GameError> {
    if attacks.cell(target) != CellState::Untouched {
        return Err(GameError::CellAlreadyAttacked);
    }
    let result = match fleet.ship_at_mut(target) {
        Some(ship) => {
            attacks.mark(target, true)?;
            ship.register_hit();
            if ship.is_sunk() {
                AttackResult::Sink(ship.kind())
            } else {
                AttackResult::Hit
            }
        }
        None => {
            attacks.mark(target, false)?;
            AttackResult::Miss
        }
    };
    Ok(AttackOutcome {
        target,
        result,
        fleet_destroyed: fleet.all_sunk(),
    })
}
