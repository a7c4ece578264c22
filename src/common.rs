//! Common types: rule errors and attack results.

use crate::bitboard::BitBoardError;
use crate::ship::ShipKind;
use core::fmt;

/// Result of a single attack against a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// Attack hit an unsunk ship segment.
    Hit,
    /// Attack missed all ships.
    Miss,
    /// Attack sank a ship, carrying its kind.
    Sink(ShipKind),
}

impl AttackResult {
    /// `true` for both plain hits and sinking hits.
    pub fn is_hit(&self) -> bool {
        !matches!(self, AttackResult::Miss)
    }
}

/// Errors returned by the game rules.
///
/// Every variant is a local validation failure the caller can recover from
/// by re-prompting, retrying a placement or re-fetching the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A coordinate or ship footprint falls outside the grid.
    OutOfBounds,
    /// A grid cell already holds a non-default value.
    InvalidState,
    /// Placement overlaps or touches (diagonals included) another ship.
    AdjacencyViolation,
    /// This ship kind has already been placed.
    ShipAlreadyPlaced(ShipKind),
    /// The target cell was attacked before.
    CellAlreadyAttacked,
    /// The action is not allowed in the current game status.
    IllegalTransition,
    /// The acting player does not hold the turn.
    NotYourTurn,
    /// The acting player is not seated in this game.
    UnknownPlayer,
    /// Random placement ran out of attempts for this ship kind.
    PlacementExhausted(ShipKind),
    /// The record advanced since it was read; re-fetch and recompute.
    ConflictRetry,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds => write!(f, "Coordinate is outside the board"),
            GameError::InvalidState => write!(f, "Cell already holds a value"),
            GameError::AdjacencyViolation => {
                write!(f, "Ship placement overlaps or touches another ship")
            }
            GameError::ShipAlreadyPlaced(kind) => write!(f, "{} is already placed", kind),
            GameError::CellAlreadyAttacked => write!(f, "Cell was already attacked"),
            GameError::IllegalTransition => {
                write!(f, "Action is not allowed in the current game status")
            }
            GameError::NotYourTurn => write!(f, "It is not your turn"),
            GameError::UnknownPlayer => write!(f, "Player is not part of this game"),
            GameError::PlacementExhausted(kind) => {
                write!(f, "Unable to place {} within the attempt bound", kind)
            }
            GameError::ConflictRetry => {
                write!(f, "Game record changed since last read; re-fetch and retry")
            }
        }
    }
}

impl std::error::Error for GameError {}

impl From<BitBoardError> for GameError {
    fn from(_: BitBoardError) -> Self {
        GameError::OutOfBounds
    }
}
