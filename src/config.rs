//! Board constants, the fleet catalog, sync tunables and house rules.

use crate::ship::ShipKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const FLEET: [ShipKind; NUM_SHIPS] = [
    ShipKind::Carrier,
    ShipKind::Battleship,
    ShipKind::Cruiser,
    ShipKind::Submarine,
    ShipKind::Destroyer,
];

/// Total number of ship segments in a complete fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Random draws tried per ship before giving up on it.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Whole-fleet retries before [`crate::Fleet::random_or_packed`] falls back to
/// the deterministic layout.
pub const DEFAULT_PLACEMENT_ROUNDS: usize = 8;

/// Shortest period a poll loop runs at; `tokio::time::interval` rejects zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tunables for the polling client and the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between fetches of an active game record.
    pub poll_interval: Duration,
    /// Interval between lobby listings.
    pub lobby_poll_interval: Duration,
    /// How many times an action is recomputed after a `ConflictRetry`.
    pub max_retries: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            lobby_poll_interval: Duration::from_secs(3),
            max_retries: 3,
        }
    }
}

impl SyncConfig {
    /// Defaults overridden by `ARENA_POLL_MS`, `ARENA_LOBBY_POLL_MS` and
    /// `ARENA_MAX_RETRIES` when set and parseable. A zero poll interval
    /// counts as unset.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(ms) = env_number("ARENA_POLL_MS").filter(|ms| *ms > 0) {
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_number("ARENA_LOBBY_POLL_MS").filter(|ms| *ms > 0) {
            cfg.lobby_poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = env_number("ARENA_MAX_RETRIES") {
            cfg.max_retries = u32::try_from(n).unwrap_or(u32::MAX);
        }
        cfg
    }
}

fn env_number(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Who holds the first turn once both fleets are ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstMover {
    /// The player who created the game.
    #[default]
    Creator,
    /// The player who joined it.
    Joiner,
}

/// House rules stored on every game record so both clients apply the same
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRules {
    /// A hit that does not end the game lets the attacker fire again.
    pub extra_turn_on_hit: bool,
    /// Seat that takes the first turn once both fleets are ready.
    pub first_mover: FirstMover,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            extra_turn_on_hit: true,
            first_mover: FirstMover::Creator,
        }
    }
}
