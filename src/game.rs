//! The shared game record and its state machine.
//!
//! `GameRecord` is exactly what lives in the store: both clients read it,
//! apply one of the operations below locally and write the whole record
//! back. Every operation checks its guards before touching any field, so a
//! rejected action leaves the record unchanged.

use chrono::{DateTime, Utc};
use core::fmt;
use log::info;
use serde::{Deserialize, Serialize};

use crate::board::{AttackGrid, Coord};
use crate::combat::{resolve_attack, AttackOutcome};
use crate::common::GameError;
use crate::config::{FirstMover, HouseRules};
use crate::placement::{Fleet, FleetStatus};
use crate::ship::{Orientation, ShipKind};

/// Externally issued player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Store key of a game record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Player profile kept in the players collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub games_played: u32,
    pub games_won: u32,
    pub online: bool,
    #[serde(default)]
    pub version: u64,
}

impl Player {
    /// Fresh profile: zeroed counters, online.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            games_played: 0,
            games_won: 0,
            online: true,
            version: 0,
        }
    }

    /// Count a finished match.
    pub fn record_result(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
        }
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    PlacingShips,
    Playing,
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Waiting => "waiting",
            GameStatus::PlacingShips => "placing_ships",
            GameStatus::Playing => "playing",
            GameStatus::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// One entry of the append-only move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: PlayerId,
    pub target: Coord,
    pub hit: bool,
    pub at: DateTime<Utc>,
}

/// Identity of a seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
}

/// Everything belonging to one seat: its fleet and the opponent's attacks on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    pub fleet: Fleet,
    pub attacks: AttackGrid,
}

/// The shared game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    /// Advanced by one on every successful write-back.
    pub version: u64,
    pub rules: HouseRules,
    pub created_at: DateTime<Utc>,
    seats: [Option<Seat>; 2],
    sides: [Side; 2],
    current_turn: Option<PlayerId>,
    status: GameStatus,
    winner: Option<PlayerId>,
    moves: Vec<Move>,
}

impl GameRecord {
    /// New game in `waiting` with `creator` in the first seat.
    pub fn create(id: GameId, creator: &Player, rules: HouseRules, at: DateTime<Utc>) -> Self {
        Self {
            id,
            version: 0,
            rules,
            created_at: at,
            seats: [
                Some(Seat {
                    id: creator.id.clone(),
                    name: creator.name.clone(),
                }),
                None,
            ],
            sides: [Side::default(), Side::default()],
            current_turn: None,
            status: GameStatus::Waiting,
            winner: None,
            moves: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The last `n` moves, newest first.
    pub fn recent_moves(&self, n: usize) -> impl Iterator<Item = &Move> {
        self.moves.iter().rev().take(n)
    }

    /// Seat 0 is the creator, seat 1 the joiner.
    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index).and_then(|s| s.as_ref())
    }

    pub fn player_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.seat_of(player).is_ok()
    }

    fn seat_of(&self, player: &PlayerId) -> Result<usize, GameError> {
        self.seats
            .iter()
            .position(|s| s.as_ref().map(|s| &s.id) == Some(player))
            .ok_or(GameError::UnknownPlayer)
    }

    /// The player's own side: fleet plus the opponent's attacks on it.
    pub fn side_of(&self, player: &PlayerId) -> Result<&Side, GameError> {
        Ok(&self.sides[self.seat_of(player)?])
    }

    /// The opponent's side as seen by `player`.
    pub fn opponent_side(&self, player: &PlayerId) -> Result<&Side, GameError> {
        Ok(&self.sides[1 - self.seat_of(player)?])
    }

    pub fn opponent_of(&self, player: &PlayerId) -> Result<Option<&Seat>, GameError> {
        Ok(self.seat(1 - self.seat_of(player)?))
    }

    pub fn fleet_status(&self, player: &PlayerId) -> Result<FleetStatus, GameError> {
        Ok(self.side_of(player)?.fleet.status())
    }

    /// The player's fleet is complete.
    pub fn is_ready(&self, player: &PlayerId) -> Result<bool, GameError> {
        Ok(self.side_of(player)?.fleet.is_complete())
    }

    /// Take the second seat; moves the game to `placing_ships`.
    pub fn join(&mut self, player: &Player) -> Result<(), GameError> {
        if self.status != GameStatus::Waiting || self.seats[1].is_some() || self.involves(&player.id)
        {
            return Err(GameError::IllegalTransition);
        }
        self.seats[1] = Some(Seat {
            id: player.id.clone(),
            name: player.name.clone(),
        });
        self.status = GameStatus::PlacingShips;
        info!("game {}: {} joined, placing ships", self.id, player.id);
        Ok(())
    }

    /// Place one ship for `player`.
    pub fn place_ship(
        &mut self,
        player: &PlayerId,
        kind: ShipKind,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<(), GameError> {
        let seat = self.placement_seat(player)?;
        self.sides[seat].fleet.place(kind, origin, orientation)?;
        self.start_if_ready();
        Ok(())
    }

    /// Replace the player's fleet with one placed locally; it must be
    /// complete.
    pub fn submit_fleet(&mut self, player: &PlayerId, fleet: Fleet) -> Result<(), GameError> {
        let seat = self.placement_seat(player)?;
        if self.sides[seat].fleet.is_complete() {
            return Err(GameError::IllegalTransition);
        }
        if !fleet.is_complete() {
            return Err(GameError::InvalidState);
        }
        self.sides[seat].fleet = fleet;
        self.start_if_ready();
        Ok(())
    }

    fn placement_seat(&self, player: &PlayerId) -> Result<usize, GameError> {
        if self.status != GameStatus::PlacingShips {
            return Err(GameError::IllegalTransition);
        }
        self.seat_of(player)
    }

    fn start_if_ready(&mut self) {
        if !self.sides.iter().all(|s| s.fleet.is_complete()) {
            return;
        }
        let first = match self.rules.first_mover {
            FirstMover::Creator => 0,
            FirstMover::Joiner => 1,
        };
        self.current_turn = self.seats[first].as_ref().map(|s| s.id.clone());
        self.status = GameStatus::Playing;
        info!(
            "game {}: both fleets ready, {:?} moves first",
            self.id, self.current_turn
        );
    }

    /// Fire at `target` on the opponent's board.
    pub fn attack(
        &mut self,
        player: &PlayerId,
        target: Coord,
        at: DateTime<Utc>,
    ) -> Result<AttackOutcome, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::IllegalTransition);
        }
        let seat = self.seat_of(player)?;
        if self.current_turn.as_ref() != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        let defender = 1 - seat;
        let side = &mut self.sides[defender];
        let outcome = resolve_attack(target, &mut side.fleet, &mut side.attacks)?;

        self.moves.push(Move {
            player: player.clone(),
            target,
            hit: outcome.result.is_hit(),
            at,
        });
        if outcome.fleet_destroyed {
            self.status = GameStatus::Finished;
            self.winner = Some(player.clone());
            self.current_turn = None;
            info!("game {}: {} wins", self.id, player);
        } else if !outcome.attacker_keeps_turn(&self.rules) {
            self.current_turn = self.seats[defender].as_ref().map(|s| s.id.clone());
        }
        Ok(outcome)
    }
}
