//! Two-player battleship over a shared game record.
//!
//! Both players run their own [`GameClient`]. Each client polls the record
//! from an [`EntityStore`], applies rule operations from [`GameRecord`]
//! locally and writes the whole record back with the version it read.

mod autoplay;
mod bitboard;
mod board;
mod combat;
mod common;
mod config;
pub mod game;
pub mod lobby;
mod logging;
mod placement;
mod ship;
pub mod store;
pub mod sync;

pub use autoplay::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use combat::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use lobby::Lobby;
pub use logging::init_logging;
pub use placement::*;
pub use ship::*;
pub use store::in_memory::{InMemoryStore, WritePolicy};
pub use store::{Entity, EntityStore, Envelope, Query, StoreError};
pub use sync::{is_conflict, FetchTicket, GameClient, SyncEvent};
