//! Poll/recompute/write-back client for one player in one game.
//!
//! The client never edits the stored record in place. It keeps the most
//! recently fetched copy, applies a rule operation to a clone of it and
//! writes the whole clone back together with the version it was based on.
//! A store running [`WritePolicy::CompareAndSet`] turns a stale write into
//! [`GameError::ConflictRetry`]; the caller re-fetches and recomputes.
//!
//! [`WritePolicy::CompareAndSet`]: crate::store::in_memory::WritePolicy::CompareAndSet

use std::collections::VecDeque;

use anyhow::anyhow;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::board::Coord;
use crate::combat::AttackOutcome;
use crate::common::GameError;
use crate::config::{SyncConfig, MIN_POLL_INTERVAL};
use crate::game::{GameId, GameRecord, GameStatus, Player, PlayerId};
use crate::placement::Fleet;
use crate::ship::{Orientation, ShipKind};
use crate::store::{EntityStore, StoreError};

/// Something a client surfaces to its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A newer record replaced the local view.
    Updated { version: u64, status: GameStatus },
    /// The game reached `finished`. Emitted once per client.
    Finished { winner: Option<PlayerId>, won: bool },
    /// A fetch result was dropped because local state moved on meanwhile.
    Stale { version: u64 },
    /// The store could not be reached; the last known record is kept.
    Unreachable(String),
}

/// Local revision captured when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    revision: u64,
}

/// `true` when `err` is a version race the caller should retry.
pub fn is_conflict(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GameError>() == Some(&GameError::ConflictRetry)
}

pub struct GameClient<S> {
    store: S,
    me: Player,
    game: GameId,
    config: SyncConfig,
    local: Option<GameRecord>,
    revision: u64,
    finished_seen: bool,
    pending: VecDeque<SyncEvent>,
}

impl<S: EntityStore<GameRecord>> GameClient<S> {
    pub fn new(store: S, me: Player, game: GameId, config: SyncConfig) -> Self {
        Self {
            store,
            me,
            game,
            config,
            local: None,
            revision: 0,
            finished_seen: false,
            pending: VecDeque::new(),
        }
    }

    pub fn player(&self) -> &PlayerId {
        &self.me.id
    }

    pub fn game_id(&self) -> &GameId {
        &self.game
    }

    /// Most recently fetched or written record.
    pub fn local(&self) -> Option<&GameRecord> {
        self.local.as_ref()
    }

    /// Number of successful local writes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_my_turn(&self) -> bool {
        self.local
            .as_ref()
            .and_then(|g| g.current_turn())
            .map_or(false, |t| *t == self.me.id)
    }

    /// Start a fetch; hand the ticket back to [`GameClient::apply_fetch`].
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            revision: self.revision,
        }
    }

    /// Install a fetched record unless a local write happened after the
    /// ticket was taken or the record is older than the local copy.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, record: GameRecord) -> Vec<SyncEvent> {
        let mut events: Vec<SyncEvent> = self.pending.drain(..).collect();
        let older = self
            .local
            .as_ref()
            .map_or(false, |l| record.version < l.version);
        if ticket.revision != self.revision || older {
            debug!(
                "[{}] dropping stale fetch of {} at version {}",
                self.me.id, self.game, record.version
            );
            events.push(SyncEvent::Stale {
                version: record.version,
            });
            return events;
        }
        let changed = self
            .local
            .as_ref()
            .map_or(true, |l| l.version != record.version);
        if changed {
            events.push(SyncEvent::Updated {
                version: record.version,
                status: record.status(),
            });
        }
        events.extend(self.install(record));
        events
    }

    fn install(&mut self, record: GameRecord) -> Option<SyncEvent> {
        let finished = record.status() == GameStatus::Finished && !self.finished_seen;
        let winner = record.winner().cloned();
        self.local = Some(record);
        if !finished {
            return None;
        }
        self.finished_seen = true;
        let won = winner.as_ref() == Some(&self.me.id);
        info!("[{}] game {} finished, won: {}", self.me.id, self.game, won);
        Some(SyncEvent::Finished { winner, won })
    }

    /// Fetch the shared record and replace the local view with it.
    ///
    /// An unreachable store is reported as an event, not an error; the last
    /// known record stays in place.
    pub async fn poll(&mut self) -> anyhow::Result<Vec<SyncEvent>> {
        let ticket = self.begin_fetch();
        match self.store.get(self.game.as_str()).await {
            Ok(record) => Ok(self.apply_fetch(ticket, record)),
            Err(StoreError::Unavailable(reason)) => {
                warn!("[{}] store unreachable, keeping last record: {}", self.me.id, reason);
                let mut events: Vec<SyncEvent> = self.pending.drain(..).collect();
                events.push(SyncEvent::Unreachable(reason));
                Ok(events)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `op` to a copy of the latest record and write it back.
    pub async fn act<T, F>(&mut self, op: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut GameRecord) -> Result<T, GameError>,
    {
        let mut next = self
            .local
            .clone()
            .ok_or_else(|| anyhow!("game {} has not been fetched yet", self.game))?;
        let observed = next.version;
        let out = op(&mut next)?;
        match self.store.update(self.game.as_str(), next, observed).await {
            Ok(stored) => {
                self.revision += 1;
                debug!(
                    "[{}] wrote {} at version {}",
                    self.me.id, self.game, stored.version
                );
                if let Some(ev) = self.install(stored) {
                    self.pending.push_back(ev);
                }
                Ok(out)
            }
            Err(StoreError::VersionConflict {
                expected, found, ..
            }) => {
                warn!(
                    "[{}] write to {} based on version {} lost the race to version {}",
                    self.me.id, self.game, expected, found
                );
                Err(GameError::ConflictRetry.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// [`GameClient::act`], re-fetching and recomputing after each
    /// `ConflictRetry` up to `max_retries` times.
    pub async fn act_with_retry<T, F>(&mut self, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut(&mut GameRecord) -> Result<T, GameError>,
    {
        let mut attempt = 0;
        loop {
            match self.act(&mut op).await {
                Err(e) if is_conflict(&e) && attempt < self.config.max_retries => {
                    attempt += 1;
                    debug!("[{}] retrying after conflict ({})", self.me.id, attempt);
                    let events = self.poll().await?;
                    self.pending.extend(events);
                }
                other => return other,
            }
        }
    }

    pub async fn join(&mut self) -> anyhow::Result<()> {
        let me = self.me.clone();
        self.act_with_retry(|g| g.join(&me)).await
    }

    pub async fn place_ship(
        &mut self,
        kind: ShipKind,
        origin: Coord,
        orientation: Orientation,
    ) -> anyhow::Result<()> {
        let me = self.me.id.clone();
        self.act_with_retry(|g| g.place_ship(&me, kind, origin, orientation))
            .await
    }

    pub async fn submit_fleet(&mut self, fleet: Fleet) -> anyhow::Result<()> {
        let me = self.me.id.clone();
        self.act_with_retry(|g| g.submit_fleet(&me, fleet.clone()))
            .await
    }

    /// Attack once, without retry: a conflict means the turn may have
    /// changed hands and the user should see the fresh board first.
    pub async fn attack(&mut self, target: Coord) -> anyhow::Result<AttackOutcome> {
        let me = self.me.id.clone();
        self.act(|g| g.attack(&me, target, Utc::now())).await
    }

    /// Poll on the configured interval until the game finishes, `shutdown`
    /// flips to `true`, or the event receiver is dropped.
    pub async fn run(
        &mut self,
        events: mpsc::Sender<SyncEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let mut ticker = interval(self.config.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for ev in self.poll().await? {
                        if events.send(ev).await.is_err() {
                            return Ok(());
                        }
                    }
                    if self.finished_seen {
                        return Ok(());
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(());
                    }
                }
            }
        }
    }
}
