//! Lobby: player profiles, game creation and the open-games listing.

use anyhow::anyhow;
use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::common::GameError;
use crate::config::{HouseRules, SyncConfig, MIN_POLL_INTERVAL};
use crate::game::{GameId, GameRecord, GameStatus, Player, PlayerId};
use crate::store::{EntityStore, Query, StoreError};
use crate::sync::GameClient;

/// Front door over the players and games collections.
pub struct Lobby<G, P> {
    games: G,
    players: P,
    config: SyncConfig,
}

impl<G, P> Lobby<G, P>
where
    G: EntityStore<GameRecord> + Clone,
    P: EntityStore<Player>,
{
    pub fn new(games: G, players: P, config: SyncConfig) -> Self {
        Self {
            games,
            players,
            config,
        }
    }

    /// Create a profile for a new session. Ids look like `player_<ms>_<hex>`.
    pub async fn register(&self, name: &str) -> anyhow::Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("player name must not be empty"));
        }
        let id = PlayerId::new(fresh_id("player"));
        let player = self.players.create(Player::new(id, name)).await?;
        info!("registered {} as {}", player.name, player.id);
        Ok(player)
    }

    pub async fn player(&self, id: &PlayerId) -> anyhow::Result<Player> {
        Ok(self.players.get(id.as_str()).await?)
    }

    /// Create a game with `creator` seated and waiting for an opponent.
    pub async fn create_game(&self, creator: &Player, rules: HouseRules) -> anyhow::Result<GameRecord> {
        let id = GameId::new(fresh_id("game"));
        let record = GameRecord::create(id, creator, rules, Utc::now());
        let stored = self.games.create(record).await?;
        info!("{} created game {}", creator.id, stored.id);
        Ok(stored)
    }

    /// Games the viewer can see: every waiting game, plus games in placement
    /// or play that involve the viewer. Newest first.
    pub async fn open_games(&self, viewer: &PlayerId) -> anyhow::Result<Vec<GameRecord>> {
        let viewer = viewer.clone();
        let query = Query::all()
            .filter(move |g: &GameRecord| match g.status() {
                GameStatus::Waiting => true,
                GameStatus::PlacingShips | GameStatus::Playing => g.involves(&viewer),
                GameStatus::Finished => false,
            })
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.games.list(&query).await?)
    }

    /// Re-list [`Lobby::open_games`] every `lobby_poll_interval` and send each
    /// listing that differs from the previous one. Stops on shutdown or when
    /// the receiver goes away; an unreachable store skips the tick.
    pub async fn watch_open_games(
        &self,
        viewer: &PlayerId,
        listings: mpsc::Sender<Vec<GameRecord>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let mut ticker = interval(self.config.lobby_poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last: Option<Vec<(GameId, u64)>> = None;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let games = match self.open_games(viewer).await {
                        Ok(games) => games,
                        Err(e) if matches!(e.downcast_ref::<StoreError>(), Some(StoreError::Unavailable(_))) => {
                            warn!("lobby listing for {} failed: {}", viewer, e);
                            continue;
                        }
                        Err(e) => return Err(e),
                    };
                    let seen: Vec<(GameId, u64)> =
                        games.iter().map(|g| (g.id.clone(), g.version)).collect();
                    if last.as_ref() == Some(&seen) {
                        continue;
                    }
                    debug!("lobby listing for {} now has {} games", viewer, games.len());
                    last = Some(seen);
                    if listings.send(games).await.is_err() {
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

    /// The viewer's game past the waiting stage, if any, so a client can
    /// resume it.
    pub async fn active_game(&self, viewer: &PlayerId) -> anyhow::Result<Option<GameRecord>> {
        Ok(self
            .open_games(viewer)
            .await?
            .into_iter()
            .find(|g| g.involves(viewer) && g.status() != GameStatus::Waiting))
    }

    /// A polling client for `player` in `game`, primed with one fetch.
    pub async fn client(&self, player: &Player, game: &GameId) -> anyhow::Result<GameClient<G>> {
        let mut client =
            GameClient::new(self.games.clone(), player.clone(), game.clone(), self.config);
        client.poll().await?;
        Ok(client)
    }

    /// Seat `player` in `game` and return a client for it.
    pub async fn join_game(&self, player: &Player, game: &GameId) -> anyhow::Result<GameClient<G>> {
        let mut client = self.client(player, game).await?;
        client.join().await?;
        Ok(client)
    }

    /// Count a finished game on the player's own profile. Each client
    /// records only its own result so the two never write the same profile.
    pub async fn record_result(&self, player: &PlayerId, won: bool) -> anyhow::Result<Player> {
        for _ in 0..=self.config.max_retries {
            let mut profile = self.players.get(player.as_str()).await?;
            let observed = profile.version;
            profile.record_result(won);
            match self.players.update(player.as_str(), profile, observed).await {
                Ok(stored) => return Ok(stored),
                Err(StoreError::VersionConflict { .. }) => {
                    warn!("profile {} changed while recording result, retrying", player);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(GameError::ConflictRetry.into())
    }

    pub async fn set_online(&self, player: &PlayerId, online: bool) -> anyhow::Result<Player> {
        let mut profile = self.players.get(player.as_str()).await?;
        let observed = profile.version;
        profile.online = online;
        Ok(self.players.update(player.as_str(), profile, observed).await?)
    }
}

fn fresh_id(prefix: &str) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{}_{}_{:08x}", prefix, Utc::now().timestamp_millis(), suffix)
}
