//! Automated players driving two clients through a whole match.

use anyhow::anyhow;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::board::{AttackGrid, CellState, Coord};
use crate::config::{HouseRules, DEFAULT_PLACEMENT_ROUNDS};
use crate::game::{GameRecord, GameStatus, Player, PlayerId};
use crate::lobby::Lobby;
use crate::placement::Fleet;
use crate::store::EntityStore;
use crate::sync::{is_conflict, SyncEvent};

/// Upper bound on loop rounds before a match is declared stuck.
const MAX_ROUNDS: usize = 2_000;

/// Pick an untouched cell uniformly at random.
pub fn random_target<R: Rng>(rng: &mut R, attacks: &AttackGrid) -> Option<Coord> {
    let open: Vec<Coord> = Coord::all()
        .filter(|c| attacks.cell(*c) == CellState::Untouched)
        .collect();
    open.choose(rng).copied()
}

/// Result of [`play_match`].
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub record: GameRecord,
    pub players: [Player; 2],
    pub winner: Option<PlayerId>,
    /// Writes that had to be retried after a version race.
    pub conflicts: u32,
}

/// Register two players, have them create, join, place random fleets and
/// fire random shots until the game ends. Each player's rng is seeded from
/// `seed` so a match is reproducible.
pub async fn play_match<G, P>(
    lobby: &Lobby<G, P>,
    names: [&str; 2],
    rules: HouseRules,
    seed: u64,
) -> anyhow::Result<MatchSummary>
where
    G: EntityStore<GameRecord> + Clone,
    P: EntityStore<Player>,
{
    let p1 = lobby.register(names[0]).await?;
    let p2 = lobby.register(names[1]).await?;
    let game = lobby.create_game(&p1, rules).await?;

    let mut rngs = [
        SmallRng::seed_from_u64(seed),
        SmallRng::seed_from_u64(seed.wrapping_add(1)),
    ];
    let mut clients = [
        lobby.client(&p1, &game.id).await?,
        lobby.join_game(&p2, &game.id).await?,
    ];

    for (client, rng) in clients.iter_mut().zip(rngs.iter_mut()) {
        client.poll().await?;
        let fleet = Fleet::random_or_packed(rng, DEFAULT_PLACEMENT_ROUNDS)?;
        client.submit_fleet(fleet).await?;
    }

    let mut conflicts = 0;
    let mut finished = false;
    for _ in 0..MAX_ROUNDS {
        for (client, rng) in clients.iter_mut().zip(rngs.iter_mut()) {
            let events = client.poll().await?;
            if events.iter().any(|e| matches!(e, SyncEvent::Finished { .. })) {
                finished = true;
            }
            if !client.is_my_turn() {
                continue;
            }
            let target = client
                .local()
                .and_then(|g| g.opponent_side(client.player()).ok())
                .and_then(|side| random_target(rng, &side.attacks))
                .ok_or_else(|| anyhow!("no cell left to attack"))?;
            match client.attack(target).await {
                Ok(outcome) => debug!("{} -> {}: {:?}", client.player(), target.label(), outcome.result),
                Err(e) if is_conflict(&e) => conflicts += 1,
                Err(e) => return Err(e),
            }
        }
        let done = clients
            .iter()
            .all(|c| c.local().map(|g| g.status()) == Some(GameStatus::Finished));
        if finished && done {
            break;
        }
    }

    let record = clients[0]
        .local()
        .cloned()
        .ok_or_else(|| anyhow!("game record missing"))?;
    if record.status() != GameStatus::Finished {
        return Err(anyhow!("match {} did not finish", record.id));
    }
    let winner = record.winner().cloned();
    let p1 = lobby
        .record_result(&p1.id, winner.as_ref() == Some(&p1.id))
        .await?;
    let p2 = lobby
        .record_result(&p2.id, winner.as_ref() == Some(&p2.id))
        .await?;
    info!(
        "match {} over after {} moves, winner {:?}",
        record.id,
        record.moves().len(),
        winner
    );
    Ok(MatchSummary {
        record,
        players: [p1, p2],
        winner,
        conflicts,
    })
}
