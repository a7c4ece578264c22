use battleship_arena::{
    init_logging, is_conflict, play_match, GameRecord, HouseRules, InMemoryStore, Lobby,
    Player, SyncConfig, WritePolicy,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::Rng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    /// Reject writes based on a stale version.
    Cas,
    /// Overwrite unconditionally.
    LastWriteWins,
}

impl From<Policy> for WritePolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Cas => WritePolicy::CompareAndSet,
            Policy::LastWriteWins => WritePolicy::LastWriteWins,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Two automated players play a full game over an in-memory store.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = Policy::Cas)]
        policy: Policy,
        #[arg(long, help = "A hit passes the turn like a miss does")]
        no_extra_turn: bool,
    },
    /// Two players try to join the same waiting game from the same snapshot.
    Race {
        #[arg(long, value_enum, default_value_t = Policy::Cas)]
        policy: Policy,
    },
}

fn arena(policy: Policy) -> Lobby<InMemoryStore<GameRecord>, InMemoryStore<Player>> {
    Lobby::new(
        InMemoryStore::new(policy.into()),
        InMemoryStore::new(WritePolicy::CompareAndSet),
        SyncConfig::from_env(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local {
            seed,
            policy,
            no_extra_turn,
        } => {
            println!("Starting local automated game ({:?})...", policy);
            let seed = match seed {
                Some(s) => {
                    println!("Using fixed seed: {} (game will be reproducible)", s);
                    s
                }
                None => rand::rng().random(),
            };
            let rules = HouseRules {
                extra_turn_on_hit: !no_extra_turn,
                ..HouseRules::default()
            };
            let lobby = arena(policy);
            let summary = play_match(&lobby, ["Player 1", "Player 2"], rules, seed).await?;
            for mv in summary.record.moves() {
                println!(
                    "{:>24} -> {:<3} {}",
                    mv.player,
                    mv.target.label(),
                    if mv.hit { "HIT" } else { "miss" }
                );
            }
            let winner = summary
                .players
                .iter()
                .find(|p| Some(&p.id) == summary.winner.as_ref())
                .map(|p| p.name.as_str())
                .unwrap_or("nobody");
            println!(
                "{} wins after {} moves ({} retried writes)",
                winner,
                summary.record.moves().len(),
                summary.conflicts
            );
        }
        Commands::Race { policy } => {
            println!("Racing two joins ({:?})...", policy);
            let lobby = arena(policy);
            let host = lobby.register("Host").await?;
            let alice = lobby.register("Alice").await?;
            let bob = lobby.register("Bob").await?;
            let game = lobby.create_game(&host, HouseRules::default()).await?;

            // Both clients hold the same waiting snapshot before either writes.
            let mut a = lobby.client(&alice, &game.id).await?;
            let mut b = lobby.client(&bob, &game.id).await?;
            let joined_a = a.act(|g| g.join(&alice)).await;
            let joined_b = b.act(|g| g.join(&bob)).await;

            for (name, res) in [("Alice", &joined_a), ("Bob", &joined_b)] {
                match res {
                    Ok(()) => println!("{} thinks the join succeeded", name),
                    Err(e) if is_conflict(e) => {
                        println!("{} was told to re-fetch: {}", name, e)
                    }
                    Err(e) => println!("{} failed: {}", name, e),
                }
            }
            a.poll().await?;
            let seated = a
                .local()
                .and_then(|g| g.seat(1))
                .map(|s| s.name.clone())
                .unwrap_or_default();
            println!("Second seat in the stored record: {}", seated);
            if joined_a.is_ok() && joined_b.is_ok() {
                println!("Lost update: Alice's join was silently overwritten.");
            }
        }
    }
    Ok(())
}
