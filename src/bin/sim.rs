use battleship_arena::{play_match, HouseRules, InMemoryStore, Lobby, SyncConfig, WritePolicy};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let lobby = Lobby::new(
        InMemoryStore::new(WritePolicy::CompareAndSet),
        InMemoryStore::new(WritePolicy::CompareAndSet),
        SyncConfig::default(),
    );
    let summary = play_match(&lobby, ["player1", "player2"], HouseRules::default(), seed).await?;

    let winner = summary
        .players
        .iter()
        .find(|p| Some(&p.id) == summary.winner.as_ref())
        .map(|p| p.name.clone());
    let players: Vec<_> = summary
        .players
        .iter()
        .map(|p| {
            let shots = summary
                .record
                .moves()
                .iter()
                .filter(|m| m.player == p.id)
                .count();
            json!({
                "name": p.name,
                "shots": shots,
                "games_played": p.games_played,
                "games_won": p.games_won,
            })
        })
        .collect();

    let result = json!({
        "players": players,
        "moves": summary.record.moves().len(),
        "conflicts": summary.conflicts,
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
