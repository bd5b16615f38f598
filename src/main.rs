//! Headless block-blast runner (default binary).
//!
//! Plays autoplay games with the greedy policy and prints a summary line per game, or one JSON
//! object per game with `--json`. Set `RUST_LOG=debug` to follow spawner decisions.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use block_blast::core::{GameConfig, GameSession, ShapeLibrary};
use block_blast::engine::{play, AutoplayConfig, GameSummary, GreedyPolicy, Policy, RandomPolicy};

/// Play block-blast sessions headlessly and report how they went.
#[derive(Debug, Parser)]
#[command(name = "block-blast", version)]
struct Args {
    /// Base seed; game N uses seed + N.
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Number of games to play.
    #[arg(long, default_value = "1", value_name = "N")]
    games: u32,

    /// Stop each game after this many batches.
    #[arg(long, value_name = "N")]
    max_rounds: Option<u32>,

    /// JSON game configuration; omitted fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON shape set replacing the built-in shapes.
    #[arg(long, value_name = "FILE")]
    shapes: Option<PathBuf>,

    /// Placement policy.
    #[arg(long, default_value = "greedy")]
    policy: PolicyKind,

    /// Decline revive offers.
    #[arg(long)]
    no_revive: bool,

    /// Print one JSON object per game instead of a text line.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    Greedy,
    Random,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    let library = match &args.shapes {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading shapes {}", path.display()))?;
            ShapeLibrary::from_json_str(&text, config.spawner.easy_max_mass)
                .with_context(|| format!("parsing shapes {}", path.display()))?
        }
        None => ShapeLibrary::standard(),
    };

    let autoplay = AutoplayConfig {
        max_rounds: args.max_rounds,
        accept_revives: !args.no_revive,
    };

    let mut totals = GameSummary::default();
    for game in 0..args.games {
        let seed = args.seed.wrapping_add(game as u64);
        let mut session = GameSession::new(config.clone(), library.clone(), seed)?;
        let mut policy: Box<dyn Policy> = match args.policy {
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        };

        let summary = play(&mut session, policy.as_mut(), &autoplay)
            .with_context(|| format!("game {game} (seed {seed})"))?;

        if args.json {
            let line = serde_json::json!({ "game": game, "seed": seed, "summary": &summary });
            println!("{line}");
        } else {
            println!("{}", format_summary(game, seed, &summary));
        }

        totals.score += summary.score;
        totals.rounds += summary.rounds;
        totals.lines_cleared += summary.lines_cleared;
        totals.best_score = totals.best_score.max(summary.best_score);
    }

    if !args.json && args.games > 1 {
        let n = args.games as f64;
        println!(
            "avg score {:.1}  avg rounds {:.1}  avg lines {:.1}  best {}",
            totals.score as f64 / n,
            totals.rounds as f64 / n,
            totals.lines_cleared as f64 / n,
            totals.best_score
        );
    }
    Ok(())
}

fn format_summary(game: u32, seed: u64, s: &GameSummary) -> String {
    let modes = s
        .modes
        .iter()
        .map(|(mode, count)| format!("{mode}={count}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "game {game:>3} seed {seed:<6} score {:>6} rounds {:>4} lines {:>4} revives {} {} [{modes}]",
        s.score,
        s.rounds,
        s.lines_cleared,
        s.revives_used,
        if s.game_over { "over" } else { "capped" },
    )
}
