//! PuHaRam headless runner
//!
//! Runs a match with the demo player and logs what the presentation layer
//! would be told. Useful for balancing a dataset or tuning file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use puharam::consts::SIM_DT;
use puharam::sim::{Autoplay, GameEvent, GameState, Viewport, tick};
use puharam::{FoodDataset, Tuning};

#[derive(Debug, Parser)]
#[command(name = "puharam", about = "Run a headless PuHaRam match with the demo player")]
struct Cli {
    /// Food dataset (JSON array of { name, status, notes })
    #[arg(long, default_value = "assets/datasets/food.json")]
    dataset: PathBuf,
    /// Optional tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Sort every n-th bubble into the wrong bucket (0 = never)
    #[arg(long, default_value_t = 4)]
    mistake_every: u32,
    /// Playfield width
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    /// Playfield height
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    /// Print every event as JSON lines
    #[arg(long)]
    events: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    drops: u32,
    score: u32,
    level: u32,
    lives: u8,
    game_over: bool,
    bubbles_alive: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let dataset = FoodDataset::load_or_empty(&cli.dataset);
    let viewport = Viewport::with_default_layout(cli.width, cli.height, &tuning);

    log::info!(
        "PuHaRam (headless) starting: {} foods, seed {}, {}s",
        dataset.len(),
        cli.seed,
        cli.seconds
    );

    let mut state = GameState::new(cli.seed, tuning, dataset, viewport);
    let mut bot = Autoplay::new(cli.mistake_every, false);
    let mut events: Vec<GameEvent> = Vec::new();

    let ticks = (cli.seconds / SIM_DT).round() as u64;
    for _ in 0..ticks {
        let input = bot.next_input(&state, &events);
        tick(&mut state, &input, SIM_DT);
        events = state.drain_events();

        for event in &events {
            if cli.events {
                println!("{}", serde_json::to_string(event).context("encoding event")?);
            }
            match event {
                GameEvent::ShowNote { name, note, .. } => log::info!("{name}: {note}"),
                GameEvent::LevelChanged { level } => log::info!("Level {level}"),
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    let summary = Summary {
        seed: cli.seed,
        ticks: state.time_ticks,
        drops: bot.drops(),
        score: state.score,
        level: state.level,
        lives: state.lives,
        game_over: state.is_game_over(),
        bubbles_alive: state.bubbles.len(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("encoding summary")?
    );
    Ok(())
}
