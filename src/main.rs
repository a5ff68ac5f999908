use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use snake_term::game::SnakeGame;
use snake_term::term::TermManager;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snake")]
#[command(about = "Steer the snake with the arrow keys. Enter restarts, Esc quits.")]
struct Cli {
    /// Milliseconds per game tick
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Seed for snack placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    /// Write diagnostics to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(tick_ms = cli.tick_ms, seed = ?cli.seed, "starting");

    let term = TermManager::new().context("reading terminal size")?;
    let mut game = SnakeGame::new(term, rng, cli.tick_ms);

    // Dropping the game restores the terminal before the error is printed.
    let outcome = game.play();
    drop(game);
    outcome.context("game aborted")
}

// The terminal is the game screen, so logs only ever go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
