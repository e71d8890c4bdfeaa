use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::{HumanMode, HumanOptions};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    initial_speed: Option<u64>,

    /// Milliseconds shaved off the tick interval per food eaten
    #[arg(long)]
    speed_increment: Option<u64>,

    /// Fastest allowed tick interval in milliseconds
    #[arg(long)]
    min_speed: Option<u64>,

    /// Initial snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Seed for food placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Wait for Enter before the first game starts
    #[arg(long)]
    no_autostart: bool,

    /// Write logs to this file (RUST_LOG controls the level, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(speed) = self.initial_speed {
            config.initial_speed_ms = speed;
        }
        if let Some(increment) = self.speed_increment {
            config.speed_increment_ms = increment;
        }
        if let Some(speed) = self.min_speed {
            config.min_speed_ms = speed;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

/// Log to a file only; the terminal belongs to the game screen
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    tracing::info!(
        rows = config.rows,
        cols = config.cols,
        initial_speed_ms = config.initial_speed_ms,
        "starting snake"
    );

    let options = HumanOptions {
        seed: cli.seed,
        autostart: !cli.no_autostart,
    };

    let mut human_mode = HumanMode::new(config, options)?;
    human_mode.run().await?;

    Ok(())
}
