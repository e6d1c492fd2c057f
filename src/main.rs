use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gesture_snake::game::GameConfig;
use gesture_snake::modes::{PlayMode, SimulateMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gesture_snake")]
#[command(version, about = "Snake steered by a pointer instead of keys")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Board height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Cell size in pixels
    #[arg(long)]
    cell_size: Option<i32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to run in simulate mode
    #[arg(long, default_value = "3000")]
    frames: u64,

    /// Write logs here in play mode (the terminal is busy drawing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Steer with the mouse in the terminal
    Play,
    /// Let a food-seeking pointer play headless and print a summary
    Simulate,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging(mode: Mode, log_file: Option<&PathBuf>) -> Result<()> {
    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (Mode::Simulate, None) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
        }
        // Logging to the terminal would tear through the TUI
        (Mode::Play, None) => {}
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.board_width = width;
    }
    if let Some(height) = cli.height {
        config.board_height = height;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.mode, cli.log_file.as_ref())?;

    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config)?;
            play_mode.run().await?;
        }
        Mode::Simulate => {
            let mut simulate_mode = SimulateMode::new(config, cli.frames)?;
            let summary = simulate_mode.run()?;
            println!("{}", summary.format_summary());
        }
    }

    Ok(())
}
