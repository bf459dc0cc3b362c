use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use toroid_snake::game::{GameConfig, GameEngine};
use toroid_snake::modes::{print_leaderboard, scores::DEFAULT_LIMIT, HumanMode};
use toroid_snake::scores::JsonLinesStore;

#[derive(Parser)]
#[command(name = "toroid_snake")]
#[command(version, about = "Snake on a wraparound grid")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    initial_speed: Option<u64>,

    /// Milliseconds taken off the tick interval per food eaten
    #[arg(long)]
    speed_increment: Option<u64>,

    /// Shortest tick interval in milliseconds
    #[arg(long)]
    min_speed: Option<u64>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Save each final score under this name
    #[arg(long)]
    player: Option<String>,

    /// Where scores are stored
    #[arg(long, default_value = "scores.jsonl")]
    scores_file: PathBuf,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Print the best recorded scores
    Scores,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }
        if let Some(speed) = self.initial_speed {
            config.initial_speed_ms = speed;
        }
        if let Some(increment) = self.speed_increment {
            config.speed_increment_ms = increment;
        }
        if let Some(min_speed) = self.min_speed {
            config.min_speed_ms = min_speed;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {}", e))?;
        Ok(config)
    }
}

/// Send logs to a file; the terminal belongs to the game
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        init_logging(log_file)?;
    }

    let store = JsonLinesStore::new(&cli.scores_file);

    match cli.mode {
        Mode::Human => {
            let config = cli.game_config()?;
            let engine = match cli.seed {
                Some(seed) => GameEngine::with_seed(config, seed),
                None => GameEngine::new(config),
            };
            log::info!(
                "Starting human mode: grid {}, seed {}",
                engine.config().grid_size,
                engine.seed()
            );

            let mut human_mode = HumanMode::new(engine, cli.player.clone(), Box::new(store));
            human_mode.run().await?;
        }
        Mode::Scores => {
            print_leaderboard(&store, DEFAULT_LIMIT, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
