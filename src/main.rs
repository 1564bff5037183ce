use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::HumanMode;
use grid_snake::persist::{HighScores, JsonFileStore};
use grid_snake::render::{CanvasRenderer, GridRenderer, Renderer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Terminal Snake with swappable renderers")]
struct Cli {
    /// How the board is drawn
    #[arg(long, value_enum, default_value_t = RendererKind::Grid)]
    renderer: RendererKind,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_scores.json")]
    scores: PathBuf,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum RendererKind {
    /// One glyph per cell; game-over panel stays until reset
    Grid,
    /// Filled cells; game-over overlay clears after three seconds
    Canvas,
}

impl RendererKind {
    fn build(self) -> Box<dyn Renderer> {
        match self {
            RendererKind::Grid => Box::new(GridRenderer::new()),
            RendererKind::Canvas => Box::new(CanvasRenderer::new()),
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    grid_snake::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let high_scores = HighScores::new(Box::new(JsonFileStore::new(&cli.scores)));

    let mut human_mode = HumanMode::new(engine, high_scores, cli.renderer.build());
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["grid_snake"]);
        assert_eq!(cli.renderer, RendererKind::Grid);
        assert_eq!(cli.scores, PathBuf::from("snake_scores.json"));

        let config = load_config(&cli).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_cli_overrides_grid() {
        let cli = Cli::parse_from(["grid_snake", "--renderer", "canvas", "--width", "30"]);
        assert_eq!(cli.renderer, RendererKind::Canvas);
        assert_eq!(cli.renderer.build().name(), "canvas");

        let config = load_config(&cli).unwrap();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
    }

    #[test]
    fn test_cli_rejects_unplayable_grid() {
        let cli = Cli::parse_from(["grid_snake", "--width", "2"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_cli_rejects_oversized_grid() {
        // Rejected by clap where usize is 32 bits, by validation elsewhere
        if let Ok(cli) = Cli::try_parse_from(["grid_snake", "--width", "4294967300"]) {
            assert!(load_config(&cli).is_err());
        }
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
