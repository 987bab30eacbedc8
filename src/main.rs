//! Delve command-line entry point.
//!
//! Logging goes to stderr (filter with `RUST_LOG`, default `info`) so maze text
//! printed by `generate` can be piped cleanly.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, MazeArgs, ViewpointArgs};
use delve::benchmarks;
use delve::config::{GameConfig, validate_image_size, validate_schematic_radius};
use delve::game::GameState;
use delve::game::console::run_console;
use delve::game::session::GameSession;
use delve::maze::generator::{GeneratedMaze, Maze, Position, generate_maze_with_rng};
use delve::renderer::{Framebuffer, RaycastRenderer, render_local_schematic, render_tactical_map};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate { maze, save } => run_generate(&maze, save.as_deref()),
        Command::Render {
            maze,
            view,
            out,
            width,
            height,
        } => {
            let (config, state) = load_view(&maze, &view)?;
            let renderer = RaycastRenderer::new(
                width.unwrap_or(config.view_width),
                height.unwrap_or(config.view_height),
            );
            validate_image_size(renderer.width, renderer.height)?;
            save(&renderer.render(&state), &out)
        }
        Command::Map {
            maze,
            view,
            out,
            px,
        } => {
            validate_image_size(px, px).context("invalid --px")?;
            let (_, state) = load_view(&maze, &view)?;
            let mut target = Framebuffer::new(px, px);
            render_tactical_map(&mut target, &state);
            save(&target, &out)
        }
        Command::Schematic {
            maze,
            view,
            out,
            radius,
        } => {
            let (config, state) = load_view(&maze, &view)?;
            let radius = radius.unwrap_or(config.schematic_radius);
            validate_schematic_radius(radius).context("invalid --radius")?;
            save(&render_local_schematic(&state, radius), &out)
        }
        Command::Play {
            config,
            seed,
            frames,
            bench_report,
        } => run_play(config.as_deref(), seed, frames.as_deref(), bench_report.as_deref()),
    }
}

/// Reads the config file, if any, and applies command-line overrides.
fn load_config(path: Option<&Path>, size: Option<usize>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(size) = size {
        config.maze_size = size;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Builds the state to render: a loaded or generated maze with the player placed
/// per the viewpoint arguments.
fn load_view(maze: &MazeArgs, view: &ViewpointArgs) -> Result<(GameConfig, GameState)> {
    let config = load_config(maze.config.as_deref(), maze.size, maze.seed)?;

    let mut state = match &maze.maze {
        Some(path) => {
            let parsed = Maze::load_from_file(path)
                .with_context(|| format!("failed to load maze {}", path.display()))?;
            GameState::at(parsed.maze, parsed.start, view.facing.into())
        }
        None => {
            let generated = generate(&config);
            GameState::new(generated, config.peeks)
        }
    };

    state.player_dir = view.facing.into();
    if let (Some(x), Some(y)) = (view.x, view.y) {
        let pos = Position::new(x, y);
        if !state.maze.in_bounds(pos) || !state.maze.cell_type(pos).is_open() {
            bail!("({x}, {y}) is not an open cell in this maze");
        }
        state.player_pos = pos;
    }
    Ok((config, state))
}

fn generate(config: &GameConfig) -> GeneratedMaze {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_maze_with_rng(config.maze_size, &mut rng)
}

#[instrument(skip(maze))]
fn run_generate(maze: &MazeArgs, save_dir: Option<&Path>) -> Result<()> {
    let config = load_config(maze.config.as_deref(), maze.size, maze.seed)?;
    let maze = match &maze.maze {
        Some(path) => Maze::load_from_file(path)?.maze,
        None => generate(&config).maze,
    };
    print!("{}", maze.to_text());
    if let Some(dir) = save_dir {
        let path = maze.save_to_file(dir)?;
        info!(path = %path.display(), "Maze saved");
    }
    Ok(())
}

fn run_play(
    config: Option<&Path>,
    seed: Option<u64>,
    frames: Option<&Path>,
    bench_report: Option<&Path>,
) -> Result<()> {
    let config = load_config(config, None, seed)?;
    if bench_report.is_some() {
        benchmarks::set_enabled(true);
    }
    let mut session = GameSession::new(config)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_console(&mut session, stdin.lock(), stdout.lock(), frames)?;

    benchmarks::log_summary();
    if let Some(dir) = bench_report {
        if benchmarks::write_results_to_file(dir, "delve play")?.is_none() {
            warn!(dir = %dir.display(), "No measurements recorded, benchmark report skipped");
        }
    }
    Ok(())
}

fn save(frame: &Framebuffer, out: &Path) -> Result<()> {
    frame
        .save_png(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), width = frame.width(), height = frame.height(), "Frame written");
    Ok(())
}
