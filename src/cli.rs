//! Command-line interface for delve.

use clap::{Args, Parser, Subcommand, ValueEnum};
use delve::game::direction::Direction;
use std::path::PathBuf;

/// Delve - procedural dungeon mazes rendered in software
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Generate dungeon mazes and render them to PNG", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Which maze to work on. Command-line values override the config file.
#[derive(Args, Debug, Clone)]
pub struct MazeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maze side length (odd, at least 5)
    #[arg(long)]
    pub size: Option<usize>,

    /// RNG seed for a reproducible maze
    #[arg(long)]
    pub seed: Option<u64>,

    /// Load a saved maze instead of generating one
    #[arg(long, conflicts_with_all = ["size", "seed"])]
    pub maze: Option<PathBuf>,
}

/// Where the player stands for a rendered view. Defaults to the maze start.
#[derive(Args, Debug, Clone)]
pub struct ViewpointArgs {
    /// Player column
    #[arg(long, requires = "y")]
    pub x: Option<usize>,

    /// Player row
    #[arg(long, requires = "x")]
    pub y: Option<usize>,

    /// Facing
    #[arg(long, value_enum, default_value_t = Facing::East)]
    pub facing: Facing,
}

/// Cardinal facing accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Up the grid
    North,
    /// Right
    East,
    /// Down the grid
    South,
    /// Left
    West,
}

impl From<Facing> for Direction {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::North => Direction::North,
            Facing::East => Direction::East,
            Facing::South => Direction::South,
            Facing::West => Direction::West,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a maze and print it as text
    Generate {
        #[command(flatten)]
        maze: MazeArgs,

        /// Also save the maze to a timestamped file in this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Render the first-person view to a PNG
    Render {
        #[command(flatten)]
        maze: MazeArgs,

        #[command(flatten)]
        view: ViewpointArgs,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Image width (defaults to the configured view width)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (defaults to the configured view height)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Render the whole-maze tactical map to a PNG
    Map {
        #[command(flatten)]
        maze: MazeArgs,

        #[command(flatten)]
        view: ViewpointArgs,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Image side length in pixels
        #[arg(long, default_value = "450")]
        px: u32,
    },

    /// Render the local schematic around the player to a PNG
    Schematic {
        #[command(flatten)]
        maze: MazeArgs,

        #[command(flatten)]
        view: ViewpointArgs,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Cells shown on each side of the player (defaults to the configured radius)
        #[arg(long)]
        radius: Option<usize>,
    },

    /// Play from the terminal, one command per line
    Play {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for a reproducible maze
        #[arg(long)]
        seed: Option<u64>,

        /// Write the current view to this directory after every command
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Write a benchmark report to this directory on exit
        #[arg(long)]
        bench_report: Option<PathBuf>,
    },
}
