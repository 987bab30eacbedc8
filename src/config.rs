//! Session configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid config:
//!
//! ```toml
//! maze_size = 21
//! view_width = 800
//! view_height = 450
//! peeks = 3
//! question_interval_secs = 30
//! difficulty = "competent"
//! schematic_radius = 3
//! seed = 42
//! ```

use crate::error::{DelveError, Result};
use crate::game::questions::QuestionDifficulty;
use crate::maze::generator::MAZE_SIZE;
use crate::renderer::schematic::{DEFAULT_VIEW_RADIUS, MAX_VIEW_RADIUS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Largest width or height accepted for any rendered image.
pub const MAX_IMAGE_PX: u32 = 4096;

/// Tunables for a game session and its renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of generated mazes. Must be odd and at least 5.
    pub maze_size: usize,
    /// Width of the first-person view in pixels.
    pub view_width: u32,
    /// Height of the first-person view in pixels.
    pub view_height: u32,
    /// Map peeks available at the start of a game.
    pub peeks: u32,
    /// Seconds of play between quiz questions. Zero disables the quiz.
    pub question_interval_secs: u64,
    /// Only ask questions of this difficulty.
    pub difficulty: Option<QuestionDifficulty>,
    /// Radius, in cells, of the local schematic.
    pub schematic_radius: usize,
    /// Fixed RNG seed for reproducible mazes.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            maze_size: MAZE_SIZE,
            view_width: 640,
            view_height: 360,
            peeks: 3,
            question_interval_secs: 30,
            difficulty: None,
            schematic_radius: DEFAULT_VIEW_RADIUS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        info!(maze_size = config.maze_size, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the generator and renderers cannot work with.
    pub fn validate(&self) -> Result<()> {
        validate_maze_size(self.maze_size)?;
        validate_image_size(self.view_width, self.view_height)?;
        validate_schematic_radius(self.schematic_radius)
    }

    /// Interval between quiz questions, or `None` when the quiz is off.
    pub fn question_interval(&self) -> Option<Duration> {
        (self.question_interval_secs > 0).then(|| Duration::from_secs(self.question_interval_secs))
    }
}

/// Checks the generator's size precondition: odd and at least 5.
pub fn validate_maze_size(size: usize) -> Result<()> {
    if size < 5 || size % 2 == 0 {
        return Err(DelveError::InvalidConfig(format!(
            "maze size must be an odd number >= 5, got {size}"
        )));
    }
    Ok(())
}

/// Checks that an image is non-empty and at most [`MAX_IMAGE_PX`] on each side.
pub fn validate_image_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_IMAGE_PX || height > MAX_IMAGE_PX {
        return Err(DelveError::InvalidConfig(format!(
            "image size must be between 1 and {MAX_IMAGE_PX} px per side, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Checks that a schematic radius is at most [`MAX_VIEW_RADIUS`] cells.
pub fn validate_schematic_radius(radius: usize) -> Result<()> {
    if radius > MAX_VIEW_RADIUS {
        return Err(DelveError::InvalidConfig(format!(
            "schematic radius must be at most {MAX_VIEW_RADIUS}, got {radius}"
        )));
    }
    Ok(())
}
