//! Error types for the fallible edges of the crate.
//!
//! Maze generation and rendering are total functions over valid input and never
//! return errors. Everything that touches the outside world (configuration files,
//! saved maze files, question banks, PNG encoding) reports through [`DelveError`].

use derive_more::{Display, Error, From};

/// Errors raised while loading, saving, or encoding game data.
#[derive(Debug, Display, Error, From)]
pub enum DelveError {
    /// Filesystem failure.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    /// PNG encoding failure.
    #[display("Image encoding error: {_0}")]
    Image(image::ImageError),

    /// A configuration file could not be parsed.
    #[display("Config parse error: {_0}")]
    Toml(toml::de::Error),

    /// A question bank could not be parsed.
    #[display("Question bank parse error: {_0}")]
    Json(serde_json::Error),

    /// Configuration values outside the supported range.
    #[display("Invalid config: {_0}")]
    #[from(ignore)]
    InvalidConfig(#[error(not(source))] String),

    /// A maze text grid that does not describe a playable maze.
    #[display("Invalid maze on line {line}: {reason}")]
    #[from(ignore)]
    InvalidMaze {
        /// One-based line number where the problem was found (0 for whole-grid problems).
        line: usize,
        /// What was wrong.
        reason: String,
    },
}

impl DelveError {
    /// Builds an [`DelveError::InvalidMaze`] for the given line.
    pub fn invalid_maze(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidMaze {
            line,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DelveError>;
