//! Maze generation and the plain-text maze format.
//!
//! Mazes can be written to and read back from a simple text grid, one line per
//! row, one character per cell:
//! - `#` wall
//! - ` ` (space) path
//! - `S` start
//! - `*` exit
//!
//! # Example
//! ```text
//! #######
//! #S#   #
//! # # # #
//! #   # #
//! ##### #
//! #*    #
//! #######
//! ```

/// Grid types and the recursive backtracker.
pub mod generator;

use self::generator::{CellType, Maze, Position};
use crate::error::{DelveError, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension used for saved maze files.
pub const MAZE_FILE_EXTENSION: &str = "mz";

impl CellType {
    /// The character used for this cell type in the text format.
    pub fn glyph(self) -> char {
        match self {
            CellType::Wall => '#',
            CellType::Path => ' ',
            CellType::Start => 'S',
            CellType::Exit => '*',
        }
    }

    /// Parses a text-format character.
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' => Some(CellType::Wall),
            ' ' => Some(CellType::Path),
            'S' => Some(CellType::Start),
            '*' => Some(CellType::Exit),
            _ => None,
        }
    }
}

/// A maze parsed from text, with its start and exit located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMaze {
    /// The parsed grid.
    pub maze: Maze,
    /// The `S` cell.
    pub start: Position,
    /// The `E` cell, if the text had one.
    pub exit: Option<Position>,
}

impl Maze {
    /// Renders the maze in the text format, each row terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.size() * (self.size() + 1));
        for row in self.rows() {
            out.extend(row.iter().map(|c| c.cell_type.glyph()));
            out.push('\n');
        }
        out
    }

    /// Parses the text format.
    ///
    /// Trailing blank lines are ignored. The grid must be square, use only the
    /// known glyphs, and contain exactly one start and at most one exit.
    pub fn from_text(text: &str) -> Result<ParsedMaze> {
        let lines: Vec<&str> = text.trim_end_matches(['\n', '\r']).lines().collect();
        let size = lines.len();
        if size == 0 {
            return Err(DelveError::invalid_maze(0, "maze is empty"));
        }

        let mut types = Vec::with_capacity(size);
        let mut start = None;
        let mut exit = None;

        for (y, line) in lines.iter().enumerate() {
            let line_no = y + 1;
            let row: Vec<char> = line.trim_end_matches('\r').chars().collect();
            if row.len() != size {
                return Err(DelveError::invalid_maze(
                    line_no,
                    format!("expected {size} cells, found {}", row.len()),
                ));
            }

            let mut parsed = Vec::with_capacity(size);
            for (x, c) in row.into_iter().enumerate() {
                let cell_type = CellType::from_glyph(c).ok_or_else(|| {
                    DelveError::invalid_maze(line_no, format!("unknown cell '{c}' at column {}", x + 1))
                })?;
                let pos = Position::new(x, y);
                match cell_type {
                    CellType::Start if start.replace(pos).is_some() => {
                        return Err(DelveError::invalid_maze(line_no, "more than one start"));
                    }
                    CellType::Exit if exit.replace(pos).is_some() => {
                        return Err(DelveError::invalid_maze(line_no, "more than one exit"));
                    }
                    _ => {}
                }
                parsed.push(cell_type);
            }
            types.push(parsed);
        }

        let start = start.ok_or_else(|| DelveError::invalid_maze(0, "maze has no start"))?;
        Ok(ParsedMaze {
            maze: Maze::from_types(types),
            start,
            exit,
        })
    }

    /// Saves the maze to a timestamped file in `dir`.
    ///
    /// The file is named from the local time, e.g. `Maze_06-24-25_11-24PM.mz`.
    /// The directory is created if it does not exist.
    pub fn save_to_file(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let file_name = Local::now()
            .format(&format!("Maze_%m-%d-%y_%I-%M-%S%p.{MAZE_FILE_EXTENSION}"))
            .to_string();
        let output_path = dir.join(file_name);
        fs::write(&output_path, self.to_text())?;

        info!(path = %output_path.display(), "maze saved");
        Ok(output_path)
    }

    /// Loads a maze previously written with [`Maze::save_to_file`] or by hand.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<ParsedMaze> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_text(&text)
    }
}
