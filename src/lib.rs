//! Delve - procedural dungeon mazes with software rendering
//!
//! Generates perfect mazes on an odd-sized grid and renders them three ways:
//! a first-person raycast view, a top-down tactical map, and a local schematic
//! that always faces the way the player does. A small game layer adds movement,
//! map peeks, a play clock and a scripture quiz on top.
//!
//! # Architecture
//! - `maze/`: grid types, the recursive backtracker, and the text file format
//! - `game/`: player state, sessions, quiz questions and the console front end
//! - `renderer/`: the framebuffer and the three renderers
//! - `benchmarks/`: timing of generation and rendering
//!
//! ```no_run
//! use delve::maze::generator::generate_maze;
//! use delve::game::GameState;
//! use delve::renderer::RaycastRenderer;
//!
//! let state = GameState::new(generate_maze(15), 3);
//! let png = RaycastRenderer::default().render_png(&state)?;
//! # Ok::<(), delve::error::DelveError>(())
//! ```

#![warn(missing_docs)]

/// Timing of generation and rendering.
pub mod benchmarks;
/// Session configuration and its validation.
pub mod config;
/// The crate's error type.
pub mod error;
/// Game state, sessions, quiz questions and the console front end.
pub mod game;
/// Maze grids, generation and the text format.
pub mod maze;
/// Framebuffer and renderers.
pub mod renderer;
