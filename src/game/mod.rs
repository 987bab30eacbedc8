//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which holds everything the
//! renderers need (maze, player position and facing) together with session
//! bookkeeping: status, map peeks, the play clock, and the active quiz question.
//!
//! Every player action mutates the state in place and is fully applied before the
//! next one is accepted; there is no background processing.

/// Line-driven console front end.
pub mod console;
/// Cardinal facings and their vectors.
pub mod direction;
/// Quiz questions and the bundled bank.
pub mod questions;
/// A session that owns config, questions and rendering.
pub mod session;

use self::direction::Direction;
use self::questions::DungeonQuestion;
use crate::maze::generator::{CellType, GeneratedMaze, Maze, Position};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Message shown when a new game begins.
pub const WELCOME_MESSAGE: &str = "Welcome to the Dungeon. Find the red portal.";

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Exploring; moves and turns are accepted.
    Playing,
    /// A quiz question is waiting for an answer; movement is paused.
    Question,
    /// The player stepped onto the exit.
    Won,
}

/// Result of a movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved to a new cell.
    Moved(Position),
    /// A wall or the edge of the grid is in the way.
    Blocked,
    /// The player reached the exit.
    Won(Position),
    /// The game is not accepting movement right now.
    Ignored,
}

/// Wall-clock timer for a game, frozen once the game is won.
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    start_time: Instant,
    end_time: Option<Instant>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::start()
    }
}

impl GameClock {
    /// Starts a clock now.
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
        }
    }

    /// Freezes the clock. Later calls keep the first end time.
    pub fn stop(&mut self) {
        self.end_time.get_or_insert_with(Instant::now);
    }

    /// Whether the clock has not been stopped yet.
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Time since start, or total play time once stopped.
    pub fn elapsed(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Formats the elapsed time as `MM:SS`.
    pub fn format_time(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// The mutable state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The maze being explored.
    pub maze: Maze,
    /// Where the player started.
    pub start: Position,
    /// The cell that wins the game.
    pub exit: Position,
    /// The player's cell.
    pub player_pos: Position,
    /// The way the player faces.
    pub player_dir: Direction,
    /// Current phase of play.
    pub status: GameStatus,
    /// Remaining uses of the tactical map.
    pub peeks_left: u32,
    /// Whether the tactical map is currently shown instead of the first-person view.
    pub map_open: bool,
    /// Last message for the player.
    pub message: String,
    /// Play time.
    pub clock: GameClock,
    /// Question waiting for an answer, while `status` is `Question`.
    pub active_question: Option<DungeonQuestion>,
    /// Elapsed time at which the last question was asked.
    pub last_question_at: Duration,
    /// Junction cells visited so far, in visiting order.
    pub visited_junctions: Vec<Position>,
}

impl GameState {
    /// Starts a game on a freshly generated maze, facing east from the start.
    pub fn new(generated: GeneratedMaze, peeks: u32) -> Self {
        Self {
            maze: generated.maze,
            start: generated.start,
            exit: generated.exit,
            player_pos: generated.start,
            player_dir: Direction::East,
            status: GameStatus::Playing,
            peeks_left: peeks,
            map_open: false,
            message: WELCOME_MESSAGE.to_string(),
            clock: GameClock::start(),
            active_question: None,
            last_question_at: Duration::ZERO,
            visited_junctions: vec![generated.start],
        }
    }

    /// A state placed at an arbitrary position and facing. Mostly useful for
    /// rendering a specific viewpoint.
    pub fn at(maze: Maze, player_pos: Position, player_dir: Direction) -> Self {
        let start = maze
            .positions_of(CellType::Start)
            .first()
            .copied()
            .unwrap_or(player_pos);
        let exit = maze
            .positions_of(CellType::Exit)
            .first()
            .copied()
            .unwrap_or(start);
        let generated = GeneratedMaze {
            maze,
            start,
            exit,
            corridors: 0,
        };
        let mut state = Self::new(generated, 0);
        state.player_pos = player_pos;
        state.player_dir = player_dir;
        state
    }

    /// Steps one cell forward (or backward) relative to the current facing.
    ///
    /// Walls and the grid edge block movement and leave the state unchanged.
    /// Stepping onto the exit wins the game and stops the clock.
    #[instrument(skip(self), fields(x = self.player_pos.x, y = self.player_pos.y, dir = %self.player_dir))]
    pub fn move_player(&mut self, forward: bool) -> MoveOutcome {
        if self.status != GameStatus::Playing {
            return MoveOutcome::Ignored;
        }

        let heading = if forward {
            self.player_dir
        } else {
            self.player_dir.reverse()
        };
        let (dx, dy) = heading.delta();

        let Some(target) = self
            .player_pos
            .offset(dx, dy)
            .filter(|&p| self.maze.in_bounds(p))
        else {
            return MoveOutcome::Blocked;
        };

        match self.maze.cell_type(target) {
            CellType::Wall => {
                debug!("movement blocked by wall");
                MoveOutcome::Blocked
            }
            CellType::Exit => {
                self.player_pos = target;
                self.status = GameStatus::Won;
                self.map_open = false;
                self.clock.stop();
                self.message = format!("You escaped in {}!", self.clock.format_time());
                info!(elapsed = ?self.clock.elapsed(), "exit reached");
                MoveOutcome::Won(target)
            }
            CellType::Path | CellType::Start => {
                self.player_pos = target;
                self.record_junction(target);
                MoveOutcome::Moved(target)
            }
        }
    }

    /// Rotates the player a quarter turn. Ignored unless playing.
    pub fn turn(&mut self, left: bool) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.player_dir = if left {
            self.player_dir.turn_left()
        } else {
            self.player_dir.turn_right()
        };
        true
    }

    /// Opens or closes the tactical map.
    ///
    /// Closing is free. Opening spends one peek and fails when none are left.
    /// Returns whether the map is open afterwards.
    pub fn toggle_peek(&mut self) -> bool {
        if self.map_open {
            self.map_open = false;
        } else if self.peeks_left > 0 {
            self.peeks_left -= 1;
            self.map_open = true;
            debug!(peeks_left = self.peeks_left, "map opened");
        }
        self.map_open
    }

    /// Asks `question` if at least `interval` of play has passed since the last one.
    ///
    /// Returns true when a question was raised.
    pub fn maybe_ask_question(
        &mut self,
        elapsed: Duration,
        interval: Duration,
        question: impl FnOnce() -> Option<DungeonQuestion>,
    ) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        if elapsed.saturating_sub(self.last_question_at) < interval {
            return false;
        }
        let Some(question) = question() else {
            return false;
        };
        info!(id = question.id, "question raised");
        self.last_question_at = elapsed;
        self.active_question = Some(question);
        self.status = GameStatus::Question;
        self.map_open = false;
        true
    }

    /// Answers the active question.
    ///
    /// A correct answer earns a peek, a wrong one costs a peek (never below zero).
    /// Returns `None` when no question is active, otherwise whether the answer was
    /// correct.
    pub fn answer_question(&mut self, choice: usize) -> Option<bool> {
        let question = self.active_question.take()?;
        let correct = question.is_correct(choice);
        self.status = GameStatus::Playing;
        if correct {
            self.peeks_left += 1;
            self.message = format!("Correct! ({})", question.bible_reference);
        } else {
            self.peeks_left = self.peeks_left.saturating_sub(1);
            let answer = question
                .options
                .get(question.correct_answer)
                .map(String::as_str)
                .unwrap_or("?");
            self.message = format!("The answer was {answer} ({}).", question.bible_reference);
        }
        info!(id = question.id, correct, peeks_left = self.peeks_left, "question answered");
        Some(correct)
    }

    /// Whether `pos` is an open cell with three or more open neighbours.
    pub fn is_junction(&self, pos: Position) -> bool {
        self.maze.cell_type(pos).is_open() && self.maze.open_neighbours(pos).len() >= 3
    }

    fn record_junction(&mut self, pos: Position) {
        if self.is_junction(pos) && !self.visited_junctions.contains(&pos) {
            self.visited_junctions.push(pos);
        }
    }
}
