//! A playable session: game state plus everything needed to drive it.
//!
//! The session owns its config, question bank, random source and renderer, so
//! front ends only forward player commands and display the frames it returns.

use super::questions::{QuestionBank, default_bank};
use super::{GameState, MoveOutcome};
use crate::benchmark;
use crate::benchmarks;
use crate::config::GameConfig;
use crate::error::Result;
use crate::maze::generator::generate_maze_with_rng;
use crate::renderer::{Framebuffer, RaycastRenderer, render_local_schematic, render_tactical_map};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{info, instrument};

/// Default side length of the tactical map image, in pixels.
pub const DEFAULT_MAP_PX: u32 = 450;

/// One player's game, with the config, question bank, RNG and renderer it runs on.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    questions: QuestionBank,
    rng: StdRng,
    renderer: RaycastRenderer,
    state: GameState,
}

impl GameSession {
    /// Starts a session with the bundled questions.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_questions(config, default_bank())
    }

    /// Starts a session drawing quiz questions from `questions`, narrowed to the
    /// configured difficulty.
    #[instrument(skip_all, fields(size = config.maze_size, seed = ?config.seed))]
    pub fn with_questions(config: GameConfig, questions: QuestionBank) -> Result<Self> {
        config.validate()?;
        let questions = questions.filtered(config.difficulty);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = new_game(&config, &mut rng);
        let renderer = RaycastRenderer::new(config.view_width, config.view_height);
        info!(questions = questions.len(), "Session started");
        Ok(Self {
            config,
            questions,
            rng,
            renderer,
            state,
        })
    }

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the game state.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The validated config this session runs on.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Questions left after the difficulty filter.
    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Throws the current game away and starts on a new maze.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.state = new_game(&self.config, &mut self.rng);
        info!("Game restarted");
    }

    /// Steps one cell ahead.
    pub fn move_forward(&mut self) -> MoveOutcome {
        self.state.move_player(true)
    }

    /// Steps one cell back without turning.
    pub fn move_backward(&mut self) -> MoveOutcome {
        self.state.move_player(false)
    }

    /// Turns a quarter counter-clockwise. False when turning is not allowed.
    pub fn turn_left(&mut self) -> bool {
        self.state.turn(true)
    }

    /// Turns a quarter clockwise. False when turning is not allowed.
    pub fn turn_right(&mut self) -> bool {
        self.state.turn(false)
    }

    /// Opens the map (spending a peek) or closes it. False when nothing changed.
    pub fn toggle_peek(&mut self) -> bool {
        self.state.toggle_peek()
    }

    /// Raises a quiz question if one is due at the game clock's current time.
    pub fn tick(&mut self) -> bool {
        let elapsed = self.state.clock.elapsed();
        self.tick_at(elapsed)
    }

    /// Raises a quiz question if one is due at `elapsed` play time.
    pub fn tick_at(&mut self, elapsed: Duration) -> bool {
        let Some(interval) = self.config.question_interval() else {
            return false;
        };
        let questions = &self.questions;
        let rng = &mut self.rng;
        self.state
            .maybe_ask_question(elapsed, interval, || questions.pick(rng).cloned())
    }

    /// Answers the active question. See [`GameState::answer_question`].
    pub fn answer(&mut self, choice: usize) -> Option<bool> {
        self.state.answer_question(choice)
    }

    /// First-person view at the configured size.
    pub fn render_view(&self) -> Framebuffer {
        let frame = benchmark!("raycast_render", self.renderer.render(&self.state));
        benchmarks::record_frame();
        frame
    }

    /// Whole-maze map, `px` pixels square.
    pub fn render_map(&self, px: u32) -> Framebuffer {
        benchmark!("tactical_map_render", {
            let mut target = Framebuffer::new(px, px);
            render_tactical_map(&mut target, &self.state);
            target
        })
    }

    /// Schematic around the player at the configured radius.
    pub fn render_schematic(&self) -> Framebuffer {
        benchmark!(
            "schematic_render",
            render_local_schematic(&self.state, self.config.schematic_radius)
        )
    }

    /// What the player currently sees: the map while a peek is open, otherwise
    /// the first-person view.
    pub fn render_current(&self) -> Framebuffer {
        if self.state.map_open {
            self.render_map(DEFAULT_MAP_PX)
        } else {
            self.render_view()
        }
    }
}

fn new_game(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let generated = benchmark!(
        "maze_generation",
        generate_maze_with_rng(config.maze_size, rng)
    );
    GameState::new(generated, config.peeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DelveError;
    use crate::game::GameStatus;
    use crate::game::questions::{DungeonQuestion, QuestionDifficulty};

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            maze_size: 11,
            view_width: 64,
            view_height: 36,
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    fn question(id: u32, difficulty: QuestionDifficulty) -> DungeonQuestion {
        DungeonQuestion {
            id,
            question: format!("Question {id}?"),
            options: vec!["A".into(), "B".into()],
            correct_answer: 0,
            bible_reference: "Genesis 1:1".into(),
            difficulty,
        }
    }

    #[test]
    fn test_seeded_sessions_match() {
        let a = GameSession::new(config(5)).unwrap();
        let b = GameSession::new(config(5)).unwrap();
        assert_eq!(a.state().maze, b.state().maze);
        assert_eq!(a.state().peeks_left, 3);
        assert_eq!(a.state().player_pos, a.state().start);
        assert_eq!(a.render_view(), b.render_view());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = GameConfig {
            maze_size: 8,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameSession::new(bad),
            Err(DelveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut session = GameSession::new(config(8)).unwrap();
        session.toggle_peek();
        session.turn_left();
        session.restart();

        let state = session.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.peeks_left, 3);
        assert!(!state.map_open);
        assert_eq!(state.player_pos, state.start);
        assert_eq!(state.maze.size(), 11);
    }

    #[test]
    fn test_questions_follow_interval_and_difficulty() {
        let bank = QuestionBank::new(vec![
            question(1, QuestionDifficulty::Preliminary),
            question(2, QuestionDifficulty::Competent),
        ]);
        let config = GameConfig {
            difficulty: Some(QuestionDifficulty::Competent),
            ..config(3)
        };
        let mut session = GameSession::with_questions(config, bank).unwrap();
        assert_eq!(session.questions().len(), 1);

        assert!(!session.tick_at(Duration::from_secs(29)));
        assert!(session.tick_at(Duration::from_secs(30)));
        assert_eq!(session.state().status, GameStatus::Question);
        assert_eq!(session.state().active_question.as_ref().map(|q| q.id), Some(2));

        assert_eq!(session.answer(0), Some(true));
        assert_eq!(session.state().peeks_left, 4);
        assert!(!session.tick_at(Duration::from_secs(59)));
        assert!(session.tick_at(Duration::from_secs(60)));
    }

    #[test]
    fn test_quiz_can_be_disabled() {
        let config = GameConfig {
            question_interval_secs: 0,
            ..config(3)
        };
        let mut session = GameSession::new(config).unwrap();
        assert!(!session.tick_at(Duration::from_secs(3600)));
    }

    #[test]
    fn test_empty_bank_never_asks() {
        let mut session = GameSession::with_questions(config(3), QuestionBank::default()).unwrap();
        assert!(!session.tick_at(Duration::from_secs(300)));
        assert_eq!(session.state().status, GameStatus::Playing);
    }

    #[test]
    fn test_render_current_switches_with_peek() {
        let mut session = GameSession::new(config(2)).unwrap();
        assert_eq!(session.render_current().width(), 64);
        assert!(session.toggle_peek());
        assert_eq!(session.render_current().width(), DEFAULT_MAP_PX);
        assert_eq!(session.render_schematic().width(), 140);
    }
}
