//! Line-driven front end for a [`GameSession`].
//!
//! Reads one command per line, applies it, and writes the resulting view as a
//! PNG so another program (or a person with an image viewer) can follow along.
//!
//! | input        | action                          |
//! |--------------|---------------------------------|
//! | `w` / `s`    | step forward / back             |
//! | `a` / `d`    | turn left / right               |
//! | `p`          | open or close the tactical map  |
//! | `m`          | write the local schematic       |
//! | `r`          | start a new maze                |
//! | `1`..`9`     | answer the active question      |
//! | `q`          | quit                            |

use super::session::GameSession;
use super::{GameStatus, MoveOutcome};
use crate::error::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step one cell ahead.
    Forward,
    /// Step one cell back.
    Backward,
    /// Quarter turn counter-clockwise.
    TurnLeft,
    /// Quarter turn clockwise.
    TurnRight,
    /// Open or close the tactical map.
    Peek,
    /// Write the local schematic.
    Schematic,
    /// Start over on a new maze.
    Restart,
    /// Leave the session.
    Quit,
    /// Zero-based option index.
    Answer(usize),
}

impl Command {
    /// Parses a trimmed input line. Answers are typed one-based.
    pub fn parse(line: &str) -> Option<Self> {
        let command = match line.trim().to_ascii_lowercase().as_str() {
            "w" | "forward" => Command::Forward,
            "s" | "back" => Command::Backward,
            "a" | "left" => Command::TurnLeft,
            "d" | "right" => Command::TurnRight,
            "p" | "peek" => Command::Peek,
            "m" | "schematic" => Command::Schematic,
            "r" | "restart" => Command::Restart,
            "q" | "quit" => Command::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Answer(n - 1),
                _ => return None,
            },
        };
        Some(command)
    }
}

/// Where frames are written, and how many of each kind so far.
#[derive(Debug)]
struct FrameSink {
    dir: Option<PathBuf>,
    written: usize,
    schematics: usize,
}

impl FrameSink {
    fn write(&mut self, session: &GameSession, out: &mut impl Write) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(format!("frame_{:04}.png", self.written));
        session.render_current().save_png(&path)?;
        self.written += 1;
        debug!(path = %path.display(), "frame written");
        writeln!(out, "[frame] {}", path.display())?;
        Ok(())
    }

    fn write_schematic(&mut self, session: &GameSession, out: &mut impl Write) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(format!("schematic_{:04}.png", self.schematics));
        session.render_schematic().save_png(&path)?;
        self.schematics += 1;
        writeln!(out, "[schematic] {}", path.display())?;
        Ok(())
    }
}

fn write_status(session: &GameSession, out: &mut impl Write) -> Result<()> {
    let state = session.state();
    writeln!(
        out,
        "({}, {}) facing {} | peeks {} | {}{}",
        state.player_pos.x,
        state.player_pos.y,
        state.player_dir,
        state.peeks_left,
        state.clock.format_time(),
        if state.map_open { " | map open" } else { "" },
    )?;
    Ok(())
}

fn write_question(session: &GameSession, out: &mut impl Write) -> Result<()> {
    if let Some(question) = &session.state().active_question {
        writeln!(out, "QUESTION: {}", question.question)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }
    }
    Ok(())
}

/// Runs commands from `input` until `q` or end of input.
///
/// When `frames` is set, the current view is written there after every applied
/// command (and once at the start) as `frame_NNNN.png`. Returns the number of
/// frames written.
pub fn run_console<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    mut out: W,
    frames: Option<&Path>,
) -> Result<usize> {
    if let Some(dir) = frames {
        std::fs::create_dir_all(dir)?;
    }
    let mut sink = FrameSink {
        dir: frames.map(Path::to_path_buf),
        written: 0,
        schematics: 0,
    };

    writeln!(out, "{}", session.state().message)?;
    write_status(session, &mut out)?;
    sink.write(session, &mut out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = Command::parse(&line) else {
            writeln!(out, "Unknown command '{}'. Use w/s/a/d/p/m/r/q.", line.trim())?;
            continue;
        };
        if command == Command::Quit {
            break;
        }

        let status = session.state().status;
        match (status, command) {
            (GameStatus::Question, Command::Answer(choice)) => {
                let options = session
                    .state()
                    .active_question
                    .as_ref()
                    .map_or(0, |q| q.options.len());
                if choice >= options {
                    writeln!(out, "Pick an option between 1 and {options}.")?;
                    continue;
                }
                // The state's message already says whether the answer was right.
                session.answer(choice);
                writeln!(out, "{}", session.state().message)?;
            }
            (GameStatus::Question, Command::Restart) => session.restart(),
            (GameStatus::Question, _) => {
                writeln!(out, "Answer the question first.")?;
                write_question(session, &mut out)?;
                continue;
            }
            (_, Command::Answer(_)) => {
                writeln!(out, "There is no question to answer.")?;
                continue;
            }
            (_, Command::Restart) => {
                session.restart();
                writeln!(out, "{}", session.state().message)?;
            }
            (GameStatus::Won, _) => {
                writeln!(out, "You have escaped. Type r to play again or q to quit.")?;
                continue;
            }
            (_, Command::Forward | Command::Backward) => {
                let outcome = if command == Command::Forward {
                    session.move_forward()
                } else {
                    session.move_backward()
                };
                match outcome {
                    MoveOutcome::Blocked => writeln!(out, "A wall blocks the way.")?,
                    MoveOutcome::Won(_) => writeln!(out, "{}", session.state().message)?,
                    MoveOutcome::Moved(_) | MoveOutcome::Ignored => {}
                }
            }
            (_, Command::TurnLeft) => {
                session.turn_left();
            }
            (_, Command::TurnRight) => {
                session.turn_right();
            }
            (_, Command::Peek) => {
                let was_open = session.state().map_open;
                if !session.toggle_peek() && !was_open {
                    writeln!(out, "No peeks left. Answer questions to earn more.")?;
                }
            }
            (_, Command::Schematic) => {
                sink.write_schematic(session, &mut out)?;
                continue;
            }
            (_, Command::Quit) => break,
        }

        if session.tick() {
            write_question(session, &mut out)?;
        }
        write_status(session, &mut out)?;
        sink.write(session, &mut out)?;
    }

    info!(
        frames = sink.written,
        status = ?session.state().status,
        "Console session ended"
    );
    Ok(sink.written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::direction::Direction;
    use crate::game::questions::{DungeonQuestion, QuestionDifficulty};
    use std::io::Cursor;
    use std::time::Duration;

    fn session() -> GameSession {
        GameSession::new(GameConfig {
            maze_size: 9,
            view_width: 32,
            view_height: 18,
            seed: Some(17),
            ..GameConfig::default()
        })
        .unwrap()
    }

    fn run(session: &mut GameSession, input: &str, frames: Option<&Path>) -> (usize, String) {
        let mut out = Vec::new();
        let written = run_console(session, Cursor::new(input), &mut out, frames).unwrap();
        (written, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse(" W "), Some(Command::Forward));
        assert_eq!(Command::parse("right"), Some(Command::TurnRight));
        assert_eq!(Command::parse("1"), Some(Command::Answer(0)));
        assert_eq!(Command::parse("0"), None);
        assert_eq!(Command::parse("jump"), None);
    }

    #[test]
    fn test_frames_written_per_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let (written, output) = run(&mut session, "d\n\nhop\na\nq\nw\n", Some(dir.path()));

        // Initial frame plus two turns; the unknown command and anything after
        // quit produce nothing.
        assert_eq!(written, 3);
        assert!(dir.path().join("frame_0002.png").exists());
        assert!(!dir.path().join("frame_0003.png").exists());
        assert!(output.contains("Unknown command 'hop'"));
        assert_eq!(session.state().player_dir, Direction::East);
    }

    #[test]
    fn test_each_schematic_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let (written, output) = run(&mut session, "m\nm\nd\nm\n", Some(dir.path()));

        assert_eq!(written, 2);
        for n in 0..3 {
            let name = format!("schematic_{n:04}.png");
            assert!(dir.path().join(&name).exists(), "{name} missing");
            assert_eq!(output.matches(name.as_str()).count(), 1);
        }
    }

    #[test]
    fn test_without_frames_dir() {
        let mut session = session();
        let (written, output) = run(&mut session, "a\n", None);
        assert_eq!(written, 0);
        assert!(output.contains("facing north"));
    }

    #[test]
    fn test_walking_onto_exit() {
        let mut session = session();
        let state = session.state_mut();
        let exit = state.exit;
        let (before, dir) = Direction::ALL
            .into_iter()
            .find_map(|dir| {
                let (dx, dy) = dir.reverse().delta();
                exit.offset(dx, dy)
                    .filter(|&p| state.maze.cell_type(p).is_open())
                    .map(|p| (p, dir))
            })
            .unwrap();
        state.player_pos = before;
        state.player_dir = dir;

        let (_, output) = run(&mut session, "w\nw\n", None);
        assert!(output.contains("You escaped in "));
        assert!(output.contains("Type r to play again"));
        assert_eq!(session.state().status, GameStatus::Won);
    }

    #[test]
    fn test_question_blocks_until_answered() {
        let mut session = session();
        let question = DungeonQuestion {
            id: 1,
            question: "In the beginning God created?".into(),
            options: vec!["The heaven and the earth".into(), "Light".into()],
            correct_answer: 0,
            bible_reference: "Genesis 1:1".into(),
            difficulty: QuestionDifficulty::Preliminary,
        };
        session.state_mut().maybe_ask_question(
            Duration::from_secs(30),
            Duration::from_secs(30),
            || Some(question),
        );

        let (_, output) = run(&mut session, "a\n5\n1\n", None);
        assert!(output.contains("Answer the question first."));
        assert!(output.contains("  2) Light"));
        assert!(output.contains("Pick an option between 1 and 2."));
        assert_eq!(output.matches("Correct!").count(), 1);
        assert!(output.contains("Correct! (Genesis 1:1)"));
        assert_eq!(session.state().status, GameStatus::Playing);
        assert_eq!(session.state().peeks_left, 4);
        assert_eq!(session.state().player_dir, Direction::East);
    }

    #[test]
    fn test_peek_exhaustion_message() {
        let mut session = session();
        session.state_mut().peeks_left = 0;
        let (_, output) = run(&mut session, "p\n", None);
        assert!(output.contains("No peeks left."));
    }
}
