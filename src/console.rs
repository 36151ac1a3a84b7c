//! Line-oriented text protocol for playing a game from a terminal or script.
//!
//! Each command produces one response: `=` followed by the output on success,
//! `?` followed by an error message on failure, then a blank line.
//!
//! ## Supported Commands
//!
//! - `new` - Start a new game
//! - `show` - Print the board
//! - `moves` - List the legal moves for the side to move
//! - `move <move>` - Play a move, e.g. `11-15` or `9x18x27`
//! - `go` - Let the engine play for the side to move
//! - `undo` - Take back the last ply
//! - `level [n]` - Show or set the search depth
//! - `player <black|white> <human|computer|random>` - Choose who plays a side
//! - `help` - List commands
//! - `quit` - Exit
//!
//! After a move, any computer or random players reply until a human is to move.

use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::constants::MAX_GAME_LEN;
use crate::game::{Game, Level, LevelError, ParsePlayerTypeError, PlayerType};
use crate::movegen::{parse_move, ParseMoveError};
use crate::position::{ParseSideError, Side};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "go", "help", "level", "move", "moves", "new", "player", "quit", "show", "undo",
];

/// Error returned by a console command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("missing argument")]
    MissingArgument,
    #[error("game is over")]
    GameOver,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error(transparent)]
    Move(#[from] ParseMoveError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Side(#[from] ParseSideError),
    #[error(transparent)]
    Player(#[from] ParsePlayerTypeError),
}

/// Console session state.
pub struct Console {
    game: Game,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Game::new())
    }
}

impl Console {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        // Let the engine open if it plays Black.
        let opening = self.reply_moves();
        if !opening.is_empty() {
            writeln!(output, "= {}\n", opening.join("\n"))?;
            output.flush()?;
        }

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            match self.execute(&command, args) {
                Ok(message) => writeln!(output, "= {message}\n")?,
                Err(e) => writeln!(output, "? {e}\n")?,
            }
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command and return its response text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String, CommandError> {
        debug!(command, ?args, "console command");
        match command {
            "quit" => Ok(String::new()),

            "help" => Ok(KNOWN_COMMANDS.join(" ")),

            "new" => {
                self.game.new_game();
                let mut lines = vec![self.game.board().to_string()];
                lines.extend(self.reply_moves());
                Ok(lines.join("\n"))
            }

            "show" => Ok(format!(
                "{}{} to move",
                self.game.board(),
                self.game.side_to_move()
            )),

            "moves" => Ok(self
                .game
                .legal_moves()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")),

            "move" => {
                let text = args.first().ok_or(CommandError::MissingArgument)?;
                if self.game.is_game_over() {
                    return Err(CommandError::GameOver);
                }
                let mv = parse_move(self.game.board(), self.game.side_to_move(), text)?;
                self.game.play(&mv);
                let mut lines = vec![mv.to_string()];
                lines.extend(self.reply_moves());
                lines.extend(self.result_line());
                Ok(lines.join("\n"))
            }

            "go" => {
                if self.game.is_game_over() {
                    return Err(CommandError::GameOver);
                }
                let mut lines = Vec::new();
                if let Some(mv) = self.game.choose_move(PlayerType::Computer) {
                    self.game.play(&mv);
                    lines.push(mv.to_string());
                }
                lines.extend(self.reply_moves());
                lines.extend(self.result_line());
                Ok(lines.join("\n"))
            }

            "undo" => {
                if self.game.undo() {
                    Ok(String::new())
                } else {
                    Err(CommandError::NothingToUndo)
                }
            }

            "level" => match args.first() {
                None => Ok(self.game.level().to_string()),
                Some(arg) => {
                    let level: Level = arg.parse()?;
                    self.game.set_level(level);
                    Ok(String::new())
                }
            },

            "player" => {
                if args.len() < 2 {
                    return Err(CommandError::MissingArgument);
                }
                let side: Side = args[0].parse()?;
                let player: PlayerType = args[1].parse()?;
                self.game.set_player_type(side, player);
                Ok(String::new())
            }

            _ => Err(CommandError::Unknown(command.to_string())),
        }
    }

    /// Let non-human players move until a human is to move or the game ends.
    fn reply_moves(&mut self) -> Vec<String> {
        let mut played = Vec::new();
        while !self.game.is_game_over() && self.game.ply() < MAX_GAME_LEN {
            match self.game.play_engine_move() {
                Some((mv, _)) => played.push(mv.to_string()),
                None => break,
            }
        }
        played
    }

    fn result_line(&self) -> Option<String> {
        self.game
            .winner()
            .map(|winner| format!("game over: {winner} wins"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human_console() -> Console {
        let mut console = Console::new(Game::with_seed(1));
        console.execute("player", &["white", "human"]).unwrap();
        console
    }

    #[test]
    fn test_help_lists_commands() {
        let mut console = human_console();
        let response = console.execute("help", &[]).unwrap();
        for command in KNOWN_COMMANDS {
            assert!(response.contains(command));
        }
    }

    #[test]
    fn test_unknown_command() {
        let mut console = human_console();
        assert!(matches!(
            console.execute("castle", &[]),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_move_and_undo() {
        let mut console = human_console();
        let response = console.execute("move", &["11-15"]).unwrap();
        assert_eq!(response, "11-15");
        assert_eq!(console.game().side_to_move(), Side::White);

        console.execute("undo", &[]).unwrap();
        assert!(console.game().is_initial_state());
        assert!(matches!(
            console.execute("undo", &[]),
            Err(CommandError::NothingToUndo)
        ));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut console = human_console();
        assert!(matches!(
            console.execute("move", &["11-14"]),
            Err(CommandError::Move(ParseMoveError::Illegal(_)))
        ));
        assert!(matches!(
            console.execute("move", &[]),
            Err(CommandError::MissingArgument)
        ));
    }

    #[test]
    fn test_level() {
        let mut console = human_console();
        assert_eq!(console.execute("level", &[]).unwrap(), "5");
        console.execute("level", &["3"]).unwrap();
        assert_eq!(console.execute("level", &[]).unwrap(), "3");
        assert!(matches!(
            console.execute("level", &["99"]),
            Err(CommandError::Level(_))
        ));
    }

    #[test]
    fn test_computer_replies() {
        let mut console = Console::new(Game::with_seed(1));
        console.execute("level", &["2"]).unwrap();
        let response = console.execute("move", &["11-15"]).unwrap();
        let lines: Vec<&str> = response.lines().collect();
        assert_eq!(lines[0], "11-15");
        assert_eq!(lines.len(), 2, "computer should answer once: {response}");
        assert_eq!(console.game().side_to_move(), Side::Black);
    }

    #[test]
    fn test_run_loop() {
        let mut console = human_console();
        let input = b"# comment\nmoves\nmove 9-13\nbogus\nquit\nshow\n";
        let mut output = Vec::new();
        console.run(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("= 9-13\n"));
        assert!(text.contains("? unknown command: bogus"));
        // Nothing after quit is executed.
        assert!(!text.contains("to move"));
    }
}
