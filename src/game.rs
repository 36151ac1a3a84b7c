//! Game session management.
//!
//! A [`Game`] owns the authoritative board, whose turn it is, the undo history,
//! the engine level and the kind of player on each side. Engine searches run on
//! a worker thread through [`SearchJob`], always on a snapshot of the board, and
//! at most one is outstanding at a time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_DEPTH, MAX_DEPTH};
use crate::movegen::{generate, Move};
use crate::position::{Board, MoveEvent, Side};
use crate::search::best_move;

/// Who makes the moves for a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    Human,
    /// The alpha-beta engine at the game's level.
    Computer,
    /// Uniformly random legal moves.
    Random,
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Human => write!(f, "human"),
            PlayerType::Computer => write!(f, "computer"),
            PlayerType::Random => write!(f, "random"),
        }
    }
}

/// Error returned when a player type cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown player type '{0}' (expected human, computer or random)")]
pub struct ParsePlayerTypeError(String);

impl FromStr for PlayerType {
    type Err = ParsePlayerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(PlayerType::Human),
            "computer" | "engine" => Ok(PlayerType::Computer),
            "random" => Ok(PlayerType::Random),
            _ => Err(ParsePlayerTypeError(s.to_string())),
        }
    }
}

/// Error returned for a search depth outside `1..MAX_DEPTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level must be between 1 and {max}, got {0}", max = MAX_DEPTH - 1)]
pub struct LevelError(pub u32);

/// Engine strength, expressed as search depth in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(u32);

impl Level {
    pub fn new(depth: u32) -> Result<Self, LevelError> {
        if (1..MAX_DEPTH).contains(&depth) {
            Ok(Level(depth))
        } else {
            Err(LevelError(depth))
        }
    }

    #[inline]
    pub fn depth(self) -> u32 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(DEFAULT_DEPTH)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let depth = s.trim().parse::<u32>().map_err(|_| LevelError(0))?;
        Level::new(depth)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An engine search running on a worker thread.
///
/// Cancellation is cooperative: the worker checks the flag only before it
/// starts, and [`SearchJob::wait`] discards the result of a cancelled job.
pub struct SearchJob {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<Option<Move>>,
}

impl SearchJob {
    /// Start searching a snapshot of `board` for `side`.
    pub fn spawn(board: Board, side: Side, level: Level) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = thread::spawn(move || {
            if flag.load(Ordering::Acquire) {
                return None;
            }
            best_move(&board, side, level.depth())
        });
        SearchJob { cancelled, handle }
    }

    /// Ask the job to drop its result.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// True once the worker thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the search completes.
    ///
    /// Returns `None` if the side had no moves or the job was cancelled.
    pub fn wait(self) -> Option<Move> {
        let result = match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                warn!("search thread panicked");
                None
            }
        };
        if self.cancelled.load(Ordering::Acquire) {
            debug!("discarding result of cancelled search");
            return None;
        }
        result
    }
}

/// A game of draughts between two players.
pub struct Game {
    board: Board,
    side_to_move: Side,
    history: Vec<Board>,
    level: Level,
    players: [PlayerType; 2],
    game_over: bool,
    job: Option<SearchJob>,
    rng: fastrand::Rng,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Black (human) against White (computer) at the default level.
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Like [`Game::new`] with a seeded generator for random players.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Game {
            board: Board::new(),
            side_to_move: Side::Black,
            history: Vec::new(),
            level: Level::default(),
            players: [PlayerType::Human, PlayerType::Computer],
            game_over: false,
            job: None,
            rng,
        }
    }

    /// Reset to the starting position with Black to move.
    pub fn new_game(&mut self) {
        self.cancel_search();
        self.board.setup();
        self.side_to_move = Side::Black;
        self.history.clear();
        self.game_over = false;
        info!("new game");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of plies played (and available to undo).
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn is_initial_state(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        generate(&self.board, self.side_to_move)
    }

    /// Play a move for the side to move and pass the turn.
    ///
    /// The move must be legal. The game ends when the next side has no moves.
    pub fn play(&mut self, mv: &Move) -> MoveEvent {
        debug_assert!(!self.game_over, "game is already over");
        self.cancel_search();
        self.history.push(self.board);
        let event = self.board.apply_move(mv);
        info!(side = %self.side_to_move, %mv, "move played");
        self.side_to_move = self.side_to_move.opponent();

        if self.legal_moves().is_empty() {
            self.game_over = true;
            info!(winner = %self.side_to_move.opponent(), "game over");
        }
        event
    }

    /// Take back the last ply. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.cancel_search();
        self.board = previous;
        self.side_to_move = self.side_to_move.opponent();
        self.game_over = false;
        info!(ply = self.history.len(), "undo");
        true
    }

    pub fn set_level(&mut self, level: Level) {
        self.cancel_search();
        self.level = level;
        info!(%level, "level changed");
    }

    pub fn player_type(&self, side: Side) -> PlayerType {
        self.players[side.index()]
    }

    pub fn current_player_type(&self) -> PlayerType {
        self.player_type(self.side_to_move)
    }

    pub fn set_player_type(&mut self, side: Side, player: PlayerType) {
        self.cancel_search();
        self.players[side.index()] = player;
        info!(%side, %player, "player changed");
    }

    /// True if the game is over and `side` made the last move.
    pub fn is_winner(&self, side: Side) -> bool {
        self.side_to_move == side.opponent() && self.is_loser(side.opponent())
    }

    /// True if the game is over because `side` cannot move.
    pub fn is_loser(&self, side: Side) -> bool {
        self.game_over && self.side_to_move == side && generate(&self.board, side).is_empty()
    }

    /// The winner, if the game is over.
    pub fn winner(&self) -> Option<Side> {
        [Side::Black, Side::White]
            .into_iter()
            .find(|&side| self.is_winner(side))
    }

    /// Start an engine search for the side to move, replacing any running one.
    pub fn start_search(&mut self) {
        self.cancel_search();
        debug!(side = %self.side_to_move, level = %self.level, "starting search");
        self.job = Some(SearchJob::spawn(self.board, self.side_to_move, self.level));
    }

    /// True while a search is outstanding.
    pub fn is_searching(&self) -> bool {
        self.job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Wait for the outstanding search, if any, and return its move.
    pub fn wait_search(&mut self) -> Option<Move> {
        self.job.take().and_then(SearchJob::wait)
    }

    /// Cancel the outstanding search; its result will never be applied.
    pub fn cancel_search(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel();
            debug!("search cancelled");
        }
    }

    /// Choose a move for the side to move as a player of the given type would.
    ///
    /// Returns `None` for a human player or when there are no legal moves.
    pub fn choose_move(&mut self, player: PlayerType) -> Option<Move> {
        if self.game_over {
            return None;
        }
        match player {
            PlayerType::Human => None,
            PlayerType::Computer => {
                self.start_search();
                self.wait_search()
            }
            PlayerType::Random => {
                let mut moves = self.legal_moves();
                if moves.is_empty() {
                    return None;
                }
                let i = self.rng.usize(..moves.len());
                Some(moves.swap_remove(i))
            }
        }
    }

    /// Let the configured player for the side to move play, unless it is human.
    ///
    /// Returns the move played.
    pub fn play_engine_move(&mut self) -> Option<(Move, MoveEvent)> {
        let mv = self.choose_move(self.current_player_type())?;
        let event = self.play(&mv);
        Some((mv, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Square;

    #[test]
    fn test_level_bounds() {
        assert!(Level::new(0).is_err());
        assert_eq!(Level::new(1).map(Level::depth), Ok(1));
        assert!(Level::new(MAX_DEPTH - 1).is_ok());
        assert_eq!(Level::new(MAX_DEPTH), Err(LevelError(MAX_DEPTH)));
        assert_eq!("7".parse::<Level>(), Ok(Level(7)));
        assert!("deep".parse::<Level>().is_err());
    }

    #[test]
    fn test_player_type_parse() {
        assert_eq!("Computer".parse::<PlayerType>(), Ok(PlayerType::Computer));
        assert_eq!("random".parse::<PlayerType>(), Ok(PlayerType::Random));
        assert!("robot".parse::<PlayerType>().is_err());
    }

    #[test]
    fn test_play_and_undo() {
        let mut game = Game::new();
        let start = *game.board();
        let mv = game.legal_moves().remove(0);
        game.play(&mv);
        assert_eq!(game.side_to_move(), Side::White);
        assert!(!game.is_initial_state());

        assert!(game.undo());
        assert_eq!(*game.board(), start);
        assert_eq!(game.side_to_move(), Side::Black);
        assert!(game.is_initial_state());
        assert!(!game.undo());
    }

    #[test]
    fn test_play_ends_game_when_opponent_is_stuck() {
        let mut game = Game::new();
        let mut board = Board::empty();
        for (pt, sq) in [
            (30, Square::BlackKing),
            (39, Square::BlackMan),
            (40, Square::BlackMan),
            (43, Square::BlackMan),
            (25, Square::WhiteMan),
            (15, Square::WhiteMan),
            (35, Square::WhiteMan),
            (41, Square::WhiteMan),
        ] {
            board.place(pt, sq);
        }
        game.board = board;

        game.play(&Move::new(vec![39, 31]));
        assert!(!game.is_game_over());
        assert!(game.undo());

        game.play(&Move::new(vec![30, 20, 10]));
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Side::Black));
        assert!(game.is_loser(Side::White));

        assert!(game.undo());
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_cancelled_job_discards_result() {
        let job = SearchJob::spawn(Board::new(), Side::Black, Level::new(2).unwrap());
        job.cancel();
        assert!(job.is_cancelled());
        assert_eq!(job.wait(), None);
    }

    #[test]
    fn test_job_returns_legal_move() {
        let board = Board::new();
        let job = SearchJob::spawn(board, Side::Black, Level::new(3).unwrap());
        let mv = job.wait().unwrap();
        assert!(generate(&board, Side::Black).contains(&mv));
    }

    #[test]
    fn test_random_player_is_seeded() {
        let mut a = Game::with_seed(7);
        let mut b = Game::with_seed(7);
        for _ in 0..6 {
            let ma = a.choose_move(PlayerType::Random).unwrap();
            let mb = b.choose_move(PlayerType::Random).unwrap();
            assert_eq!(ma, mb);
            a.play(&ma);
            b.play(&mb);
        }
    }

    #[test]
    fn test_human_does_not_move() {
        let mut game = Game::new();
        assert_eq!(game.current_player_type(), PlayerType::Human);
        assert!(game.play_engine_move().is_none());
        assert!(game.is_initial_state());
    }
}
